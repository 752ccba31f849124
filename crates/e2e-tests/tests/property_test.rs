//! Structural properties of the graph over seeded random corpora.

use std::collections::{BTreeSet, HashSet, VecDeque};

use pretty_assertions::assert_eq;

use e2e_tests::random_corpus;
use tagger_graph::{
    ComponentLabeler, Graph, GraphBuilder, GraphPruner, Percentile, TopicScorer,
};
use tagger_types::Chunk;

const SEEDS: [u64; 4] = [1, 17, 42, 2024];

fn build(corpus: &[Chunk], parallel: bool) -> Graph {
    let scores = TopicScorer::new().compute(corpus).unwrap();
    GraphBuilder::new()
        .with_parallel(parallel)
        .build(corpus.to_vec(), &scores)
        .unwrap()
}

/// Nodes reachable from `start` over retained edges, ascending.
fn reachable(adjacency: &[Vec<usize>], start: usize) -> Vec<usize> {
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for &next in &adjacency[node] {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.into_iter().collect()
}

fn shares_topic(a: &Chunk, b: &Chunk) -> bool {
    let topics: HashSet<&String> = a.topics.iter().collect();
    b.topics.iter().any(|t| topics.contains(t))
}

#[test]
fn test_edge_exists_iff_topics_intersect() {
    for seed in SEEDS {
        let corpus = random_corpus(seed, 40, 30, 4);
        let graph = build(&corpus, true);
        for i in 0..corpus.len() {
            for j in (i + 1)..corpus.len() {
                assert_eq!(
                    graph.has_edge(i, j),
                    shares_topic(&corpus[i], &corpus[j]),
                    "seed {seed}, pair ({i}, {j})"
                );
            }
        }
    }
}

#[test]
fn test_edges_are_symmetric_and_loop_free() {
    let corpus = random_corpus(5, 50, 20, 5);
    let graph = build(&corpus, true);
    for edge in graph.edges() {
        assert!(edge.source < edge.target);
        assert!(graph.has_edge(edge.target, edge.source));
        assert!(edge.weight > 0.0);
        let sum: f64 = edge.contributions.iter().map(|c| c.contribution).sum();
        assert!((sum - edge.weight).abs() < 1e-9);
    }
}

#[test]
fn test_parallel_build_matches_sequential() {
    for seed in SEEDS {
        let corpus = random_corpus(seed, 80, 40, 6);
        let parallel = build(&corpus, true);
        let sequential = build(&corpus, false);

        assert_eq!(parallel.edge_count(), sequential.edge_count());
        for (a, b) in parallel.edges().zip(sequential.edges()) {
            assert_eq!(a.key(), b.key());
            assert_eq!(a.weight, b.weight);
        }
    }
}

#[test]
fn test_higher_percentile_never_keeps_more_edges() {
    let corpus = random_corpus(9, 60, 25, 5);
    let graph = build(&corpus, true);

    let mut previous = usize::MAX;
    for p in [10.0, 25.0, 50.0, 75.0, 90.0, 97.5, 100.0] {
        let outcome = GraphPruner::new(Percentile::new(p).unwrap())
            .prune(&graph)
            .unwrap();
        assert!(outcome.graph.edge_count() <= previous, "percentile {p}");
        assert!(outcome.graph.edge_count() >= 1);
        assert!(outcome
            .graph
            .edges()
            .all(|e| e.weight >= outcome.threshold));
        assert_eq!(outcome.graph.node_count(), graph.node_count());
        previous = outcome.graph.edge_count();
    }
}

#[test]
fn test_components_partition_nodes() {
    for seed in SEEDS {
        let corpus = random_corpus(seed, 70, 35, 4);
        let graph = build(&corpus, true);
        let pruned = GraphPruner::new(Percentile::new(80.0).unwrap())
            .prune(&graph)
            .unwrap()
            .graph;
        let components = ComponentLabeler::new().label(&pruned);

        assert_eq!(components.len(), pruned.node_count());
        let ids: BTreeSet<usize> = components.iter().map(|(_, id)| id).collect();
        assert_eq!(ids, (0..components.component_count()).collect());

        for edge in pruned.edges() {
            assert!(components.same_component(edge.source, edge.target));
        }

        // Each component is exactly the set reachable from its smallest member.
        let adjacency = pruned.adjacency();
        for members in components.components() {
            assert_eq!(reachable(&adjacency, members[0]), members, "seed {seed}");
        }

        // Ids follow the smallest member of each component.
        let firsts: Vec<usize> = components.components().iter().map(|m| m[0]).collect();
        let mut sorted = firsts.clone();
        sorted.sort_unstable();
        assert_eq!(firsts, sorted);
    }
}
