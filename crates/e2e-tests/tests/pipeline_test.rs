//! End-to-end pipeline tests for the graph tagger.
//!
//! Worked scenarios through each stage, then the whole file-backed run.

use pretty_assertions::assert_eq;

use e2e_tests::{chunk, random_corpus, TestHarness};
use tagger_cli::process_graph;
use tagger_graph::{
    ComponentLabeler, Edge, EdgeKey, Graph, GraphBuilder, GraphConfig, GraphPipeline,
    GraphPruner, Percentile, TopicScoreTable,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}

/// Shared topic at rank 1 in the first chunk and rank 0 in the second.
#[test]
fn test_edge_weight_from_shared_topic() {
    let chunks = vec![chunk(&["a", "b"]), chunk(&["b", "c"])];
    let scores = TopicScoreTable::uniform(["a", "b", "c"], 1.0);

    let graph = GraphBuilder::new().build(chunks, &scores).unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    let edge = graph.edge(0, 1).expect("edge via shared topic");
    assert_close(edge.weight, 1.0 / 2.0 + 1.0 / 1.0 + 1.0);
    assert_eq!(edge.contributions.len(), 1);
    assert_eq!(edge.contributions[0].topic, "b");
    assert_eq!(edge.contributions[0].rank_i, 1);
    assert_eq!(edge.contributions[0].rank_j, 0);
}

#[test]
fn test_triangle_prunes_to_single_component() {
    let chunks = vec![chunk(&["a", "b"]), chunk(&["b", "c"]), chunk(&["a", "c"])];
    let scores = TopicScoreTable::uniform(["a", "b", "c"], 1.0);

    let graph = GraphBuilder::new().build(chunks, &scores).unwrap();
    assert_eq!(graph.edge_count(), 3);
    assert_close(graph.edge(0, 1).unwrap().weight, 2.5);
    assert_close(graph.edge(0, 2).unwrap().weight, 3.0);
    assert_close(graph.edge(1, 2).unwrap().weight, 2.0);

    let outcome = GraphPruner::new(Percentile::new(50.0).unwrap())
        .prune(&graph)
        .unwrap();
    assert_close(outcome.threshold, 2.5);
    assert_eq!(outcome.graph.edge_count(), 2);
    assert_eq!(outcome.removed, 1);

    let components = ComponentLabeler::new().label(&outcome.graph);
    assert_eq!(components.component_count(), 1);
    assert_eq!(components.components(), vec![vec![0, 1, 2]]);
}

#[test]
fn test_median_prune_splits_weak_link() {
    let mut graph = Graph::from_chunks(vec![chunk(&["x"]), chunk(&["x"]), chunk(&["x"])]);
    graph
        .add_edge(Edge::with_weight(EdgeKey::new(0, 1).unwrap(), 3.0))
        .unwrap();
    graph
        .add_edge(Edge::with_weight(EdgeKey::new(1, 2).unwrap(), 1.0))
        .unwrap();

    let outcome = GraphPruner::new(Percentile::new(50.0).unwrap())
        .prune(&graph)
        .unwrap();
    assert_close(outcome.threshold, 2.0);
    assert!(outcome.graph.has_edge(0, 1));
    assert!(!outcome.graph.has_edge(1, 2));

    let components = ComponentLabeler::new().label(&outcome.graph);
    assert_eq!(components.component_of(0), Some(0));
    assert_eq!(components.component_of(1), Some(0));
    assert_eq!(components.component_of(2), Some(1));
}

#[test]
fn test_pipeline_keeps_isolated_nodes() {
    let chunks = vec![chunk(&["a", "b"]), chunk(&["a", "c"]), chunk(&["lonely"])];
    let output = GraphPipeline::default().run(chunks).unwrap();

    assert_eq!(output.pruned.graph.node_count(), 3);
    assert_eq!(output.components.len(), 3);
    assert!(output.components.same_component(0, 1));
    assert!(!output.components.same_component(0, 2));
    assert_eq!(output.components.component_count(), 2);
}

#[test]
fn test_file_backed_run_matches_in_memory_run() {
    let harness = TestHarness::new();
    let corpus = random_corpus(7, 60, 25, 5);
    harness.write_corpus(&corpus);

    let summary = process_graph(&harness.settings(90.0)).unwrap();
    let on_disk = harness.read_components();

    let in_memory = GraphPipeline::new(GraphConfig::with_percentile(90.0))
        .run(corpus)
        .unwrap();

    assert_eq!(summary.chunk_count, 60);
    assert_eq!(on_disk.len(), 60);
    for (node, component) in in_memory.components.iter() {
        assert_eq!(on_disk.get(&node), Some(&component));
    }
}

#[test]
fn test_rerun_is_idempotent() {
    let harness = TestHarness::new();
    harness.write_corpus(&random_corpus(11, 40, 15, 4));

    let settings = harness.settings(0.975);
    process_graph(&settings).unwrap();
    let first = harness.read_components();
    process_graph(&settings).unwrap();
    let second = harness.read_components();

    assert_eq!(first, second);
}

#[test]
fn test_fractional_and_whole_percentiles_agree() {
    let corpus = random_corpus(3, 50, 20, 4);
    let fractional = GraphPipeline::new(GraphConfig::with_percentile(0.9))
        .run(corpus.clone())
        .unwrap();
    let whole = GraphPipeline::new(GraphConfig::with_percentile(90.0))
        .run(corpus)
        .unwrap();

    assert_eq!(fractional.pruned.threshold, whole.pruned.threshold);
    assert_eq!(fractional.components, whole.components);
}

#[test]
fn test_content_type_filter_end_to_end() {
    let harness = TestHarness::new();
    harness.write_chunk(1, &["rust", "graphs"], Some("paragraph"));
    harness.write_chunk(2, &["graphs", "pruning"], Some("list"));
    harness.write_chunk(3, &["rust"], Some("footer"));
    harness.write_chunk(4, &["rust"], None);

    let settings = tagger_types::Settings {
        content_type_filter: "paragraph, list".to_string(),
        ..harness.settings(97.5)
    };
    let summary = process_graph(&settings).unwrap();

    assert_eq!(summary.chunk_count, 2);
    assert_eq!(summary.filtered, 2);
    let components = harness.read_components();
    assert_eq!(components.len(), 2);
    assert_eq!(components[&0], components[&1]);
}
