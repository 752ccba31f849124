//! Graph construction from scored chunks.
//!
//! Two chunks are joined iff they share at least one topic. Each shared topic
//! contributes `1/(rank_i + 1) + 1/(rank_j + 1) + score(topic)` using
//! zero-based first-occurrence ranks, and the edge weight is the sum.
//!
//! Candidate pairs come from an inverted topic -> chunk index, so pairs with
//! no topic in common are never evaluated. Candidate evaluation runs on the
//! rayon pool unless the builder is sequential; both paths produce the same
//! graph.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rayon::prelude::*;
use tagger_types::Chunk;
use tracing::{debug, info, instrument};

use crate::error::GraphError;
use crate::graph::{Edge, EdgeKey, Graph, TopicContribution};
use crate::scoring::TopicScoreTable;

/// Inverted index over interned topic ids.
struct TopicIndex<'a> {
    labels: Vec<&'a str>,
    scores: Vec<f64>,
    /// Topic id -> ascending chunk indices
    postings: Vec<Vec<usize>>,
    /// Chunk -> (topic id, first rank) in first-occurrence order
    chunk_topics: Vec<Vec<(usize, usize)>>,
    /// Chunk -> topic id -> first rank
    chunk_ranks: Vec<HashMap<usize, usize>>,
}

impl<'a> TopicIndex<'a> {
    fn new(chunks: &'a [Arc<Chunk>], scores: &TopicScoreTable) -> Result<Self, GraphError> {
        let mut ids: HashMap<&'a str, usize> = HashMap::new();
        let mut labels = Vec::new();
        let mut topic_scores = Vec::new();
        let mut postings: Vec<Vec<usize>> = Vec::new();
        let mut chunk_topics = Vec::with_capacity(chunks.len());
        let mut chunk_ranks = Vec::with_capacity(chunks.len());

        for (chunk_index, chunk) in chunks.iter().enumerate() {
            let mut ordered = Vec::new();
            let mut ranks: HashMap<usize, usize> = HashMap::new();

            for (rank, topic) in chunk.topics.iter().enumerate() {
                let id = match ids.get(topic.as_str()) {
                    Some(id) => *id,
                    None => {
                        let score = scores.get(topic).ok_or_else(|| {
                            GraphError::InvalidInput(format!("no score for topic '{topic}'"))
                        })?;
                        let id = labels.len();
                        ids.insert(topic.as_str(), id);
                        labels.push(topic.as_str());
                        topic_scores.push(score);
                        postings.push(Vec::new());
                        id
                    }
                };

                // Later duplicates keep the first rank.
                if let std::collections::hash_map::Entry::Vacant(slot) = ranks.entry(id) {
                    slot.insert(rank);
                    ordered.push((id, rank));
                    if let Some(list) = postings.get_mut(id) {
                        list.push(chunk_index);
                    }
                }
            }

            chunk_topics.push(ordered);
            chunk_ranks.push(ranks);
        }

        Ok(Self {
            labels,
            scores: topic_scores,
            postings,
            chunk_topics,
            chunk_ranks,
        })
    }

    /// Chunks with a higher index than `i` sharing a topic with it, ascending.
    fn candidates(&self, i: usize) -> BTreeSet<usize> {
        let mut candidates = BTreeSet::new();
        let Some(topics) = self.chunk_topics.get(i) else {
            return candidates;
        };
        for (id, _) in topics {
            if let Some(list) = self.postings.get(*id) {
                let start = list.partition_point(|&j| j <= i);
                candidates.extend(&list[start..]);
            }
        }
        candidates
    }

    /// Edge between `i` and `j` (`i < j`), contributions in `i`'s topic order.
    fn edge_between(&self, i: usize, j: usize) -> Option<Edge> {
        let key = EdgeKey::new(i, j)?;
        let topics_i = self.chunk_topics.get(i)?;
        let ranks_j = self.chunk_ranks.get(j)?;

        let contributions: Vec<TopicContribution> = topics_i
            .iter()
            .filter_map(|(id, rank_i)| {
                let rank_j = ranks_j.get(id)?;
                let label = self.labels.get(*id)?;
                let score = self.scores.get(*id)?;
                Some(TopicContribution::compute(*label, *rank_i, *rank_j, *score))
            })
            .collect();

        if contributions.is_empty() {
            None
        } else {
            Some(Edge::from_contributions(key, contributions))
        }
    }

    fn edges_from(&self, i: usize) -> Vec<Edge> {
        self.candidates(i)
            .into_iter()
            .filter_map(|j| self.edge_between(i, j))
            .collect()
    }
}

/// Builds the weighted chunk graph.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    parallel: bool,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Builder that evaluates candidate pairs on the rayon pool.
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Builder that evaluates candidate pairs on the calling thread.
    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Build the graph from owned chunks.
    pub fn build(&self, chunks: Vec<Chunk>, scores: &TopicScoreTable) -> Result<Graph, GraphError> {
        let shared: Vec<Arc<Chunk>> = chunks.into_iter().map(Arc::new).collect();
        self.build_shared(&shared, scores)
    }

    /// Build the graph over shared chunks; node `i` is `chunks[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidInput`] when a chunk carries a topic that
    /// has no entry in `scores`.
    #[instrument(skip(self, chunks, scores), fields(chunks = chunks.len(), parallel = self.parallel))]
    pub fn build_shared(
        &self,
        chunks: &[Arc<Chunk>],
        scores: &TopicScoreTable,
    ) -> Result<Graph, GraphError> {
        let index = TopicIndex::new(chunks, scores)?;
        debug!(topics = index.labels.len(), "Built inverted topic index");

        let n = chunks.len();
        let edges: Vec<Edge> = if self.parallel {
            (0..n)
                .into_par_iter()
                .flat_map_iter(|i| index.edges_from(i))
                .collect()
        } else {
            (0..n).flat_map(|i| index.edges_from(i)).collect()
        };

        let mut graph = Graph::from_shared(chunks.to_vec());
        graph.extend_edges(edges);

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph built"
        );
        Ok(graph)
    }
}
