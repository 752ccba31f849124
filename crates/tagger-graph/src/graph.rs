//! Chunk similarity graph.
//!
//! Nodes live in an arena indexed `0..N` in chunk load order; each holds a
//! shared handle to its [`Chunk`]. Undirected edges are stored once, keyed by
//! the ordered index pair `(low, high)`, so iteration order is deterministic.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tagger_types::Chunk;

use crate::error::GraphError;

/// Canonical key of an undirected edge, `low < high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    low: usize,
    high: usize,
}

impl EdgeKey {
    /// Build the canonical key for `{a, b}`; `None` for a self-pair.
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> usize {
        self.low
    }

    pub fn high(&self) -> usize {
        self.high
    }
}

/// The part of an edge's weight attributable to one shared topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicContribution {
    /// Shared topic label
    pub topic: String,
    /// Zero-based rank in the lower-indexed endpoint
    pub rank_i: usize,
    /// Zero-based rank in the higher-indexed endpoint
    pub rank_j: usize,
    /// `1/(rank_i + 1) + 1/(rank_j + 1) + score(topic)`
    pub contribution: f64,
}

impl TopicContribution {
    /// Apply the contribution formula.
    pub fn compute(topic: impl Into<String>, rank_i: usize, rank_j: usize, score: f64) -> Self {
        let contribution = 1.0 / (rank_i as f64 + 1.0) + 1.0 / (rank_j as f64 + 1.0) + score;
        Self {
            topic: topic.into(),
            rank_i,
            rank_j,
            contribution,
        }
    }
}

/// Weighted undirected edge between two chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Lower endpoint index
    pub source: usize,
    /// Higher endpoint index
    pub target: usize,
    /// Sum of all contributions
    pub weight: f64,
    /// Per-topic breakdown, in the lower endpoint's topic order
    pub contributions: Vec<TopicContribution>,
}

impl Edge {
    /// Build an edge whose weight is the sum of `contributions`.
    pub fn from_contributions(key: EdgeKey, contributions: Vec<TopicContribution>) -> Self {
        let weight = contributions.iter().map(|c| c.contribution).sum();
        Self {
            source: key.low,
            target: key.high,
            weight,
            contributions,
        }
    }

    /// Build an edge with an explicit weight and no breakdown.
    pub fn with_weight(key: EdgeKey, weight: f64) -> Self {
        Self {
            source: key.low,
            target: key.high,
            weight,
            contributions: Vec::new(),
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            low: self.source,
            high: self.target,
        }
    }
}

/// A graph node: one chunk in load order.
#[derive(Debug, Clone)]
pub struct Node {
    index: usize,
    chunk: Arc<Chunk>,
}

impl Node {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    pub fn text(&self) -> &str {
        &self.chunk.text
    }

    pub fn source(&self) -> &str {
        &self.chunk.source
    }

    pub fn topics(&self) -> &[String] {
        &self.chunk.topics
    }
}

/// Weighted undirected chunk graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: BTreeMap<EdgeKey, Edge>,
}

impl Graph {
    /// Create an edgeless graph with one node per chunk.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Self::from_shared(chunks.into_iter().map(Arc::new).collect())
    }

    /// Create an edgeless graph over already shared chunks.
    pub fn from_shared(chunks: Vec<Arc<Chunk>>) -> Self {
        let nodes = chunks
            .into_iter()
            .enumerate()
            .map(|(index, chunk)| Node { index, chunk })
            .collect();
        Self {
            nodes,
            edges: BTreeMap::new(),
        }
    }

    /// Insert or replace an edge.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidInput`] when an endpoint is out of range
    /// or the edge is a self-loop.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        let n = self.nodes.len();
        if edge.source >= n || edge.target >= n {
            return Err(GraphError::InvalidInput(format!(
                "edge ({}, {}) references a node outside 0..{}",
                edge.source, edge.target, n
            )));
        }
        let key = EdgeKey::new(edge.source, edge.target).ok_or_else(|| {
            GraphError::InvalidInput(format!("self-loop on node {}", edge.source))
        })?;
        let edge = Edge {
            source: key.low,
            target: key.high,
            ..edge
        };
        self.edges.insert(key, edge);
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Edges in ascending `(low, high)` order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Edge between `a` and `b` in either direction.
    pub fn edge(&self, a: usize, b: usize) -> Option<&Edge> {
        EdgeKey::new(a, b).and_then(|key| self.edges.get(&key))
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edge(a, b).is_some()
    }

    /// All edge weights in edge order.
    pub fn edge_weights(&self) -> Vec<f64> {
        self.edges.values().map(|e| e.weight).collect()
    }

    /// Neighbor lists per node, each ascending.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for key in self.edges.keys() {
            if let Some(list) = adjacency.get_mut(key.low) {
                list.push(key.high);
            }
            if let Some(list) = adjacency.get_mut(key.high) {
                list.push(key.low);
            }
        }
        for list in &mut adjacency {
            list.sort_unstable();
        }
        adjacency
    }

    /// Copy of this graph keeping every node and only the edges matching `keep`.
    pub fn filter_edges<F>(&self, mut keep: F) -> Graph
    where
        F: FnMut(&Edge) -> bool,
    {
        let edges = self
            .edges
            .iter()
            .filter(|(_, edge)| keep(edge))
            .map(|(key, edge)| (*key, edge.clone()))
            .collect();
        Graph {
            nodes: self.nodes.clone(),
            edges,
        }
    }

    /// Bulk insert of edges already validated by the builder.
    pub(crate) fn extend_edges(&mut self, edges: impl IntoIterator<Item = Edge>) {
        for edge in edges {
            self.edges.insert(edge.key(), edge);
        }
    }
}
