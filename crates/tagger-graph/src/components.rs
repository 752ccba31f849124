//! Connected-component labeling of the pruned graph.
//!
//! Breadth-first traversal from every unvisited node in ascending index
//! order. Each traversal root receives the next sequential id, so ids follow
//! the smallest node index of their component. Weights are ignored.

use std::collections::VecDeque;

use serde::ser::{Serialize, Serializer};
use tracing::{info, instrument};

use crate::graph::Graph;
use crate::stats::ComponentSizeStats;

/// Mapping from node index to component id.
///
/// Serializes as a flat `{"<node>": <component>}` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMap {
    assignments: Vec<usize>,
    count: usize,
}

impl ComponentMap {
    /// Component id of `node`.
    pub fn component_of(&self, node: usize) -> Option<usize> {
        self.assignments.get(node).copied()
    }

    /// Number of distinct components.
    pub fn component_count(&self) -> usize {
        self.count
    }

    /// Number of mapped nodes.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// `(node, component)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.assignments.iter().copied().enumerate()
    }

    /// Members of each component, indexed by id, each ascending.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut components = vec![Vec::new(); self.count];
        for (node, id) in self.iter() {
            if let Some(members) = components.get_mut(id) {
                members.push(node);
            }
        }
        components
    }

    /// Size of each component, indexed by id.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.count];
        for &id in &self.assignments {
            if let Some(size) = sizes.get_mut(id) {
                *size += 1;
            }
        }
        sizes
    }

    /// Whether `a` and `b` fall in the same component.
    pub fn same_component(&self, a: usize, b: usize) -> bool {
        match (self.component_of(a), self.component_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn size_stats(&self) -> Option<ComponentSizeStats> {
        ComponentSizeStats::from_sizes(&self.sizes())
    }
}

impl Serialize for ComponentMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Assigns component ids using retained edges only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentLabeler;

impl ComponentLabeler {
    pub fn new() -> Self {
        Self
    }

    /// Label every node of `graph`, isolated nodes included.
    #[instrument(skip(self, graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
    pub fn label(&self, graph: &Graph) -> ComponentMap {
        let adjacency = graph.adjacency();
        let n = adjacency.len();
        let mut assignments: Vec<Option<usize>> = vec![None; n];
        let mut count = 0;
        let mut queue = VecDeque::new();

        for root in 0..n {
            if assignments[root].is_some() {
                continue;
            }
            let id = count;
            count += 1;
            assignments[root] = Some(id);
            queue.push_back(root);

            while let Some(node) = queue.pop_front() {
                for &next in &adjacency[node] {
                    if assignments[next].is_none() {
                        assignments[next] = Some(id);
                        queue.push_back(next);
                    }
                }
            }
        }

        let map = ComponentMap {
            assignments: assignments.into_iter().map(|a| a.unwrap_or_default()).collect(),
            count,
        };

        if let Some(stats) = map.size_stats() {
            info!(
                components = stats.count,
                min_size = stats.min,
                max_size = stats.max,
                mean_size = stats.mean,
                "Connected components computed"
            );
        }
        map
    }
}
