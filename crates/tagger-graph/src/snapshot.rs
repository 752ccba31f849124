//! Serializable view of a graph for inspection.

use serde::Serialize;

use crate::components::ComponentMap;
use crate::graph::{Edge, Graph};

/// One node as written to a snapshot.
#[derive(Debug, Serialize)]
pub struct NodeView<'a> {
    pub index: usize,
    pub text: &'a str,
    pub source: &'a str,
    pub topics: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<usize>,
}

/// Borrowed snapshot of nodes, edges, and optional pruning metadata.
#[derive(Debug, Serialize)]
pub struct GraphSnapshot<'a> {
    pub node_count: usize,
    pub edge_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_count: Option<usize>,
    pub nodes: Vec<NodeView<'a>>,
    pub edges: Vec<&'a Edge>,
}

impl<'a> GraphSnapshot<'a> {
    /// Snapshot of `graph` alone.
    pub fn new(graph: &'a Graph) -> Self {
        Self::build(graph, None, None)
    }

    /// Snapshot annotated with the pruning threshold and component ids.
    pub fn annotated(graph: &'a Graph, threshold: f64, components: &ComponentMap) -> Self {
        Self::build(graph, Some(threshold), Some(components))
    }

    fn build(graph: &'a Graph, threshold: Option<f64>, components: Option<&ComponentMap>) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| NodeView {
                index: node.index(),
                text: node.text(),
                source: node.source(),
                topics: node.topics(),
                component_id: components.and_then(|c| c.component_of(node.index())),
            })
            .collect();

        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            threshold,
            component_count: components.map(ComponentMap::component_count),
            nodes,
            edges: graph.edges().collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
