//! Batch pipeline: score -> build -> prune -> label.

use std::sync::Arc;

use tagger_types::Chunk;
use tracing::{info, instrument};

use crate::builder::GraphBuilder;
use crate::components::{ComponentLabeler, ComponentMap};
use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::graph::Graph;
use crate::pruning::{GraphPruner, PruneOutcome};
use crate::scoring::{TopicScoreTable, TopicScorer};
use crate::snapshot::GraphSnapshot;
use crate::stats::ComponentSizeStats;

/// Every artifact produced by one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Topic rarity scores
    pub scores: TopicScoreTable,
    /// Unpruned graph
    pub graph: Graph,
    /// Pruned graph with threshold and weight statistics
    pub pruned: PruneOutcome,
    /// Node -> component id over the pruned graph
    pub components: ComponentMap,
    /// Component size distribution
    pub component_stats: Option<ComponentSizeStats>,
}

impl PipelineOutput {
    /// Pruned graph annotated with threshold and component ids.
    pub fn snapshot(&self) -> GraphSnapshot<'_> {
        GraphSnapshot::annotated(&self.pruned.graph, self.pruned.threshold, &self.components)
    }
}

/// Runs the whole graph core over one in-memory chunk set.
///
/// The pipeline holds no state between runs; identical input and config
/// always give identical output.
#[derive(Debug, Clone, Default)]
pub struct GraphPipeline {
    config: GraphConfig,
}

impl GraphPipeline {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Run every stage over `chunks`.
    ///
    /// The percentile is validated before any scoring or traversal work.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidPercentile`] for a percentile outside `(0, 100]`
    /// - [`GraphError::EmptyInput`] when there is nothing to score
    /// - [`GraphError::EmptyGraph`] when no two chunks share a topic
    #[instrument(skip(self, chunks), fields(chunks = chunks.len()))]
    pub fn run(&self, chunks: Vec<Chunk>) -> Result<PipelineOutput, GraphError> {
        let percentile = self.config.validate()?;

        let chunks: Vec<Arc<Chunk>> = chunks.into_iter().map(Arc::new).collect();
        let scores = TopicScorer::new().compute(&chunks)?;
        let graph = GraphBuilder::new()
            .with_parallel(self.config.parallel)
            .build_shared(&chunks, &scores)?;
        let pruned = GraphPruner::new(percentile).prune(&graph)?;
        let components = ComponentLabeler::new().label(&pruned.graph);
        let component_stats = components.size_stats();

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            retained = pruned.graph.edge_count(),
            components = components.component_count(),
            "Graph processing complete"
        );

        Ok(PipelineOutput {
            scores,
            graph,
            pruned,
            components,
            component_stats,
        })
    }
}
