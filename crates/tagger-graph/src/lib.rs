//! # tagger-graph
//!
//! Chunk similarity graph construction, pruning, and clustering.
//!
//! Chunks annotated with ranked topic lists become nodes; chunks sharing a
//! topic are joined by an edge weighted by topic rank and corpus-wide topic
//! rarity. Weak edges are pruned at a weight percentile and the connected
//! components of what remains are the document clusters.
//!
//! ## Stages
//! - [`TopicScorer`]: rank-weighted rarity score per topic
//! - [`GraphBuilder`]: weighted undirected graph over an inverted topic index
//! - [`GraphPruner`]: percentile-threshold edge removal
//! - [`ComponentLabeler`]: node -> component id
//! - [`GraphPipeline`]: all of the above in order
//!
//! ## Usage
//!
//! ```rust
//! use tagger_graph::{GraphConfig, GraphPipeline};
//! use tagger_types::Chunk;
//!
//! let chunks = vec![
//!     Chunk::new("doc1", "f1", vec!["a".into(), "b".into()]),
//!     Chunk::new("doc2", "f2", vec!["b".into(), "c".into()]),
//!     Chunk::new("doc3", "f3", vec!["a".into(), "c".into()]),
//! ];
//! let output = GraphPipeline::new(GraphConfig::with_percentile(50.0))
//!     .run(chunks)
//!     .unwrap();
//! assert_eq!(output.components.len(), 3);
//! ```

pub mod builder;
pub mod components;
pub mod config;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod pruning;
pub mod scoring;
pub mod snapshot;
pub mod stats;

pub use builder::GraphBuilder;
pub use components::{ComponentLabeler, ComponentMap};
pub use config::GraphConfig;
pub use error::GraphError;
pub use graph::{Edge, EdgeKey, Graph, Node, TopicContribution};
pub use pipeline::{GraphPipeline, PipelineOutput};
pub use pruning::{percentile, GraphPruner, Percentile, PruneOutcome, DEFAULT_PERCENTILE};
pub use scoring::{RankHistogram, TopicScoreTable, TopicScorer};
pub use snapshot::{GraphSnapshot, NodeView};
pub use stats::{ComponentSizeStats, WeightStats};
