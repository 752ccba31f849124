//! Graph core error types.

use thiserror::Error;

/// Errors that can occur while scoring, building, or pruning the chunk graph.
///
/// All of them indicate malformed input; none are retried.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// No chunks, or no topic occurrences, to score
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Pruning requested on a graph without edges
    #[error("Graph has no edges; percentile threshold is undefined")]
    EmptyGraph,

    /// Percentile outside (0, 100] after normalization
    #[error("Invalid percentile: {0} (expected a value in (0, 100])")]
    InvalidPercentile(f64),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
