//! Percentile-threshold edge pruning.
//!
//! The threshold is the `p`-th percentile of all edge weights with linear
//! interpolation between closest ranks. Edges strictly below it are dropped;
//! every node is kept, whatever its remaining degree.

use tracing::{info, instrument};

use crate::error::GraphError;
use crate::graph::Graph;
use crate::stats::WeightStats;

/// Default pruning percentile.
pub const DEFAULT_PERCENTILE: f64 = 97.5;

/// A validated percentile in `(0, 100]`.
///
/// Construction is the only place where fractional input is rescaled, so a
/// value can never be normalized twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentile(f64);

impl Percentile {
    /// Normalize and validate a raw percentile.
    ///
    /// Values below 1 are read as fractions and multiplied by 100.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidPercentile`] when the normalized value is
    /// not finite or lies outside `(0, 100]`.
    pub fn new(raw: f64) -> Result<Self, GraphError> {
        let value = if raw < 1.0 { raw * 100.0 } else { raw };
        if !value.is_finite() || value <= 0.0 || value > 100.0 {
            return Err(GraphError::InvalidPercentile(raw));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Percentile {
    fn default() -> Self {
        Self(DEFAULT_PERCENTILE)
    }
}

impl TryFrom<f64> for Percentile {
    type Error = GraphError;

    fn try_from(raw: f64) -> Result<Self, Self::Error> {
        Percentile::new(raw)
    }
}

impl From<Percentile> for f64 {
    fn from(p: Percentile) -> Self {
        p.0
    }
}

impl std::fmt::Display for Percentile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Percentile of ascending `sorted` values by linear interpolation.
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = ((p / 100.0) * last as f64).clamp(0.0, last as f64);
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    let low_value = *sorted.get(low)?;
    let high_value = *sorted.get(high)?;
    if low == high {
        Some(low_value)
    } else {
        let weight = rank - low as f64;
        // Rounding must not carry the result past the upper neighbour.
        Some((low_value + (high_value - low_value) * weight).min(high_value))
    }
}

/// Result of a pruning pass.
#[derive(Debug, Clone)]
pub struct PruneOutcome {
    /// Copy of the input graph with sub-threshold edges removed
    pub graph: Graph,
    /// Percentile the threshold was derived from
    pub percentile: Percentile,
    /// Minimum weight an edge needed to survive
    pub threshold: f64,
    /// Number of removed edges
    pub removed: usize,
    /// Weight statistics of the input graph
    pub weight_stats: WeightStats,
}

/// Removes edges below a percentile-derived weight threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphPruner {
    percentile: Percentile,
}

impl GraphPruner {
    pub fn new(percentile: Percentile) -> Self {
        Self { percentile }
    }

    pub fn percentile(&self) -> Percentile {
        self.percentile
    }

    /// Weight threshold for `graph` at the configured percentile.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyGraph`] when the graph has no edges.
    pub fn threshold(&self, graph: &Graph) -> Result<f64, GraphError> {
        let mut weights = graph.edge_weights();
        weights.sort_by(f64::total_cmp);
        percentile(&weights, self.percentile.value()).ok_or(GraphError::EmptyGraph)
    }

    /// Prune `graph` without modifying it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyGraph`] when the graph has no edges.
    #[instrument(skip(self, graph), fields(percentile = self.percentile.value(), edges = graph.edge_count()))]
    pub fn prune(&self, graph: &Graph) -> Result<PruneOutcome, GraphError> {
        let weights = graph.edge_weights();
        let weight_stats = WeightStats::from_weights(&weights).ok_or(GraphError::EmptyGraph)?;
        info!(
            min = weight_stats.min,
            max = weight_stats.max,
            mean = weight_stats.mean,
            median = weight_stats.median,
            "Edge weight distribution"
        );

        let threshold = self.threshold(graph)?;
        info!(
            percentile = self.percentile.value(),
            threshold, "Pruning threshold"
        );

        let pruned = graph.filter_edges(|edge| edge.weight >= threshold);
        let removed = graph.edge_count() - pruned.edge_count();
        info!(
            removed,
            total = graph.edge_count(),
            nodes = pruned.node_count(),
            edges = pruned.edge_count(),
            "Graph pruned"
        );

        Ok(PruneOutcome {
            graph: pruned,
            percentile: self.percentile,
            threshold,
            removed,
            weight_stats,
        })
    }
}
