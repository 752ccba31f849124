//! Graph core configuration.

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::pruning::{Percentile, DEFAULT_PERCENTILE};

/// Configuration consumed by [`crate::GraphPipeline`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Raw pruning percentile; values below 1 are read as fractions
    #[serde(default = "default_threshold_percentile")]
    pub threshold_percentile: f64,

    /// Evaluate candidate pairs on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_threshold_percentile() -> f64 {
    DEFAULT_PERCENTILE
}

fn default_parallel() -> bool {
    true
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            threshold_percentile: default_threshold_percentile(),
            parallel: default_parallel(),
        }
    }
}

impl GraphConfig {
    /// Config with the given raw percentile and default parallelism.
    pub fn with_percentile(threshold_percentile: f64) -> Self {
        Self {
            threshold_percentile,
            ..Default::default()
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Normalize and validate the configured percentile.
    pub fn validate(&self) -> Result<Percentile, GraphError> {
        Percentile::new(self.threshold_percentile)
    }
}
