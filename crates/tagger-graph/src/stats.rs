//! Summary statistics logged and returned by the pipeline stages.

use serde::{Deserialize, Serialize};

use crate::pruning::percentile;

/// Distribution of edge weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl WeightStats {
    /// Statistics over `weights`; `None` when empty.
    pub fn from_weights(weights: &[f64]) -> Option<Self> {
        let mut sorted = weights.to_vec();
        sorted.sort_by(f64::total_cmp);
        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
        let median = percentile(&sorted, 50.0)?;
        Some(Self {
            min,
            max,
            mean,
            median,
        })
    }
}

/// Distribution of component sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentSizeStats {
    pub count: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

impl ComponentSizeStats {
    /// Statistics over `sizes`; `None` when there are no components.
    pub fn from_sizes(sizes: &[usize]) -> Option<Self> {
        let min = *sizes.iter().min()?;
        let max = *sizes.iter().max()?;
        let mean = sizes.iter().sum::<usize>() as f64 / sizes.len() as f64;
        Some(Self {
            count: sizes.len(),
            min,
            max,
            mean,
        })
    }
}
