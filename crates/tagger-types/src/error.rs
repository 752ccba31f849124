//! Error types for the graphrag tagger.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or chunk records.
#[derive(Debug, Error)]
pub enum TaggerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error with the offending path
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TaggerError {
    /// Wrap an I/O error together with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaggerError::Io {
            path: path.into(),
            source,
        }
    }
}
