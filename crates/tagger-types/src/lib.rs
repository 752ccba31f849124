//! # tagger-types
//!
//! Shared domain types for the graphrag tagger.
//!
//! This crate defines the data structures passed between the driver and the
//! graph core:
//! - Chunks: text units annotated with an ordered topic list
//! - Chunk records: the raw JSON shape produced by the classification step
//! - Settings: layered configuration for the driver
//!
//! ## Usage
//!
//! ```rust
//! use tagger_types::Chunk;
//!
//! let chunk = Chunk::new("some text", "doc.pdf", vec!["rust".to_string()]);
//! assert_eq!(chunk.topics.len(), 1);
//! ```

pub mod chunk;
pub mod config;
pub mod error;

pub use chunk::{Chunk, ChunkRecord, Classification};
pub use config::Settings;
pub use error::TaggerError;
