//! Graph tagger library exports.
//!
//! This crate provides the `graph-tagger` binary.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (build, scores)
//! - `loader`: Chunk record discovery and parsing

pub mod cli;
pub mod commands;
pub mod loader;

pub use cli::{Cli, Commands};
pub use commands::{
    handle_build, handle_scores, init_logging, process_graph, resolve_settings, BuildSummary,
    SettingsOverrides,
};
pub use loader::{load_chunks, ContentTypeFilter, FilePattern, LoadReport};
