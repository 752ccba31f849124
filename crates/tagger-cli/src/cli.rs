//! CLI argument parsing for the graph tagger.
//!
//! CLI flags override every other config source.

use clap::{Parser, Subcommand};

/// GraphRAG Tagger
///
/// Builds a topic-similarity graph over classified chunks and clusters it.
#[derive(Parser, Debug)]
#[command(name = "graph-tagger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides the default user config file)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Tagger commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build, prune, and cluster the chunk graph
    Build {
        /// Folder with classified chunk JSON files
        #[arg(short, long)]
        input_folder: Option<String>,

        /// Folder receiving the component map
        #[arg(short, long)]
        output_folder: Option<String>,

        /// Pruning percentile (values below 1 are read as fractions)
        #[arg(short, long)]
        threshold_percentile: Option<f64>,

        /// Comma-separated content types to admit
        #[arg(long)]
        content_type_filter: Option<String>,

        /// Chunk file-name pattern
        #[arg(short, long)]
        pattern: Option<String>,

        /// Also write the pruned graph to this file inside the output folder
        #[arg(long)]
        graph_output: Option<String>,

        /// Build the graph on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Print the topic rarity scores of a corpus
    Scores {
        /// Folder with classified chunk JSON files
        #[arg(short, long)]
        input_folder: Option<String>,

        /// Chunk file-name pattern
        #[arg(short, long)]
        pattern: Option<String>,

        /// Comma-separated content types to admit
        #[arg(long)]
        content_type_filter: Option<String>,

        /// Maximum topics to print
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}
