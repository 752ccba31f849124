//! GraphRAG Tagger
//!
//! Links classified chunks that share topics into a weighted graph, prunes
//! weak links, and writes the connected-component id of every chunk.
//!
//! # Usage
//!
//! ```bash
//! graph-tagger build [-i INPUT] [-o OUTPUT] [-t PERCENTILE] [--content-type-filter TYPES]
//! graph-tagger scores [-i INPUT] [-n LIMIT]
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/graphrag-tagger/config.toml)
//! 3. Environment variables (TAGGER_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use tagger_cli::{
    handle_build, handle_scores, init_logging, resolve_settings, Cli, Commands, SettingsOverrides,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input_folder,
            output_folder,
            threshold_percentile,
            content_type_filter,
            pattern,
            graph_output,
            sequential,
        } => {
            let settings = resolve_settings(
                cli.config.as_deref(),
                SettingsOverrides {
                    input_folder,
                    output_folder,
                    threshold_percentile,
                    content_type_filter,
                    file_pattern: pattern,
                    graph_output,
                    sequential,
                    log_level: cli.log_level,
                },
            )?;
            init_logging(&settings.log_level)?;
            handle_build(&settings)?;
        }
        Commands::Scores {
            input_folder,
            pattern,
            content_type_filter,
            limit,
        } => {
            let settings = resolve_settings(
                cli.config.as_deref(),
                SettingsOverrides {
                    input_folder,
                    content_type_filter,
                    file_pattern: pattern,
                    log_level: cli.log_level,
                    ..Default::default()
                },
            )?;
            init_logging(&settings.log_level)?;
            handle_scores(&settings, limit)?;
        }
    }

    Ok(())
}
