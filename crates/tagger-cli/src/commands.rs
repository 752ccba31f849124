//! Command implementations for the graph tagger.
//!
//! Handles:
//! - build: load chunks, run the graph pipeline, persist the component map
//! - scores: load chunks and print the topic score table

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use tagger_graph::{GraphConfig, GraphPipeline, PipelineOutput, TopicScorer};
use tagger_types::{Chunk, Settings};

use crate::loader::{load_chunks, ContentTypeFilter, FilePattern};

/// CLI values layered over the loaded settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub input_folder: Option<String>,
    pub output_folder: Option<String>,
    pub threshold_percentile: Option<f64>,
    pub content_type_filter: Option<String>,
    pub file_pattern: Option<String>,
    pub graph_output: Option<String>,
    pub sequential: bool,
    pub log_level: Option<String>,
}

impl SettingsOverrides {
    /// Apply every set override to `settings`.
    pub fn apply(self, settings: &mut Settings) {
        if let Some(input_folder) = self.input_folder {
            settings.input_folder = input_folder;
        }
        if let Some(output_folder) = self.output_folder {
            settings.output_folder = output_folder;
        }
        if let Some(threshold_percentile) = self.threshold_percentile {
            settings.threshold_percentile = threshold_percentile;
        }
        if let Some(content_type_filter) = self.content_type_filter {
            settings.content_type_filter = content_type_filter;
        }
        if let Some(file_pattern) = self.file_pattern {
            settings.file_pattern = file_pattern;
        }
        if let Some(graph_output) = self.graph_output {
            settings.graph_output = Some(graph_output);
        }
        if self.sequential {
            settings.parallel = false;
        }
        if let Some(log_level) = self.log_level {
            settings.log_level = log_level;
        }
    }
}

/// What a build run produced and where it was written.
#[derive(Debug)]
pub struct BuildSummary {
    pub output: PipelineOutput,
    pub chunk_count: usize,
    pub filtered: usize,
    pub output_path: PathBuf,
    pub graph_output_path: Option<PathBuf>,
}

/// Load settings (defaults -> files -> env) and apply CLI overrides.
pub fn resolve_settings(config_path: Option<&str>, overrides: SettingsOverrides) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    overrides.apply(&mut settings);
    Ok(settings)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {e}"))
}

fn load_corpus(settings: &Settings) -> Result<(Vec<Chunk>, usize)> {
    let pattern = FilePattern::parse(&settings.file_pattern).context("Invalid file pattern")?;
    let filter = ContentTypeFilter::new(settings.content_types());
    let report = load_chunks(Path::new(&settings.input_folder), &pattern, &filter)
        .with_context(|| format!("Failed to load chunks from {}", settings.input_folder))?;
    Ok((report.chunks, report.filtered))
}

/// Run the full pipeline described by `settings` and persist its outputs.
pub fn process_graph(settings: &Settings) -> Result<BuildSummary> {
    info!(
        input = %settings.input_folder,
        output = %settings.output_folder,
        percentile = settings.threshold_percentile,
        "Processing graph..."
    );

    let config = GraphConfig::with_percentile(settings.threshold_percentile)
        .with_parallel(settings.parallel);
    config.validate().context("Invalid threshold percentile")?;

    let (chunks, filtered) = load_corpus(settings)?;
    let chunk_count = chunks.len();

    let output = GraphPipeline::new(config)
        .run(chunks)
        .context("Graph pipeline failed")?;

    let output_path = settings.output_path();
    let graph_output_path = settings.graph_output_path();
    let components_json = serde_json::to_string(&output.components)?;
    let snapshot_json = match &graph_output_path {
        Some(_) => Some(output.snapshot().to_json_pretty()?),
        None => None,
    };

    fs::create_dir_all(&settings.output_folder)
        .with_context(|| format!("Failed to create {}", settings.output_folder))?;

    // The component map goes last so it only exists after a complete run.
    if let (Some(path), Some(json)) = (&graph_output_path, snapshot_json) {
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Pruned graph snapshot saved");
    }

    fs::write(&output_path, components_json)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    info!(path = %output_path.display(), "Connected components map saved");

    Ok(BuildSummary {
        output,
        chunk_count,
        filtered,
        output_path,
        graph_output_path,
    })
}

/// `build` command.
pub fn handle_build(settings: &Settings) -> Result<()> {
    let summary = process_graph(settings)?;
    let pruned = &summary.output.pruned;
    println!(
        "{} chunks ({} filtered) -> {} edges, {} kept at threshold {:.4} (p{}), {} components",
        summary.chunk_count,
        summary.filtered,
        summary.output.graph.edge_count(),
        pruned.graph.edge_count(),
        pruned.threshold,
        pruned.percentile,
        summary.output.components.component_count()
    );
    println!("Component map: {}", summary.output_path.display());
    if let Some(path) = &summary.graph_output_path {
        println!("Graph snapshot: {}", path.display());
    }
    Ok(())
}

/// `scores` command.
pub fn handle_scores(settings: &Settings, limit: usize) -> Result<()> {
    let (chunks, _) = load_corpus(settings)?;
    let scores = TopicScorer::new()
        .compute(&chunks)
        .context("Failed to compute topic scores")?;

    println!("{} topics", scores.len());
    for (topic, score) in scores.ranked().into_iter().take(limit) {
        println!("{score:>10.4}  {topic}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let mut settings = Settings::default();
        SettingsOverrides {
            input_folder: Some("in".to_string()),
            threshold_percentile: Some(0.5),
            graph_output: Some("g.json".to_string()),
            sequential: true,
            ..Default::default()
        }
        .apply(&mut settings);

        assert_eq!(settings.input_folder, "in");
        assert_eq!(settings.output_folder, "data/test");
        assert!((settings.threshold_percentile - 0.5).abs() < f64::EPSILON);
        assert_eq!(settings.graph_output.as_deref(), Some("g.json"));
        assert!(!settings.parallel);
    }

    #[test]
    fn test_empty_overrides_keep_settings() {
        let mut settings = Settings::default();
        SettingsOverrides::default().apply(&mut settings);
        assert!(settings.parallel);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_process_graph_rejects_bad_percentile_before_loading() {
        let settings = Settings {
            input_folder: "/definitely/not/a/folder".to_string(),
            threshold_percentile: 250.0,
            ..Settings::default()
        };
        let err = process_graph(&settings).unwrap_err();
        assert!(err.to_string().contains("percentile"));
    }
}
