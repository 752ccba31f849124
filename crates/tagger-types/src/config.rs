//! Configuration loading for the graphrag tagger.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at `<config dir>/graphrag-tagger/config.toml`.

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::TaggerError;

/// Main driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Folder holding the classified chunk records
    #[serde(default = "default_input_folder")]
    pub input_folder: String,

    /// Folder receiving the component map (created if missing)
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// File-name pattern for chunk records, at most one `*`
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,

    /// Edge pruning percentile; values below 1 are read as fractions
    #[serde(default = "default_threshold_percentile")]
    pub threshold_percentile: f64,

    /// Comma-separated content-type allow-list, empty admits everything
    #[serde(default)]
    pub content_type_filter: String,

    /// Name of the component map file inside `output_folder`
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Optional name of a pruned-graph snapshot inside `output_folder`
    #[serde(default)]
    pub graph_output: Option<String>,

    /// Build the graph on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_input_folder() -> String {
    "data/test/results".to_string()
}

fn default_output_folder() -> String {
    "data/test".to_string()
}

fn default_file_pattern() -> String {
    "chunk_*.json".to_string()
}

fn default_threshold_percentile() -> f64 {
    97.5
}

fn default_output_file() -> String {
    "connected_components.json".to_string()
}

fn default_parallel() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_folder: default_input_folder(),
            output_folder: default_output_folder(),
            file_pattern: default_file_pattern(),
            threshold_percentile: default_threshold_percentile(),
            content_type_filter: String::new(),
            output_file: default_output_file(),
            graph_output: None,
            parallel: default_parallel(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (`<config dir>/graphrag-tagger/config.toml`)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (`TAGGER_*`, e.g. `TAGGER_THRESHOLD_PERCENTILE`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, TaggerError> {
        let config_dir = ProjectDirs::from("", "", "graphrag-tagger")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("input_folder", default_input_folder())
            .map_err(|e| TaggerError::Config(e.to_string()))?
            .set_default("output_folder", default_output_folder())
            .map_err(|e| TaggerError::Config(e.to_string()))?
            .set_default("file_pattern", default_file_pattern())
            .map_err(|e| TaggerError::Config(e.to_string()))?
            .set_default("threshold_percentile", default_threshold_percentile())
            .map_err(|e| TaggerError::Config(e.to_string()))?
            .set_default("content_type_filter", String::new())
            .map_err(|e| TaggerError::Config(e.to_string()))?
            .set_default("output_file", default_output_file())
            .map_err(|e| TaggerError::Config(e.to_string()))?
            .set_default("parallel", default_parallel())
            .map_err(|e| TaggerError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| TaggerError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Single underscore after the prefix, keys keep their own underscores.
        builder = builder.add_source(
            Environment::with_prefix("TAGGER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| TaggerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| TaggerError::Config(e.to_string()))
    }

    /// Allowed content types, empty when no filter is configured.
    pub fn content_types(&self) -> Vec<String> {
        self.content_type_filter
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Full path of the component map file.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_folder).join(&self.output_file)
    }

    /// Full path of the pruned-graph snapshot, when one was requested.
    pub fn graph_output_path(&self) -> Option<PathBuf> {
        self.graph_output
            .as_ref()
            .map(|name| PathBuf::from(&self.output_folder).join(name))
    }
}
