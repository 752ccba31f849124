//! End-to-end test infrastructure for the graph tagger.
//!
//! Provides a shared TestHarness and corpus generators for E2E tests
//! covering the load -> score -> build -> prune -> label pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tagger_types::{Chunk, Settings};

/// Shared test harness for E2E tests.
///
/// Owns a temp directory with an input folder for chunk files and an
/// output folder for the component map.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Folder the chunk files are written to
    pub input_folder: PathBuf,
    /// Folder the pipeline writes to
    pub output_folder: PathBuf,
}

impl TestHarness {
    /// Create a new test harness with an empty input folder.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let input_folder = temp_dir.path().join("results");
        let output_folder = temp_dir.path().join("graph");
        std::fs::create_dir_all(&input_folder).expect("Failed to create input dir");

        Self {
            _temp_dir: temp_dir,
            input_folder,
            output_folder,
        }
    }

    /// Write one chunk record as `chunk_{index}.json`.
    pub fn write_chunk(&self, index: usize, topics: &[&str], content_type: Option<&str>) {
        let mut classification = serde_json::json!({ "topics": topics });
        if let Some(ct) = content_type {
            classification["content_type"] = serde_json::json!(ct);
        }
        let record = serde_json::json!({
            "chunk": format!("doc{index}"),
            "source_file": format!("file{index}"),
            "classification": classification,
        });
        self.write_raw(
            &format!("chunk_{index}.json"),
            &serde_json::to_string(&record).expect("Failed to serialize chunk"),
        );
    }

    /// Write every chunk of `corpus`, zero-padded so file order matches index order.
    pub fn write_corpus(&self, corpus: &[Chunk]) {
        for (index, chunk) in corpus.iter().enumerate() {
            let record = serde_json::json!({
                "chunk": chunk.text,
                "source_file": chunk.source,
                "classification": { "topics": chunk.topics },
            });
            self.write_raw(
                &format!("chunk_{index:05}.json"),
                &serde_json::to_string(&record).expect("Failed to serialize chunk"),
            );
        }
    }

    /// Write arbitrary file content into the input folder.
    pub fn write_raw(&self, name: &str, content: &str) {
        std::fs::write(self.input_folder.join(name), content).expect("Failed to write file");
    }

    /// Settings pointing at the harness folders.
    pub fn settings(&self, threshold_percentile: f64) -> Settings {
        Settings {
            input_folder: self.input_folder.display().to_string(),
            output_folder: self.output_folder.display().to_string(),
            threshold_percentile,
            ..Settings::default()
        }
    }

    /// Read back the persisted component map.
    pub fn read_components(&self) -> BTreeMap<usize, usize> {
        let path = self.output_folder.join("connected_components.json");
        let content = std::fs::read_to_string(path).expect("Component map missing");
        let raw: BTreeMap<String, usize> =
            serde_json::from_str(&content).expect("Component map is not JSON");
        raw.into_iter()
            .map(|(k, v)| (k.parse().expect("Node key is not an index"), v))
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Chunk with generated text and source and the given ranked topics.
pub fn chunk(topics: &[&str]) -> Chunk {
    Chunk::new(
        "text",
        "source",
        topics.iter().map(|t| t.to_string()).collect(),
    )
}

/// Deterministic random corpus.
///
/// Each chunk draws 1..=`max_topics` distinct topics from a vocabulary of
/// `vocabulary` labels.
pub fn random_corpus(seed: u64, chunks: usize, vocabulary: usize, max_topics: usize) -> Vec<Chunk> {
    let mut rng = StdRng::seed_from_u64(seed);
    let labels: Vec<String> = (0..vocabulary).map(|i| format!("topic{i}")).collect();
    let max_topics = max_topics.clamp(1, vocabulary.max(1));

    (0..chunks)
        .map(|i| {
            let wanted = rng.random_range(1..=max_topics);
            let mut topics: Vec<String> = Vec::with_capacity(wanted);
            while topics.len() < wanted {
                let label = &labels[rng.random_range(0..labels.len())];
                if !topics.contains(label) {
                    topics.push(label.clone());
                }
            }
            Chunk::new(format!("chunk {i}"), format!("file{}", i % 7), topics)
        })
        .collect()
}
