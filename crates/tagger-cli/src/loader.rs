//! Chunk record loading.
//!
//! Reads every file directly inside the input folder whose name matches the
//! configured pattern, in path order, and turns admitted records into
//! [`Chunk`]s.

use std::fs;
use std::path::{Path, PathBuf};

use tagger_types::{Chunk, ChunkRecord, TaggerError};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

/// File-name pattern with at most one `*` wildcard, e.g. `chunk_*.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    prefix: String,
    suffix: Option<String>,
}

impl FilePattern {
    /// Parse a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`TaggerError::InvalidInput`] for an empty pattern or one with
    /// more than one `*`.
    pub fn parse(pattern: &str) -> Result<Self, TaggerError> {
        if pattern.is_empty() {
            return Err(TaggerError::InvalidInput(
                "file pattern must not be empty".to_string(),
            ));
        }
        let mut parts = pattern.split('*');
        let prefix = parts.next().unwrap_or_default().to_string();
        let suffix = parts.next().map(str::to_string);
        if parts.next().is_some() {
            return Err(TaggerError::InvalidInput(format!(
                "file pattern '{pattern}' has more than one '*'"
            )));
        }
        Ok(Self { prefix, suffix })
    }

    /// Whether `name` matches the pattern.
    pub fn matches(&self, name: &str) -> bool {
        match &self.suffix {
            None => name == self.prefix,
            Some(suffix) => {
                name.len() >= self.prefix.len() + suffix.len()
                    && name.starts_with(&self.prefix)
                    && name.ends_with(suffix.as_str())
            }
        }
    }
}

/// Content-type allow-list; empty admits everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypeFilter {
    allowed: Vec<String>,
}

impl ContentTypeFilter {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    pub fn is_active(&self) -> bool {
        !self.allowed.is_empty()
    }

    /// Records without a content type are rejected by an active filter.
    pub fn admits(&self, content_type: Option<&str>) -> bool {
        if !self.is_active() {
            return true;
        }
        content_type.is_some_and(|ct| self.allowed.iter().any(|a| a == ct))
    }
}

/// Outcome of loading a chunk folder.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Admitted chunks in file order
    pub chunks: Vec<Chunk>,
    /// Number of matching files read
    pub files: usize,
    /// Records dropped by the content-type filter
    pub filtered: usize,
}

/// Matching files directly inside `folder`, sorted by path.
pub fn list_chunk_files(folder: &Path, pattern: &FilePattern) -> Result<Vec<PathBuf>, TaggerError> {
    if !folder.is_dir() {
        return Err(TaggerError::io(
            folder,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input folder not found"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.map_err(|e| walk_error(folder, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matched = entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.matches(name));
        if matched {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn walk_error(folder: &Path, err: walkdir::Error) -> TaggerError {
    let path = err.path().unwrap_or(folder).to_path_buf();
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other(message));
    TaggerError::io(path, source)
}

/// Parse one chunk record file.
pub fn read_record(path: &Path) -> Result<ChunkRecord, TaggerError> {
    let content = fs::read_to_string(path).map_err(|e| TaggerError::io(path, e))?;
    ChunkRecord::from_json(&content).map_err(|e| {
        TaggerError::InvalidInput(format!("{}: {}", path.display(), e))
    })
}

/// Load every admitted chunk from `folder`.
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn load_chunks(
    folder: &Path,
    pattern: &FilePattern,
    filter: &ContentTypeFilter,
) -> Result<LoadReport, TaggerError> {
    let files = list_chunk_files(folder, pattern)?;
    info!(files = files.len(), "Found chunk files");
    if filter.is_active() {
        info!(allowed = ?filter.allowed, "Filtering by content type");
    }

    let mut report = LoadReport {
        files: files.len(),
        ..Default::default()
    };

    for path in &files {
        let record = read_record(path)?;
        if !filter.admits(record.content_type()) {
            debug!(path = %path.display(), content_type = ?record.content_type(), "Skipped by filter");
            report.filtered += 1;
            continue;
        }
        report.chunks.push(Chunk::from(record));
    }

    info!(
        loaded = report.chunks.len(),
        filtered = report.filtered,
        "Loaded chunk records"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_pattern_matching() {
        let pattern = FilePattern::parse("chunk_*.json").unwrap();
        assert!(pattern.matches("chunk_1.json"));
        assert!(pattern.matches("chunk_.json"));
        assert!(!pattern.matches("chunk_1.txt"));
        assert!(!pattern.matches("other_1.json"));
        assert!(!pattern.matches("chunk.json"));

        let exact = FilePattern::parse("data.json").unwrap();
        assert!(exact.matches("data.json"));
        assert!(!exact.matches("data.json.bak"));

        let any = FilePattern::parse("*").unwrap();
        assert!(any.matches("anything"));
    }

    #[test]
    fn test_pattern_rejects_bad_input() {
        assert!(FilePattern::parse("").is_err());
        assert!(FilePattern::parse("a*b*c").is_err());
    }

    #[test]
    fn test_content_type_filter() {
        let open = ContentTypeFilter::default();
        assert!(open.admits(None));
        assert!(open.admits(Some("footer")));

        let filter = ContentTypeFilter::new(vec!["paragraph".to_string()]);
        assert!(filter.admits(Some("paragraph")));
        assert!(!filter.admits(Some("footer")));
        assert!(!filter.admits(None));
    }

    #[test]
    fn test_load_chunks_sorted_and_parsed() {
        let dir = tempfile::TempDir::new().unwrap();
        write(
            dir.path(),
            "chunk_2.json",
            r#"{"chunk": "doc2", "source_file": "f2", "classification": {"topics": ["b", "c"]}}"#,
        );
        write(
            dir.path(),
            "chunk_1.json",
            r#"{"chunk": "doc1", "source_file": "f1", "classification": {"topics": ["a", "b"]}}"#,
        );
        write(dir.path(), "notes.txt", "ignored");

        let report = load_chunks(
            dir.path(),
            &FilePattern::parse("chunk_*.json").unwrap(),
            &ContentTypeFilter::default(),
        )
        .unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(report.chunks.len(), 2);
        assert_eq!(report.chunks[0].text, "doc1");
        assert_eq!(report.chunks[1].topics, vec!["b", "c"]);
    }

    #[test]
    fn test_load_chunks_applies_filter() {
        let dir = tempfile::TempDir::new().unwrap();
        write(
            dir.path(),
            "chunk_1.json",
            r#"{"chunk": "body", "source_file": "f", "classification": {"topics": ["a"], "content_type": "paragraph"}}"#,
        );
        write(
            dir.path(),
            "chunk_2.json",
            r#"{"chunk": "page 3", "source_file": "f", "classification": {"topics": ["a"], "content_type": "footer"}}"#,
        );
        write(
            dir.path(),
            "chunk_3.json",
            r#"{"chunk": "bare", "source_file": "f", "classification": ["a"]}"#,
        );

        let report = load_chunks(
            dir.path(),
            &FilePattern::parse("chunk_*.json").unwrap(),
            &ContentTypeFilter::new(vec!["paragraph".to_string()]),
        )
        .unwrap();

        assert_eq!(report.files, 3);
        assert_eq!(report.filtered, 2);
        assert_eq!(report.chunks.len(), 1);
        assert_eq!(report.chunks[0].text, "body");
    }

    #[test]
    fn test_malformed_file_names_path() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "chunk_1.json", "{not json");
        let err = load_chunks(
            dir.path(),
            &FilePattern::parse("chunk_*.json").unwrap(),
            &ContentTypeFilter::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("chunk_1.json"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_chunk_file_is_loaded() {
        let dir = tempfile::TempDir::new().unwrap();
        let outside = tempfile::TempDir::new().unwrap();
        write(
            outside.path(),
            "real.json",
            r#"{"chunk": "linked", "source_file": "f", "classification": ["a"]}"#,
        );
        std::os::unix::fs::symlink(
            outside.path().join("real.json"),
            dir.path().join("chunk_1.json"),
        )
        .unwrap();

        let files =
            list_chunk_files(dir.path(), &FilePattern::parse("chunk_*.json").unwrap()).unwrap();
        assert_eq!(files, vec![dir.path().join("chunk_1.json")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_names_its_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let dangling = dir.path().join("chunk_9.json");
        std::os::unix::fs::symlink(dir.path().join("gone.json"), &dangling).unwrap();

        let err = list_chunk_files(dir.path(), &FilePattern::parse("chunk_*.json").unwrap())
            .unwrap_err();
        match err {
            TaggerError::Io { path, .. } => assert_eq!(path, dangling),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_folder() {
        let err = list_chunk_files(
            Path::new("/definitely/not/a/folder"),
            &FilePattern::parse("*.json").unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, TaggerError::Io { .. }));
    }
}
