//! Chunk types.
//!
//! A [`Chunk`] is the normalized unit the graph core works on. A
//! [`ChunkRecord`] is the raw record written by the classification step,
//! whose `classification` field is either a detailed object or an already
//! normalized topic list.

use serde::{Deserialize, Serialize};

/// A unit of source text with its ordered topic annotation.
///
/// Rank 0 in `topics` is the most relevant topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text
    pub text: String,
    /// Identifier of the originating document
    pub source: String,
    /// Ordered topic labels, most relevant first
    pub topics: Vec<String>,
    /// Optional classification tag (e.g. "paragraph", "footer")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Chunk {
    /// Create a chunk without a content type.
    pub fn new(text: impl Into<String>, source: impl Into<String>, topics: Vec<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            topics,
            content_type: None,
        }
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Zero-based rank of the first occurrence of `topic`, if present.
    pub fn rank_of(&self, topic: &str) -> Option<usize> {
        self.topics.iter().position(|t| t == topic)
    }
}

/// Classification attached to a raw chunk record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Classification {
    /// Full classifier output
    Detailed {
        #[serde(default)]
        topics: Vec<String>,
        #[serde(default)]
        content_type: Option<String>,
    },
    /// Already normalized ordered topic list
    Topics(Vec<String>),
}

impl Classification {
    /// Ordered topics regardless of shape.
    pub fn topics(&self) -> &[String] {
        match self {
            Classification::Detailed { topics, .. } => topics,
            Classification::Topics(topics) => topics,
        }
    }

    /// Content type, only available on the detailed shape.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Classification::Detailed { content_type, .. } => content_type.as_deref(),
            Classification::Topics(_) => None,
        }
    }
}

/// Raw chunk record as persisted by the classification step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk text
    pub chunk: String,
    /// Originating file
    pub source_file: String,
    /// Classifier output
    pub classification: Classification,
}

impl ChunkRecord {
    /// Parse a record from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Content type of the record, if the classifier produced one.
    pub fn content_type(&self) -> Option<&str> {
        self.classification.content_type()
    }
}

impl From<ChunkRecord> for Chunk {
    fn from(record: ChunkRecord) -> Self {
        let (topics, content_type) = match record.classification {
            Classification::Detailed {
                topics,
                content_type,
            } => (topics, content_type),
            Classification::Topics(topics) => (topics, None),
        };
        Chunk {
            text: record.chunk,
            source: record.source_file,
            topics,
            content_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detailed_record() {
        let json = r#"{
            "chunk": "doc1",
            "source_file": "f1",
            "classification": {"topics": ["a", "b"], "content_type": "paragraph"}
        }"#;
        let record = ChunkRecord::from_json(json).unwrap();
        assert_eq!(record.classification.topics(), ["a", "b"]);
        assert_eq!(record.content_type(), Some("paragraph"));

        let chunk = Chunk::from(record);
        assert_eq!(chunk.text, "doc1");
        assert_eq!(chunk.source, "f1");
        assert_eq!(chunk.topics, vec!["a", "b"]);
        assert_eq!(chunk.content_type.as_deref(), Some("paragraph"));
    }

    #[test]
    fn test_parse_normalized_record() {
        let json = r#"{"chunk": "doc2", "source_file": "f2", "classification": ["b", "c"]}"#;
        let record = ChunkRecord::from_json(json).unwrap();
        assert!(record.content_type().is_none());

        let chunk = Chunk::from(record);
        assert_eq!(chunk.topics, vec!["b", "c"]);
        assert!(chunk.content_type.is_none());
    }

    #[test]
    fn test_detailed_without_topics_is_empty() {
        let json = r#"{"chunk": "x", "source_file": "f", "classification": {"content_type": "footer"}}"#;
        let chunk = Chunk::from(ChunkRecord::from_json(json).unwrap());
        assert!(chunk.topics.is_empty());
        assert_eq!(chunk.content_type.as_deref(), Some("footer"));
    }

    #[test]
    fn test_missing_chunk_field_fails() {
        let json = r#"{"source_file": "f", "classification": []}"#;
        assert!(ChunkRecord::from_json(json).is_err());
    }

    #[test]
    fn test_rank_of_uses_first_occurrence() {
        let chunk = Chunk::new(
            "t",
            "s",
            vec!["a".to_string(), "b".to_string(), "a".to_string()],
        );
        assert_eq!(chunk.rank_of("a"), Some(0));
        assert_eq!(chunk.rank_of("b"), Some(1));
        assert_eq!(chunk.rank_of("z"), None);
    }

    #[test]
    fn test_chunk_serialization_skips_missing_content_type() {
        let chunk = Chunk::new("t", "s", vec!["a".to_string()]);
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(!json.contains("content_type"));
        let decoded: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, chunk);
    }
}
