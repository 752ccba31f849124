//! Rank-weighted rarity scoring for topics.
//!
//! Every topic occurrence is bucketed by its 1-indexed rank. A topic's
//! rank-weighted frequency is `f(t) = sum(rank * count)` over its buckets,
//! and its rarity score is the inverse-frequency transform
//! `score(t) = ln(total / f(t))` where `total` sums `f` over all topics.
//!
//! Duplicate labels inside one chunk are counted once per occurrence, each
//! at its own rank.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tagger_types::Chunk;
use tracing::{debug, info, instrument};

use crate::error::GraphError;

/// Per-topic occurrence counts bucketed by 1-indexed rank.
#[derive(Debug, Clone, Default)]
pub struct RankHistogram {
    buckets: HashMap<String, BTreeMap<usize, u64>>,
}

impl RankHistogram {
    /// Count every topic occurrence of every chunk.
    pub fn from_chunks<C: Borrow<Chunk>>(chunks: &[C]) -> Self {
        let mut buckets: HashMap<String, BTreeMap<usize, u64>> = HashMap::new();
        for chunk in chunks {
            let chunk: &Chunk = chunk.borrow();
            for (rank, topic) in chunk.topics.iter().enumerate() {
                *buckets
                    .entry(topic.clone())
                    .or_default()
                    .entry(rank + 1)
                    .or_insert(0) += 1;
            }
        }
        Self { buckets }
    }

    /// Number of occurrences of `topic` at the 1-indexed `rank`.
    pub fn count(&self, topic: &str, rank: usize) -> u64 {
        self.buckets
            .get(topic)
            .and_then(|ranks| ranks.get(&rank))
            .copied()
            .unwrap_or(0)
    }

    /// `sum(rank * count)` for `topic`, 0 when the topic never occurs.
    pub fn rank_weighted_frequency(&self, topic: &str) -> u64 {
        self.buckets
            .get(topic)
            .map(|ranks| ranks.iter().map(|(rank, count)| *rank as u64 * count).sum())
            .unwrap_or(0)
    }

    /// Number of distinct topics.
    pub fn topic_count(&self) -> usize {
        self.buckets.len()
    }

    /// Iterate over the distinct topics.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }
}

/// Read-only mapping from topic label to rarity score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicScoreTable {
    scores: HashMap<String, f64>,
}

impl TopicScoreTable {
    /// Wrap precomputed scores.
    pub fn from_scores(scores: HashMap<String, f64>) -> Self {
        Self { scores }
    }

    /// Give every listed topic the same score.
    pub fn uniform<I, S>(topics: I, score: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scores: topics.into_iter().map(|t| (t.into(), score)).collect(),
        }
    }

    /// Score of `topic`, if known.
    pub fn get(&self, topic: &str) -> Option<f64> {
        self.scores.get(topic).copied()
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.scores.contains_key(topic)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(t, s)| (t.as_str(), *s))
    }

    /// Topics sorted by descending score, ties broken by label.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Computes the corpus-wide [`TopicScoreTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicScorer;

impl TopicScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score every topic occurring in `chunks`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyInput`] when there are no chunks or no topic
    /// occurrences at all.
    #[instrument(skip(self, chunks), fields(chunks = chunks.len()))]
    pub fn compute<C: Borrow<Chunk>>(&self, chunks: &[C]) -> Result<TopicScoreTable, GraphError> {
        if chunks.is_empty() {
            return Err(GraphError::EmptyInput("no chunks to score".to_string()));
        }

        let histogram = RankHistogram::from_chunks(chunks);
        let frequencies: HashMap<&str, u64> = histogram
            .topics()
            .map(|topic| (topic, histogram.rank_weighted_frequency(topic)))
            .collect();
        let total: u64 = frequencies.values().sum();

        if total == 0 {
            return Err(GraphError::EmptyInput(
                "chunks carry no topic occurrences".to_string(),
            ));
        }

        debug!(
            topics = frequencies.len(),
            total_frequency = total,
            "Built rank histogram"
        );

        let scores = frequencies
            .into_iter()
            .map(|(topic, frequency)| {
                let score = (total as f64 / frequency as f64).ln();
                (topic.to_string(), score)
            })
            .collect();

        let table = TopicScoreTable::from_scores(scores);
        info!(topics = table.len(), "Scores computed");
        Ok(table)
    }
}
