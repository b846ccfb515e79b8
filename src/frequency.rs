//! Historical topic frequencies and the topic weights derived from them.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::QuizError;
use crate::types::TopicId;

/// How often each topic has appeared in past exams.
///
/// Weights are relative to the most frequent topic, so the top topic always
/// weighs `1.0`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicFrequencyTable {
    counts: IndexMap<TopicId, u32>,
}

impl TopicFrequencyTable {
    /// Empty table; every topic gets the fallback weight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping topic to appearance count.
    pub fn from_json_str(raw: &str) -> Result<Self, QuizError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a frequency JSON object from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Add `count` appearances to `topic`.
    pub fn record(&mut self, topic: impl Into<TopicId>, count: u32) {
        let entry = self.counts.entry(topic.into()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Recorded appearances of `topic`, if tracked.
    pub fn count(&self, topic: &str) -> Option<u32> {
        self.counts.get(topic).copied()
    }

    /// Number of tracked topics.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no topic is tracked.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Weight in [0, 1] for `topic`; `fallback` when the topic is not tracked
    /// or no topic has any appearances yet.
    pub fn weight(&self, topic: &str, fallback: f64) -> f64 {
        let max = self.counts.values().copied().max().unwrap_or(0);
        if max == 0 {
            return fallback;
        }
        match self.counts.get(topic) {
            Some(&count) => (count as f64 / max as f64).clamp(0.0, 1.0),
            None => fallback,
        }
    }
}

impl<T: Into<TopicId>> FromIterator<(T, u32)> for TopicFrequencyTable {
    fn from_iter<I: IntoIterator<Item = (T, u32)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (topic, count) in iter {
            table.record(topic, count);
        }
        table
    }
}
