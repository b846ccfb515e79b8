use std::collections::HashMap;

use crate::data::CandidateItem;
use crate::types::TopicId;

/// Aggregate skew metrics for per-topic item counts in a quiz.
#[derive(Clone, Debug, PartialEq)]
pub struct TopicSkew {
    /// Items counted.
    pub total: usize,
    /// Distinct topics among them.
    pub topics: usize,
    /// Smallest per-topic count.
    pub min: usize,
    /// Largest per-topic count.
    pub max: usize,
    /// Mean items per topic.
    pub mean: f64,
    /// `max / total`.
    pub max_share: f64,
    /// `min / total`.
    pub min_share: f64,
    /// `max / min`; 1.0 means perfectly even.
    pub ratio: f64,
    /// Shares sorted by count descending, then topic.
    pub per_topic: Vec<TopicShare>,
}

/// Per-topic share of a quiz.
#[derive(Clone, Debug, PartialEq)]
pub struct TopicShare {
    /// Topic name.
    pub topic: TopicId,
    /// Items on this topic.
    pub count: usize,
    /// `count / total`.
    pub share: f64,
}

/// Compute skew metrics from the topics of `items`.
pub fn topic_skew(items: &[CandidateItem]) -> Option<TopicSkew> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.topic.as_str()).or_insert(0) += 1;
    }
    topic_skew_from_counts(&counts)
}

fn topic_skew_from_counts(counts: &HashMap<&str, usize>) -> Option<TopicSkew> {
    let total: usize = counts.values().sum();
    let min = *counts.values().min()?;
    let max = *counts.values().max()?;
    let topics = counts.len();
    let share = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    };
    let ratio = if min == 0 {
        f64::INFINITY
    } else {
        max as f64 / min as f64
    };
    let mut per_topic: Vec<TopicShare> = counts
        .iter()
        .map(|(topic, count)| TopicShare {
            topic: topic.to_string(),
            count: *count,
            share: share(*count),
        })
        .collect();
    per_topic.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.topic.cmp(&b.topic)));
    Some(TopicSkew {
        total,
        topics,
        min,
        max,
        mean: total as f64 / topics as f64,
        max_share: share(max),
        min_share: share(min),
        ratio,
        per_topic,
    })
}
