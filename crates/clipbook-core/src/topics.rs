//! Topic content index and topic vocabulary.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use clipbook_model::{Excerpt, RowSet, RowStatus, normalize_topic};

use crate::excerpt::excerpt_for;

/// Topic key -> excerpts in row order.
///
/// Keys iterate in lexicographic order, which is the document order.
/// A key exists only while it has at least one excerpt. Every excerpt
/// remembers its source row, so the live index always equals a replay
/// of the row statuses no matter which order the rows were bulleted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TopicContentIndex {
    topics: BTreeMap<String, TopicExcerpts>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
struct TopicExcerpts {
    #[serde(skip)]
    rows: Vec<usize>,
    excerpts: Vec<Excerpt>,
}

impl TopicContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay every bulleted row.
    pub fn from_rows(rows: &RowSet) -> Self {
        let mut index = Self::new();
        for (row_index, row) in rows.iter().enumerate() {
            if let RowStatus::Bulleted(topic) = &row.status {
                index.insert(topic, row_index, excerpt_for(row));
            }
        }
        index
    }

    /// File the excerpt of row `row_index` under `topic`. A row already
    /// filed there has its excerpt replaced.
    pub fn insert(&mut self, topic: &str, row_index: usize, excerpt: Excerpt) {
        let bucket = self.topics.entry(topic.to_string()).or_default();
        match bucket.rows.binary_search(&row_index) {
            Ok(slot) => bucket.excerpts[slot] = excerpt,
            Err(slot) => {
                bucket.rows.insert(slot, row_index);
                bucket.excerpts.insert(slot, excerpt);
            }
        }
    }

    /// Remove the excerpt row `row_index` contributed to `topic`,
    /// dropping the key once empty.
    pub fn remove_row(&mut self, topic: &str, row_index: usize) -> Option<Excerpt> {
        let bucket = self.topics.get_mut(topic)?;
        let slot = bucket.rows.binary_search(&row_index).ok()?;
        bucket.rows.remove(slot);
        let removed = bucket.excerpts.remove(slot);
        if bucket.rows.is_empty() {
            self.topics.remove(topic);
        }
        Some(removed)
    }

    pub fn get(&self, topic: &str) -> Option<&[Excerpt]> {
        self.topics.get(topic).map(|bucket| bucket.excerpts.as_slice())
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.topics.contains_key(topic)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Excerpt])> + '_ {
        self.topics
            .iter()
            .map(|(topic, bucket)| (topic.as_str(), bucket.excerpts.as_slice()))
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn excerpt_count(&self) -> usize {
        self.topics.values().map(|bucket| bucket.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn clear(&mut self) {
        self.topics.clear();
    }
}

/// Known topics offered to the reviewer.
///
/// Seeded from a starter list, extended by every bullet, restored to the
/// seed on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicVocabulary {
    seed: BTreeSet<String>,
    topics: BTreeSet<String>,
}

impl TopicVocabulary {
    pub fn new<I, S>(starter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seed: BTreeSet<String> = starter
            .into_iter()
            .filter_map(|topic| normalize_topic(topic.as_ref()))
            .collect();
        Self {
            topics: seed.clone(),
            seed,
        }
    }

    /// Add a topic. Returns `true` when it was not known yet.
    pub fn register(&mut self, topic: &str) -> bool {
        self.topics.insert(topic.to_string())
    }

    pub fn reset(&mut self) {
        self.topics = self.seed.clone();
    }

    /// Seed plus every topic present in `index`.
    pub fn rebuild(&mut self, index: &TopicContentIndex) {
        self.reset();
        for (topic, _) in index.iter() {
            self.topics.insert(topic.to_string());
        }
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }

    /// Topic at a 1-based position in sorted order.
    pub fn nth(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|idx| self.topics.iter().nth(idx))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.topics.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
