//! Core data types for the time-series store

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An immutable key/value label on a metric.
///
/// Values are never absent; equality and ordering are by the full pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}

/// A set of tags (key-value pairs) with a precomputed identity hash
/// Tags are stored in sorted order for deterministic hashing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeSet<Tag>", into = "BTreeSet<Tag>")]
pub struct TagSet {
    tags: BTreeSet<Tag>,
    hash: u64,
}

impl TagSet {
    /// Create a new TagSet from a set of tags
    pub fn new(tags: BTreeSet<Tag>) -> Self {
        let hash = Self::compute_hash(&tags);
        TagSet { tags, hash }
    }

    /// Create an empty TagSet
    pub fn empty() -> Self {
        Self::new(BTreeSet::new())
    }

    /// Create TagSet from slice of (key, value) tuples
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(pairs.iter().map(|(k, v)| Tag::new(*k, *v)).collect())
    }

    /// Parse tags from "key:value,key2:value2" format
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return Self::empty();
        }

        let tags: BTreeSet<Tag> = s
            .split(',')
            .filter_map(|pair| {
                let mut parts = pair.splitn(2, ':');
                let key = parts.next()?.trim();
                let value = parts.next()?.trim();
                if key.is_empty() || value.is_empty() {
                    None
                } else {
                    Some(Tag::new(key, value))
                }
            })
            .collect();
        Self::new(tags)
    }

    /// Get the precomputed hash
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Iterate tags in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Get the value of the first tag carrying `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// Set union, deduplicated by the full (key, value) pair
    pub fn union(&self, other: &TagSet) -> TagSet {
        Self::new(self.tags.union(&other.tags).cloned().collect())
    }

    /// Compute hash from sorted tags
    fn compute_hash(tags: &BTreeSet<Tag>) -> u64 {
        let mut hasher = DefaultHasher::new();
        for tag in tags {
            tag.key.hash(&mut hasher);
            tag.value.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for TagSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<BTreeSet<Tag>> for TagSet {
    fn from(tags: BTreeSet<Tag>) -> Self {
        Self::new(tags)
    }
}

impl From<TagSet> for BTreeSet<Tag> {
    fn from(set: TagSet) -> Self {
        set.tags
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tag in &self.tags {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}", tag)?;
            first = false;
        }
        Ok(())
    }
}

/// The identity of a time series.
///
/// Intrinsic tags define identity: two metrics with equal intrinsic tag sets
/// resolve to the same series no matter how they were constructed. Meta tags
/// are descriptive and searchable but never contribute to equality or
/// hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    intrinsic_tags: TagSet,
    meta_tags: TagSet,
}

impl Metric {
    /// Create a metric identified by its intrinsic tags, with no meta tags
    pub fn new(intrinsic_tags: TagSet) -> Self {
        Metric {
            intrinsic_tags,
            meta_tags: TagSet::empty(),
        }
    }

    /// Attach descriptive meta tags
    pub fn with_meta_tags(mut self, meta_tags: TagSet) -> Self {
        self.meta_tags = meta_tags;
        self
    }

    pub fn intrinsic_tags(&self) -> &TagSet {
        &self.intrinsic_tags
    }

    pub fn meta_tags(&self) -> &TagSet {
        &self.meta_tags
    }

    /// Combined searchable tag set: intrinsic and meta, deduplicated.
    /// Used only for query matching, never for identity.
    pub fn searchable_tags(&self) -> TagSet {
        self.intrinsic_tags.union(&self.meta_tags)
    }

    /// Canonical identity string, derived from the intrinsic tags only
    pub fn key(&self) -> String {
        self.intrinsic_tags.to_string()
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.intrinsic_tags == other.intrinsic_tags
    }
}

impl Eq for Metric {}

impl Hash for Metric {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.intrinsic_tags.hash());
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.intrinsic_tags)?;
        if !self.meta_tags.is_empty() {
            write!(f, " [{}]", self.meta_tags)?;
        }
        Ok(())
    }
}

/// A single immutable reading belonging to exactly one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Identity of the series this sample belongs to
    pub metric: Metric,
    /// Timestamp in epoch milliseconds
    pub timestamp_ms: u64,
    /// The reading itself
    pub value: f64,
}

impl Sample {
    pub fn new(metric: Metric, timestamp_ms: u64, value: f64) -> Self {
        Sample {
            metric,
            timestamp_ms,
            value,
        }
    }
}

/// Query-time summarization mode.
///
/// Only `None` is implemented by this engine; every other mode is an explicit
/// capability boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    None,
    Average,
    Min,
    Max,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Aggregation::None => "NONE",
            Aggregation::Average => "AVERAGE",
            Aggregation::Min => "MIN",
            Aggregation::Max => "MAX",
        };
        write!(f, "{}", name)
    }
}

/// A raw sample fetch: one metric, an exclusive time window, an aggregation
/// mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesRequest {
    pub metric: Metric,
    /// Exclusive lower bound, epoch milliseconds
    pub start_ms: u64,
    /// Exclusive upper bound, epoch milliseconds
    pub end_ms: u64,
    pub aggregation: Aggregation,
}

impl TimeseriesRequest {
    /// Create a raw (unaggregated) fetch request
    pub fn new(metric: Metric, start_ms: u64, end_ms: u64) -> Self {
        TimeseriesRequest {
            metric,
            start_ms,
            end_ms,
            aggregation: Aggregation::None,
        }
    }

    /// Set the aggregation mode
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }
}
