//! Tag matcher evaluation
//!
//! Pure predicate logic for metric discovery. No state, no I/O: a matcher
//! either accepts a single tag, or accepts a metric when every matcher in a
//! collection finds at least one satisfying tag.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::StorageError;
use super::types::{Metric, Tag};

/// How a matcher compares a tag value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatcherType {
    Equals,
    NotEquals,
    EqualsRegex,
    NotEqualsRegex,
}

/// A predicate over a single tag, used for metric discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatcher {
    pub key: String,
    pub value: String,
    pub match_type: MatcherType,
}

impl TagMatcher {
    pub fn new(
        match_type: MatcherType,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        TagMatcher {
            key: key.into(),
            value: value.into(),
            match_type,
        }
    }

    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(MatcherType::Equals, key, value)
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(MatcherType::NotEquals, key, value)
    }

    pub fn equals_regex(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(MatcherType::EqualsRegex, key, pattern)
    }

    pub fn not_equals_regex(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(MatcherType::NotEqualsRegex, key, pattern)
    }
}

/// Whether `tag` satisfies `matcher`.
///
/// A key mismatch is false for every match type, so a `NotEquals` matcher
/// never matches a metric that lacks the key entirely.
pub fn matches_tag(matcher: &TagMatcher, tag: &Tag) -> Result<bool, StorageError> {
    if matcher.key != tag.key {
        return Ok(false); // not even the key matches, no need to look at the value
    }

    // Tag values are never absent, so plain string comparison is enough.
    match matcher.match_type {
        MatcherType::Equals => Ok(tag.value == matcher.value),
        MatcherType::NotEquals => Ok(tag.value != matcher.value),
        MatcherType::EqualsRegex => full_match(&matcher.value, &tag.value),
        MatcherType::NotEqualsRegex => full_match(&matcher.value, &tag.value).map(|m| !m),
    }
}

/// Whether `metric` satisfies every matcher in `matchers`.
///
/// Each matcher must be matched by at least one tag of the metric's combined
/// searchable tag set (intrinsic and meta). An empty matcher slice is
/// trivially true; callers reject it at the store boundary.
pub fn matches_metric(matchers: &[TagMatcher], metric: &Metric) -> Result<bool, StorageError> {
    let searchable = metric.searchable_tags();

    for matcher in matchers {
        let mut matched = false;
        for tag in searchable.iter() {
            if matches_tag(matcher, tag)? {
                matched = true;
                break;
            }
        }
        if !matched {
            return Ok(false); // this matcher found no tag, the metric is out
        }
    }
    Ok(true)
}

/// Full-string regex match: the pattern is anchored, so "abc" does not match
/// "abc123".
fn full_match(pattern: &str, value: &str) -> Result<bool, StorageError> {
    let re = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
        StorageError::InvalidArgument(format!("invalid regex pattern '{}': {}", pattern, e))
    })?;
    Ok(re.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::TagSet;

    fn tag(key: &str, value: &str) -> Tag {
        Tag::new(key, value)
    }

    #[test]
    fn test_key_mismatch_fails_every_match_type() {
        let t = tag("host", "web01");
        for matcher in [
            TagMatcher::equals("env", "web01"),
            TagMatcher::not_equals("env", "web01"),
            TagMatcher::equals_regex("env", ".*"),
            TagMatcher::not_equals_regex("env", "nothing"),
        ] {
            assert!(!matches_tag(&matcher, &t).unwrap());
        }
    }

    #[test]
    fn test_equals_and_not_equals() {
        let t = tag("host", "web01");
        assert!(matches_tag(&TagMatcher::equals("host", "web01"), &t).unwrap());
        assert!(!matches_tag(&TagMatcher::equals("host", "web02"), &t).unwrap());
        assert!(matches_tag(&TagMatcher::not_equals("host", "web02"), &t).unwrap());
        assert!(!matches_tag(&TagMatcher::not_equals("host", "web01"), &t).unwrap());
    }

    #[test]
    fn test_regex_requires_full_match() {
        let t = tag("host", "abc123");
        assert!(!matches_tag(&TagMatcher::equals_regex("host", "abc"), &t).unwrap());
        assert!(matches_tag(&TagMatcher::equals_regex("host", "abc.*"), &t).unwrap());
        assert!(matches_tag(&TagMatcher::equals_regex("host", "abc123"), &t).unwrap());
    }

    #[test]
    fn test_not_equals_regex_negates_full_match() {
        let t = tag("host", "web01");
        assert!(!matches_tag(&TagMatcher::not_equals_regex("host", "web.*"), &t).unwrap());
        assert!(matches_tag(&TagMatcher::not_equals_regex("host", "db.*"), &t).unwrap());
        // Substring-only coverage still counts as a non-match, hence negated to true
        assert!(matches_tag(&TagMatcher::not_equals_regex("host", "web"), &t).unwrap());
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let t = tag("host", "web01");
        let err = matches_tag(&TagMatcher::equals_regex("host", "("), &t).unwrap_err();
        assert!(matches!(err, StorageError::InvalidArgument(_)));
    }

    #[test]
    fn test_metric_requires_every_matcher_to_find_a_tag() {
        let metric = Metric::new(TagSet::from_pairs(&[("host", "a"), ("unit", "ms")]));

        let both = [
            TagMatcher::equals("host", "a"),
            TagMatcher::equals("unit", "ms"),
        ];
        assert!(matches_metric(&both, &metric).unwrap());

        let one_misses = [
            TagMatcher::equals("host", "a"),
            TagMatcher::equals("unit", "bytes"),
        ];
        assert!(!matches_metric(&one_misses, &metric).unwrap());
    }

    #[test]
    fn test_missing_key_never_satisfies_a_matcher() {
        let metric = Metric::new(TagSet::from_pairs(&[("host", "a")]));
        // No "env" tag exists, so even NOT_EQUALS on "env" must fail
        let matchers = [TagMatcher::not_equals("env", "prod")];
        assert!(!matches_metric(&matchers, &metric).unwrap());
    }

    #[test]
    fn test_meta_tags_are_searchable() {
        let metric = Metric::new(TagSet::from_pairs(&[("host", "a")]))
            .with_meta_tags(TagSet::from_pairs(&[("desc", "latency")]));
        let matchers = [TagMatcher::equals("desc", "latency")];
        assert!(matches_metric(&matchers, &metric).unwrap());
    }

    #[test]
    fn test_empty_matcher_slice_is_trivially_true() {
        let metric = Metric::new(TagSet::from_pairs(&[("host", "a")]));
        assert!(matches_metric(&[], &metric).unwrap());
    }
}
