//! The [Sample] record: the immutable unit this crate stores and queries.

use std::collections::BTreeMap;

/// One `(timestamp, metric, value, tags)` data point.
///
/// Immutable once constructed. `tags` uses a [BTreeMap] rather than a
/// `HashMap` so the durability log's canonical encoding (§4.2) is
/// deterministic across runs with the same logical content — useful for
/// the replay-idempotence property and for diffing log files in tests.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    pub timestamp: i64,
    pub metric: String,
    pub value: f64,
    pub tags: BTreeMap<String, String>,
}

impl Sample {
    pub fn new(
        timestamp: i64,
        metric: impl Into<String>,
        value: f64,
        tags: BTreeMap<String, String>,
    ) -> Sample {
        Sample {
            timestamp,
            metric: metric.into(),
            value,
            tags,
        }
    }

    /// Does this sample carry `(key, value)` verbatim among its tags?
    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tags.get(key).map(|v| v.as_str()) == Some(value)
    }
}

#[cfg(test)]
#[path = "sample_test.rs"]
mod sample_test;
