//! Observation data model.
//!
//! An `Observation` is a single named, labeled, timestamped numeric sample,
//! ready to be recorded into a [`MetricRegistry`](crate::registry::MetricRegistry).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label name to label value. Ordered, so label sets compare and render
/// deterministically.
pub type LabelSet = BTreeMap<String, String>;

/// Type of metric, as announced in the `# TYPE` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    /// A counter that only increases.
    Counter,
    /// A gauge that can go up or down.
    #[default]
    Gauge,
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Counter => write!(f, "counter"),
            Self::Gauge => write!(f, "gauge"),
        }
    }
}

/// A single measurement.
///
/// # Example
///
/// ```
/// use shared::models::{MetricType, Observation};
///
/// let observation = Observation::gauge("github_stars", "Number of stargazers", 12.0)
///     .with_label("repo", "gokit")
///     .with_label("owner", "function61");
///
/// assert_eq!(observation.metric_type, MetricType::Gauge);
/// assert_eq!(observation.labels.get("repo").map(String::as_str), Some("gokit"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// The metric name (e.g., "`github_stars`").
    pub name: String,

    /// Help text for the metric family.
    pub help: String,

    /// The type of metric.
    #[serde(default)]
    pub metric_type: MetricType,

    /// Labels (dimensions) for the sample.
    #[serde(default)]
    pub labels: LabelSet,

    /// The measured value.
    pub value: f64,

    /// When the value was observed.
    pub timestamp: DateTime<Utc>,
}

impl Observation {
    /// Creates a new observation with the current timestamp and no labels.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        metric_type: MetricType,
        value: f64,
    ) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            metric_type,
            labels: LabelSet::new(),
            value,
            timestamp: Utc::now(),
        }
    }

    /// Creates a new gauge observation.
    #[must_use]
    pub fn gauge(name: impl Into<String>, help: impl Into<String>, value: f64) -> Self {
        Self::new(name, help, MetricType::Gauge, value)
    }

    /// Adds a label to the observation.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Sets the timestamp of the observation.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_observation_gauge() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let observation = Observation::gauge("github_forks", "Number of forks", 3.0)
            .with_label("repo", "prompipe")
            .with_timestamp(ts);

        assert_eq!(observation.name, "github_forks");
        assert_eq!(observation.metric_type, MetricType::Gauge);
        assert_eq!(observation.value, 3.0);
        assert_eq!(observation.timestamp, ts);
        assert_eq!(observation.labels.len(), 1);
    }

    #[test]
    fn test_label_set_is_ordered_by_name() {
        let observation = Observation::gauge("m", "h", 1.0)
            .with_label("repo", "a")
            .with_label("id", "1")
            .with_label("owner", "b");

        let keys: Vec<&str> = observation.labels.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "owner", "repo"]);
    }

    #[test]
    fn test_metric_type_display() {
        assert_eq!(MetricType::Counter.to_string(), "counter");
        assert_eq!(MetricType::Gauge.to_string(), "gauge");
        assert_eq!(MetricType::default(), MetricType::Gauge);
    }

    #[test]
    fn test_observation_serialization() {
        let observation = Observation::gauge("github_size", "Size", 42.0).with_label("repo", "x");

        let json = serde_json::to_string(&observation).unwrap();

        assert!(json.contains("\"name\":\"github_size\""));
        assert!(json.contains("\"metric_type\":\"gauge\""));
        assert!(json.contains("\"value\":42.0"));
    }
}
