//! Metrics registry backed by the `prometheus` crate.
//!
//! Each metric name is a constant-sample collector registered into a
//! [`prometheus::Registry`]. Samples carry their own timestamp, so a gather
//! reports the value and time of the latest observation rather than the time
//! of the scrape. Registration is idempotent and observing a sample keeps only
//! the latest value. A registry is meant to live for a single collection cycle.

use crate::models::{LabelSet, MetricType, Observation};
use chrono::{DateTime, Utc};
use prometheus::core::{Collector, Desc};
use prometheus::proto;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to acquire lock on the registry.
    #[error("Failed to acquire lock on metric registry")]
    LockError,

    /// The metric name, help text or label names were rejected.
    #[error("Invalid metric '{name}': {source}")]
    InvalidDescriptor {
        /// The metric name.
        name: String,
        /// The underlying error.
        #[source]
        source: prometheus::Error,
    },

    /// The metric was registered before with a different help text or type.
    #[error("Metric '{name}' is already registered with a different description")]
    HelpMismatch {
        /// The metric name.
        name: String,
    },

    /// The metric was registered before with different label names.
    #[error("Metric '{name}' is already registered with labels {expected:?}")]
    LabelMismatch {
        /// The metric name.
        name: String,
        /// Label names of the existing family.
        expected: Vec<String>,
    },

    /// The sample key was not produced by this registry.
    #[error("Metric '{0}' has no registered sample for the given labels")]
    UnknownSample(String),

    /// The underlying Prometheus registry or encoder failed.
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// Addresses one sample slot in a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleKey {
    /// The metric name.
    pub name: String,
    /// The label set of the sample.
    pub labels: LabelSet,
}

/// The latest observed value of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// The observed value.
    pub value: f64,
    /// When the value was observed.
    pub timestamp: DateTime<Utc>,
}

impl From<MetricType> for proto::MetricType {
    fn from(metric_type: MetricType) -> Self {
        match metric_type {
            MetricType::Counter => proto::MetricType::COUNTER,
            MetricType::Gauge => proto::MetricType::GAUGE,
        }
    }
}

type Samples = BTreeMap<LabelSet, Option<Sample>>;

/// One metric name and its timestamped samples.
///
/// Clones share the sample map, so the copy boxed into the Prometheus registry
/// sees every observation made through the wrapper.
#[derive(Clone)]
struct ConstFamily {
    desc: Arc<Desc>,
    metric_type: MetricType,
    samples: Arc<RwLock<Samples>>,
}

impl ConstFamily {
    fn new(
        name: &str,
        help: &str,
        metric_type: MetricType,
        labels: &LabelSet,
    ) -> Result<Self, RegistryError> {
        let desc = Desc::new(
            name.to_string(),
            help.to_string(),
            labels.keys().cloned().collect(),
            HashMap::new(),
        )
        .map_err(|source| RegistryError::InvalidDescriptor {
            name: name.to_string(),
            source,
        })?;

        Ok(Self {
            desc: Arc::new(desc),
            metric_type,
            samples: Arc::new(RwLock::new(BTreeMap::new())),
        })
    }

    fn label_names(&self) -> &[String] {
        &self.desc.variable_labels
    }

    fn const_metric(&self, labels: &LabelSet, sample: &Sample) -> proto::Metric {
        let mut metric = proto::Metric::default();
        for (name, value) in labels {
            let mut pair = proto::LabelPair::default();
            pair.set_name(name.clone());
            pair.set_value(value.clone());
            metric.mut_label().push(pair);
        }

        match self.metric_type {
            MetricType::Counter => {
                let mut counter = proto::Counter::default();
                counter.set_value(sample.value);
                metric.set_counter(counter);
            }
            MetricType::Gauge => {
                let mut gauge = proto::Gauge::default();
                gauge.set_value(sample.value);
                metric.set_gauge(gauge);
            }
        }

        metric.set_timestamp_ms(sample.timestamp.timestamp_millis());
        metric
    }
}

impl Collector for ConstFamily {
    fn desc(&self) -> Vec<&Desc> {
        vec![self.desc.as_ref()]
    }

    fn collect(&self) -> Vec<proto::MetricFamily> {
        let Ok(samples) = self.samples.read() else {
            tracing::warn!(metric = %self.desc.fq_name, "Skipping metric with poisoned lock");
            return Vec::new();
        };

        let mut family = proto::MetricFamily::default();
        family.set_name(self.desc.fq_name.clone());
        family.set_help(self.desc.help.clone());
        family.set_field_type(self.metric_type.into());
        for (labels, sample) in samples
            .iter()
            .filter_map(|(labels, sample)| sample.as_ref().map(|s| (labels, s)))
        {
            family.mut_metric().push(self.const_metric(labels, sample));
        }

        vec![family]
    }
}

/// Thread-safe registry of metric families.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use shared::models::{LabelSet, MetricType};
/// use shared::registry::MetricRegistry;
///
/// let registry = MetricRegistry::new();
/// let labels = LabelSet::from([("repo".to_string(), "gokit".to_string())]);
///
/// let key = registry.register("github_stars", "Stars", MetricType::Gauge, labels.clone()).unwrap();
/// let again = registry.register("github_stars", "Stars", MetricType::Gauge, labels).unwrap();
/// assert_eq!(key, again);
///
/// registry.observe(&key, 3.0, Utc::now()).unwrap();
/// assert_eq!(registry.sample_count().unwrap(), 1);
/// assert_eq!(registry.gather().len(), 1);
/// ```
#[derive(Default)]
pub struct MetricRegistry {
    registry: prometheus::Registry,
    families: RwLock<BTreeMap<String, ConstFamily>>,
}

impl std::fmt::Debug for MetricRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .families
            .read()
            .map(|families| families.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("MetricRegistry")
            .field("families", &names)
            .finish_non_exhaustive()
    }
}

impl MetricRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sample slot, returning its key.
    ///
    /// Registering an existing name with the same help text, type and label
    /// names is not an error: the existing family is reused, and an existing
    /// label set maps to the same slot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The metric or a label name is not valid exposition syntax, or the help is empty
    /// - The name was registered before with different help text, type or label names
    /// - The lock cannot be acquired
    pub fn register(
        &self,
        name: &str,
        help: &str,
        metric_type: MetricType,
        labels: LabelSet,
    ) -> Result<SampleKey, RegistryError> {
        let mut families = self
            .families
            .write()
            .map_err(|_| RegistryError::LockError)?;

        if !families.contains_key(name) {
            let family = ConstFamily::new(name, help, metric_type, &labels)?;
            self.registry.register(Box::new(family.clone()))?;
            families.insert(name.to_string(), family);
        }
        let family = families
            .get(name)
            .ok_or_else(|| RegistryError::UnknownSample(name.to_string()))?;

        if family.desc.help != help || family.metric_type != metric_type {
            return Err(RegistryError::HelpMismatch {
                name: name.to_string(),
            });
        }
        if !family.label_names().iter().eq(labels.keys()) {
            return Err(RegistryError::LabelMismatch {
                name: name.to_string(),
                expected: family.label_names().to_vec(),
            });
        }

        family
            .samples
            .write()
            .map_err(|_| RegistryError::LockError)?
            .entry(labels.clone())
            .or_insert(None);

        Ok(SampleKey {
            name: name.to_string(),
            labels,
        })
    }

    /// Stores the latest value and timestamp for a registered sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not registered or the lock cannot be acquired.
    pub fn observe(
        &self,
        key: &SampleKey,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        let families = self
            .families
            .read()
            .map_err(|_| RegistryError::LockError)?;
        let family = families
            .get(&key.name)
            .ok_or_else(|| RegistryError::UnknownSample(key.name.clone()))?;

        let mut samples = family
            .samples
            .write()
            .map_err(|_| RegistryError::LockError)?;
        let slot = samples
            .get_mut(&key.labels)
            .ok_or_else(|| RegistryError::UnknownSample(key.name.clone()))?;

        *slot = Some(Sample { value, timestamp });
        Ok(())
    }

    /// Registers and observes an observation in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    pub fn record(&self, observation: Observation) -> Result<SampleKey, RegistryError> {
        let key = self.register(
            &observation.name,
            &observation.help,
            observation.metric_type,
            observation.labels,
        )?;
        self.observe(&key, observation.value, observation.timestamp)?;
        Ok(key)
    }

    /// Returns the latest sample for a name and label set, if observed.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    pub fn get(&self, name: &str, labels: &LabelSet) -> Result<Option<Sample>, RegistryError> {
        let families = self
            .families
            .read()
            .map_err(|_| RegistryError::LockError)?;
        let Some(family) = families.get(name) else {
            return Ok(None);
        };

        let samples = family
            .samples
            .read()
            .map_err(|_| RegistryError::LockError)?;
        Ok(samples.get(labels).copied().flatten())
    }

    /// Gathers every family with at least one observed sample.
    ///
    /// Families are ordered by name and samples by label values.
    #[must_use]
    pub fn gather(&self) -> Vec<proto::MetricFamily> {
        self.registry.gather()
    }

    /// Returns the number of observed samples across all families.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired.
    pub fn sample_count(&self) -> Result<usize, RegistryError> {
        let families = self
            .families
            .read()
            .map_err(|_| RegistryError::LockError)?;

        families.values().try_fold(0, |count, family| {
            let samples = family
                .samples
                .read()
                .map_err(|_| RegistryError::LockError)?;
            Ok(count + samples.values().filter(|s| s.is_some()).count())
        })
    }
}
