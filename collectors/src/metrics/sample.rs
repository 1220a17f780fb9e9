use serde::Serialize;
use std::collections::BTreeMap;

/// Labels are kept sorted by key so that every scrape renders them in the same order.
pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
    Gauge,
}

/// A single data point of a scrape.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricSample {
    name: String,
    kind: MetricKind,
    value: f64,
    labels: Labels,
    help: String,
}

impl MetricSample {
    pub fn new(name: impl Into<String>, kind: MetricKind, value: f64, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
            labels: Labels::new(),
            help: help.into(),
        }
    }

    pub fn gauge(name: impl Into<String>, value: f64, help: impl Into<String>) -> Self {
        Self::new(name, MetricKind::Gauge, value, help)
    }

    pub fn counter(name: impl Into<String>, value: f64, help: impl Into<String>) -> Self {
        Self::new(name, MetricKind::Counter, value, help)
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_labels<K, V>(mut self, labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.labels
            .extend(labels.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn help(&self) -> &str {
        &self.help
    }
}

/// Joins the non-empty parts of a metric name with `_`, e.g. `logstash_stats_jvm_uptime_millis`.
pub fn fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}
