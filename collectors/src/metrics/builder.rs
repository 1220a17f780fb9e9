use super::{
    fq_name,
    Labels,
    MetricKind,
    MetricSample,
    NAMESPACE,
};

/// Accumulates the samples of one sub-collector.
///
/// Every sample gets its name prefixed with `logstash_<subsystem>_` and carries the labels of the enclosing
/// [`scope`](SampleBuilder::scope) calls. Values passed as `None` are skipped, which is how absent optional fields
/// of a payload are dropped.
#[derive(Debug)]
pub struct SampleBuilder {
    subsystem: &'static str,
    labels: Labels,
    samples: Vec<MetricSample>,
}

impl SampleBuilder {
    pub fn new(subsystem: &'static str) -> Self {
        Self {
            subsystem,
            labels: Labels::new(),
            samples: Vec::new(),
        }
    }

    pub fn gauge(&mut self, name: &str, help: &str, value: impl Into<Option<f64>>) -> &mut Self {
        self.push(name, MetricKind::Gauge, help, value.into())
    }

    pub fn counter(&mut self, name: &str, help: &str, value: impl Into<Option<f64>>) -> &mut Self {
        self.push(name, MetricKind::Counter, help, value.into())
    }

    /// Gauge that is `1` while the flag is set.
    pub fn flag(&mut self, name: &str, help: &str, value: Option<bool>) -> &mut Self {
        self.gauge(name, help, value.map(|set| if set { 1.0 } else { 0.0 }))
    }

    /// Runs `f` with the given labels added to every sample it records.
    pub fn scope<K, V>(&mut self, labels: impl IntoIterator<Item = (K, V)>, f: impl FnOnce(&mut Self)) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let outer = self.labels.clone();
        self.labels
            .extend(labels.into_iter().map(|(key, value)| (key.into(), value.into())));
        f(self);
        self.labels = outer;
        self
    }

    pub fn finish(self) -> Vec<MetricSample> {
        self.samples
    }

    fn push(&mut self, name: &str, kind: MetricKind, help: &str, value: Option<f64>) -> &mut Self {
        if let Some(value) = value {
            let sample = MetricSample::new(fq_name(NAMESPACE, self.subsystem, name), kind, value, help)
                .with_labels(self.labels.iter().map(|(key, value)| (key.clone(), value.clone())));
            self.samples.push(sample);
        }
        self
    }
}
