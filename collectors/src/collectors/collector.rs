use crate::{
    error::CollectorError,
    metrics::MetricSample,
};

/// One monitored subsystem of the Logstash node.
pub trait SubCollector: Send + Sync {
    /// Stable identifier, used as the `collector` label of the outcome sample and in logs.
    fn name(&self) -> &'static str;

    /// Path relative to the monitored endpoint's base URL.
    fn path(&self) -> &'static str;

    /// Convert a raw payload into samples.
    ///
    /// Absent optional fields are skipped. A payload of the wrong shape is a [`CollectorError::Decode`].
    fn collect(&self, payload: &[u8]) -> Result<Vec<MetricSample>, CollectorError>;
}
