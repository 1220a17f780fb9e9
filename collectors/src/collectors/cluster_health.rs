use crate::{
    collectors::SubCollector,
    error::CollectorError,
    metrics::{
        MetricSample,
        SampleBuilder,
    },
};
use serde::Deserialize;
use std::collections::BTreeMap;
use strum::{
    Display,
    EnumIter,
    IntoEnumIterator,
};

/// Collects the node's health report from `/_health_report`.
///
/// Statuses are exported as state sets: one sample per known status, `1` for the reported one and `0` for the
/// others, so a status change never makes a series disappear.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClusterHealthCollector;

#[derive(Debug, Default, Clone, Copy, Display, EnumIter, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
    Green,
    Yellow,
    Red,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct HealthReportResponse {
    #[serde(default)]
    status: HealthStatus,
    #[serde(default)]
    indicators: BTreeMap<String, Indicator>,
}

#[derive(Debug, Default, Deserialize)]
struct Indicator {
    #[serde(default)]
    status: HealthStatus,
    #[serde(default)]
    indicators: BTreeMap<String, Indicator>,
    #[serde(default)]
    details: IndicatorDetails,
}

#[derive(Debug, Default, Deserialize)]
struct IndicatorDetails {
    #[serde(default)]
    status: PipelineStatus,
    #[serde(default)]
    flow: PipelineFlow,
}

#[derive(Debug, Default, Deserialize)]
struct PipelineStatus {
    state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PipelineFlow {
    #[serde(default)]
    worker_utilization: BTreeMap<String, Option<f64>>,
}

fn record_status(builder: &mut SampleBuilder, name: &str, help: &str, reported: HealthStatus) {
    for status in HealthStatus::iter() {
        builder.scope([("status", status.to_string())], |b| {
            b.flag(name, help, Some(status == reported));
        });
    }
}

impl SubCollector for ClusterHealthCollector {
    fn name(&self) -> &'static str {
        "clusterhealth"
    }

    fn path(&self) -> &'static str {
        "/_health_report"
    }

    fn collect(&self, payload: &[u8]) -> Result<Vec<MetricSample>, CollectorError> {
        let report: HealthReportResponse = serde_json::from_slice(payload)?;
        let mut builder = SampleBuilder::new("health");

        record_status(&mut builder, "status", "Overall health status of the node.", report.status);

        for (name, indicator) in &report.indicators {
            builder.scope([("indicator", name.as_str())], |b| {
                record_status(b, "indicator_status", "Health status of a top-level indicator.", indicator.status);
            });
        }

        if let Some(pipelines) = report.indicators.get("pipelines") {
            for (pipeline, indicator) in &pipelines.indicators {
                builder.scope([("pipeline", pipeline.as_str())], |b| {
                    record_status(b, "pipeline_status", "Health status of a pipeline.", indicator.status);

                    if let Some(state) = &indicator.details.status.state {
                        b.scope([("state", state.to_lowercase())], |b| {
                            b.gauge("pipeline_state", "A constant '1' labeled by the pipeline's run state.", 1.0);
                        });
                    }

                    for (window, value) in &indicator.details.flow.worker_utilization {
                        b.scope([("window", window.as_str())], |b| {
                            b.gauge(
                                "pipeline_worker_utilization",
                                "Percentage of worker capacity in use over the window.",
                                *value,
                            );
                        });
                    }
                });
            }
        }

        Ok(builder.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAYLOAD: &str = include_str!("../../fixtures/health_report.json");

    fn status_values<'a>(samples: &'a [MetricSample], name: &str) -> Vec<(&'a str, f64)> {
        samples
            .iter()
            .filter(|s| s.name() == name)
            .map(|s| (s.label("status").unwrap_or_default(), s.value()))
            .collect()
    }

    #[test]
    fn overall_status_is_a_state_set() {
        let samples = ClusterHealthCollector.collect(PAYLOAD.as_bytes()).unwrap();

        assert_eq!(
            status_values(&samples, "logstash_health_status"),
            [("green", 0.0), ("yellow", 1.0), ("red", 0.0), ("unknown", 0.0)]
        );
    }

    #[test]
    fn pipeline_indicators_are_expanded() {
        let samples = ClusterHealthCollector.collect(PAYLOAD.as_bytes()).unwrap();

        let healthy: Vec<_> = samples
            .iter()
            .filter(|s| s.name() == "logstash_health_pipeline_status" && s.value() == 1.0)
            .map(|s| (s.label("pipeline").unwrap_or_default(), s.label("status").unwrap_or_default()))
            .collect();
        assert_eq!(healthy, [("ingest", "yellow"), ("main", "green")]);

        let states: Vec<_> = samples
            .iter()
            .filter(|s| s.name() == "logstash_health_pipeline_state")
            .map(|s| (s.label("pipeline").unwrap_or_default(), s.label("state").unwrap_or_default()))
            .collect();
        assert_eq!(states, [("ingest", "finished"), ("main", "running")]);

        let utilization: Vec<_> = samples
            .iter()
            .filter(|s| s.name() == "logstash_health_pipeline_worker_utilization")
            .map(|s| (s.label("window").unwrap_or_default(), s.value()))
            .collect();
        assert_eq!(utilization, [("last_1_minute", 62.5), ("last_5_minutes", 58.1)]);
    }

    #[test]
    fn unrecognised_status_maps_to_unknown() {
        let samples = ClusterHealthCollector.collect(br#"{"status":"purple"}"#).unwrap();

        assert_eq!(
            status_values(&samples, "logstash_health_status"),
            [("green", 0.0), ("yellow", 0.0), ("red", 0.0), ("unknown", 1.0)]
        );
    }

    #[test]
    fn rejects_a_non_object_payload() {
        let error = ClusterHealthCollector.collect(b"\"green\"").unwrap_err();
        assert!(matches!(error, CollectorError::Decode(_)));
    }
}
