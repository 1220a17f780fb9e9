use crate::{
    collectors::SubCollector,
    error::CollectorError,
    metrics::{
        MetricSample,
        SampleBuilder,
    },
};
use serde::Deserialize;

/// Collects identity and build information from the root endpoint (`/`).
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeInfoCollector;

#[derive(Debug, Deserialize)]
struct NodeInfoResponse {
    #[serde(default)]
    host: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    http_address: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    status: Option<String>,
    #[serde(default)]
    pipeline: PipelineSettings,
    build_date: Option<String>,
    build_sha: Option<String>,
    build_snapshot: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct PipelineSettings {
    workers: Option<f64>,
    batch_size: Option<f64>,
    batch_delay: Option<f64>,
}

impl SubCollector for NodeInfoCollector {
    fn name(&self) -> &'static str {
        "nodeinfo"
    }

    fn path(&self) -> &'static str {
        "/"
    }

    fn collect(&self, payload: &[u8]) -> Result<Vec<MetricSample>, CollectorError> {
        let info: NodeInfoResponse = serde_json::from_slice(payload)?;
        let mut builder = SampleBuilder::new("info");

        builder.scope(
            [
                ("host", info.host.as_str()),
                ("http_address", info.http_address.as_str()),
                ("id", info.id.as_str()),
                ("name", info.name.as_str()),
                ("version", info.version.as_str()),
            ],
            |b| {
                b.gauge("node", "A constant '1' labeled by the node's identity.", 1.0);
            },
        );

        if info.build_date.is_some() || info.build_sha.is_some() || info.build_snapshot.is_some() {
            let snapshot = info.build_snapshot.unwrap_or_default().to_string();
            builder.scope(
                [
                    ("date", info.build_date.unwrap_or_default()),
                    ("sha", info.build_sha.unwrap_or_default()),
                    ("snapshot", snapshot),
                ],
                |b| {
                    b.gauge("build", "A constant '1' labeled by the Logstash build.", 1.0);
                },
            );
        }

        if let Some(status) = info.status {
            builder.scope([("status", status)], |b| {
                b.gauge("status", "A constant '1' labeled by the node's reported status.", 1.0);
            });
        }

        builder
            .gauge(
                "pipeline_workers",
                "Default number of pipeline workers.",
                info.pipeline.workers,
            )
            .gauge(
                "pipeline_batch_size",
                "Default number of events per pipeline batch.",
                info.pipeline.batch_size,
            )
            .gauge(
                "pipeline_batch_delay",
                "Default pipeline batch delay, in milliseconds.",
                info.pipeline.batch_delay,
            );

        Ok(builder.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAYLOAD: &str = include_str!("../../fixtures/node_info.json");

    #[test]
    fn converts_a_full_payload() {
        let samples = NodeInfoCollector.collect(PAYLOAD.as_bytes()).unwrap();
        let names: Vec<_> = samples.iter().map(MetricSample::name).collect();

        assert_eq!(
            names,
            [
                "logstash_info_node",
                "logstash_info_build",
                "logstash_info_status",
                "logstash_info_pipeline_workers",
                "logstash_info_pipeline_batch_size",
                "logstash_info_pipeline_batch_delay",
            ]
        );

        let node = &samples[0];
        assert_eq!(node.label("name"), Some("logstash-node-1"));
        assert_eq!(node.label("version"), Some("8.15.3"));
        assert_eq!(node.label("http_address"), Some("127.0.0.1:9600"));
        assert_eq!(samples[1].label("snapshot"), Some("false"));
        assert_eq!(samples[2].label("status"), Some("green"));
        assert_eq!(samples[3].value(), 8.0);
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let samples = NodeInfoCollector.collect(br#"{"id":"abc"}"#).unwrap();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name(), "logstash_info_node");
        assert_eq!(samples[0].label("id"), Some("abc"));
        assert_eq!(samples[0].label("version"), Some(""));
    }

    #[test]
    fn rejects_payloads_of_the_wrong_shape() {
        let error = NodeInfoCollector.collect(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(error, CollectorError::Decode(_)));

        let error = NodeInfoCollector
            .collect(br#"{"pipeline":{"workers":"eight"}}"#)
            .unwrap_err();
        assert!(matches!(error, CollectorError::Decode(_)));
    }
}
