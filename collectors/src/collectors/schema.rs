//! Payload fragments shared by the node and pipeline stats endpoints.

use crate::metrics::SampleBuilder;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Events {
    #[serde(rename = "in")]
    pub events_in: Option<f64>,
    pub filtered: Option<f64>,
    pub out: Option<f64>,
    pub duration_in_millis: Option<f64>,
    pub queue_push_duration_in_millis: Option<f64>,
}

impl Events {
    pub fn record(&self, builder: &mut SampleBuilder, prefix: &str) {
        builder
            .counter(
                &format!("{prefix}events_in"),
                "Number of events received.",
                self.events_in,
            )
            .counter(
                &format!("{prefix}events_filtered"),
                "Number of events that passed the filter stage.",
                self.filtered,
            )
            .counter(&format!("{prefix}events_out"), "Number of events sent out.", self.out)
            .counter(
                &format!("{prefix}events_duration_millis"),
                "Time spent processing events, in milliseconds.",
                self.duration_in_millis,
            )
            .counter(
                &format!("{prefix}events_queue_push_duration_millis"),
                "Time spent pushing events into the queue, in milliseconds.",
                self.queue_push_duration_in_millis,
            );
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Reloads {
    pub successes: Option<f64>,
    pub failures: Option<f64>,
}

impl Reloads {
    pub fn record(&self, builder: &mut SampleBuilder, prefix: &str) {
        builder
            .counter(
                &format!("{prefix}reload_successes"),
                "Number of successful configuration reloads.",
                self.successes,
            )
            .counter(
                &format!("{prefix}reload_failures"),
                "Number of failed configuration reloads.",
                self.failures,
            );
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FlowMetric {
    pub current: Option<f64>,
    pub lifetime: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Flow {
    #[serde(default)]
    pub input_throughput: FlowMetric,
    #[serde(default)]
    pub filter_throughput: FlowMetric,
    #[serde(default)]
    pub output_throughput: FlowMetric,
    #[serde(default)]
    pub queue_backpressure: FlowMetric,
    #[serde(default)]
    pub worker_concurrency: FlowMetric,
    #[serde(default)]
    pub worker_utilization: FlowMetric,
}

impl Flow {
    pub fn record(&self, builder: &mut SampleBuilder, prefix: &str) {
        let flows = [
            ("input_throughput", "Events per second received by inputs", &self.input_throughput),
            ("filter_throughput", "Events per second processed by filters", &self.filter_throughput),
            ("output_throughput", "Events per second sent by outputs", &self.output_throughput),
            ("queue_backpressure", "Worker time spent blocked on the queue", &self.queue_backpressure),
            ("worker_concurrency", "Number of workers busy on average", &self.worker_concurrency),
            ("worker_utilization", "Percentage of worker capacity in use", &self.worker_utilization),
        ];

        for (name, help, metric) in flows {
            builder
                .gauge(
                    &format!("{prefix}flow_{name}_current"),
                    &format!("{help}, over the most recent window."),
                    metric.current,
                )
                .gauge(
                    &format!("{prefix}flow_{name}_lifetime"),
                    &format!("{help}, since the pipeline started."),
                    metric.lifetime,
                );
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Queue {
    #[serde(rename = "type")]
    pub queue_type: Option<String>,
    pub events_count: Option<f64>,
    pub queue_size_in_bytes: Option<f64>,
    pub max_queue_size_in_bytes: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricSample;

    #[test]
    fn flow_records_only_present_windows() {
        let flow: Flow = serde_json::from_str(
            r#"{"input_throughput":{"current":12.5,"lifetime":3.0},"queue_backpressure":{"lifetime":0.1}}"#,
        )
        .unwrap();

        let mut builder = SampleBuilder::new("stats");
        flow.record(&mut builder, "");
        let samples = builder.finish();
        let names: Vec<_> = samples.iter().map(MetricSample::name).collect();

        assert_eq!(
            names,
            [
                "logstash_stats_flow_input_throughput_current",
                "logstash_stats_flow_input_throughput_lifetime",
                "logstash_stats_flow_queue_backpressure_lifetime",
            ]
        );
    }

    #[test]
    fn events_reject_non_numeric_values() {
        assert!(serde_json::from_str::<Events>(r#"{"in":"many"}"#).is_err());
    }
}
