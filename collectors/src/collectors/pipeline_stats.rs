use crate::{
    collectors::{
        schema::{
            Events,
            Flow,
            Queue,
        },
        SubCollector,
    },
    error::CollectorError,
    metrics::{
        MetricSample,
        SampleBuilder,
    },
};
use chrono::{
    DateTime,
    Utc,
};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Collects per-pipeline and per-plugin statistics from `/_node/stats/pipelines`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineStatsCollector;

#[derive(Debug, Deserialize)]
struct PipelineStatsResponse {
    #[serde(default)]
    pipelines: BTreeMap<String, Pipeline>,
}

#[derive(Debug, Default, Deserialize)]
struct Pipeline {
    #[serde(default)]
    events: Events,
    #[serde(default)]
    flow: Flow,
    #[serde(default)]
    plugins: Plugins,
    #[serde(default)]
    reloads: PipelineReloads,
    #[serde(default)]
    queue: Queue,
    #[serde(default)]
    dead_letter_queue: DeadLetterQueue,
}

#[derive(Debug, Default, Deserialize)]
struct Plugins {
    #[serde(default)]
    inputs: Vec<Plugin>,
    #[serde(default)]
    filters: Vec<Plugin>,
    #[serde(default)]
    outputs: Vec<Plugin>,
}

#[derive(Debug, Default, Deserialize)]
struct Plugin {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    events: Events,
    #[serde(default)]
    flow: Flow,
}

#[derive(Debug, Default, Deserialize)]
struct PipelineReloads {
    successes: Option<f64>,
    failures: Option<f64>,
    last_success_timestamp: Option<DateTime<Utc>>,
    last_failure_timestamp: Option<DateTime<Utc>>,
}

impl PipelineReloads {
    /// A pipeline counts as up unless its most recent reload attempt failed.
    fn is_up(&self) -> bool {
        match (self.last_success_timestamp, self.last_failure_timestamp) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(success), Some(failure)) => success >= failure,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DeadLetterQueue {
    queue_size_in_bytes: Option<f64>,
    max_queue_size_in_bytes: Option<f64>,
    dropped_events: Option<f64>,
    expired_events: Option<f64>,
}

impl Pipeline {
    fn record(&self, builder: &mut SampleBuilder) {
        builder.flag(
            "pipeline_up",
            "Whether the pipeline's most recent reload succeeded.",
            Some(self.reloads.is_up()),
        );

        self.events.record(builder, "pipeline_");
        self.flow.record(builder, "pipeline_");

        builder
            .counter(
                "pipeline_reload_successes",
                "Number of successful reloads of the pipeline.",
                self.reloads.successes,
            )
            .counter(
                "pipeline_reload_failures",
                "Number of failed reloads of the pipeline.",
                self.reloads.failures,
            )
            .gauge(
                "pipeline_queue_events_count",
                "Number of events waiting in the pipeline queue.",
                self.queue.events_count,
            )
            .gauge(
                "pipeline_queue_size_bytes",
                "Size of the persisted pipeline queue, in bytes.",
                self.queue.queue_size_in_bytes,
            )
            .gauge(
                "pipeline_queue_max_size_bytes",
                "Maximum size of the persisted pipeline queue, in bytes.",
                self.queue.max_queue_size_in_bytes,
            )
            .gauge(
                "pipeline_dlq_size_bytes",
                "Size of the dead letter queue, in bytes.",
                self.dead_letter_queue.queue_size_in_bytes,
            )
            .gauge(
                "pipeline_dlq_max_size_bytes",
                "Maximum size of the dead letter queue, in bytes.",
                self.dead_letter_queue.max_queue_size_in_bytes,
            )
            .counter(
                "pipeline_dlq_dropped_events",
                "Number of events dropped by the dead letter queue.",
                self.dead_letter_queue.dropped_events,
            )
            .counter(
                "pipeline_dlq_expired_events",
                "Number of events expired from the dead letter queue.",
                self.dead_letter_queue.expired_events,
            );

        if let Some(queue_type) = &self.queue.queue_type {
            builder.scope([("queue_type", queue_type.as_str())], |b| {
                b.gauge("pipeline_queue_type", "A constant '1' labeled by the queue type.", 1.0);
            });
        }

        let plugins = [
            ("input", &self.plugins.inputs),
            ("filter", &self.plugins.filters),
            ("output", &self.plugins.outputs),
        ];
        for (plugin_type, plugins) in plugins {
            for plugin in plugins {
                builder.scope(
                    [
                        ("plugin_type", plugin_type),
                        ("plugin", plugin.name.as_str()),
                        ("plugin_id", plugin.id.as_str()),
                    ],
                    |b| plugin.record(b),
                );
            }
        }
    }
}

impl Plugin {
    fn record(&self, builder: &mut SampleBuilder) {
        builder
            .counter(
                "pipeline_plugin_events_in",
                "Number of events received by the plugin.",
                self.events.events_in,
            )
            .counter(
                "pipeline_plugin_events_out",
                "Number of events emitted by the plugin.",
                self.events.out,
            )
            .counter(
                "pipeline_plugin_events_duration_millis",
                "Time spent processing events in the plugin, in milliseconds.",
                self.events.duration_in_millis,
            )
            .counter(
                "pipeline_plugin_events_queue_push_duration_millis",
                "Time the plugin spent pushing events into the queue, in milliseconds.",
                self.events.queue_push_duration_in_millis,
            )
            .gauge(
                "pipeline_plugin_worker_utilization_current",
                "Percentage of worker capacity used by the plugin, over the most recent window.",
                self.flow.worker_utilization.current,
            )
            .gauge(
                "pipeline_plugin_worker_utilization_lifetime",
                "Percentage of worker capacity used by the plugin, since the pipeline started.",
                self.flow.worker_utilization.lifetime,
            );
    }
}

impl SubCollector for PipelineStatsCollector {
    fn name(&self) -> &'static str {
        "pipelinestats"
    }

    fn path(&self) -> &'static str {
        "/_node/stats/pipelines"
    }

    fn collect(&self, payload: &[u8]) -> Result<Vec<MetricSample>, CollectorError> {
        let stats: PipelineStatsResponse = serde_json::from_slice(payload)?;
        let mut builder = SampleBuilder::new("stats");

        for (id, pipeline) in &stats.pipelines {
            builder.scope([("pipeline", id.as_str())], |b| pipeline.record(b));
        }

        Ok(builder.finish())
    }
}
