use crate::{
    collectors::{
        schema::{
            Events,
            Flow,
            Queue,
            Reloads,
        },
        SubCollector,
    },
    error::CollectorError,
    metrics::{
        MetricSample,
        SampleBuilder,
    },
};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Collects node-wide JVM, process and event statistics from `/_node/stats`.
///
/// Per-pipeline figures are left to [`PipelineStatsCollector`](crate::PipelineStatsCollector).
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeStatsCollector;

#[derive(Debug, Deserialize)]
struct NodeStatsResponse {
    #[serde(default)]
    jvm: Jvm,
    #[serde(default)]
    process: Process,
    #[serde(default)]
    events: Events,
    #[serde(default)]
    flow: Flow,
    #[serde(default)]
    reloads: Reloads,
    #[serde(default)]
    queue: Queue,
}

#[derive(Debug, Default, Deserialize)]
struct Jvm {
    #[serde(default)]
    threads: JvmThreads,
    #[serde(default)]
    mem: JvmMem,
    #[serde(default)]
    gc: JvmGc,
    uptime_in_millis: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct JvmThreads {
    count: Option<f64>,
    peak_count: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct JvmMem {
    heap_used_percent: Option<f64>,
    heap_committed_in_bytes: Option<f64>,
    heap_max_in_bytes: Option<f64>,
    heap_used_in_bytes: Option<f64>,
    non_heap_used_in_bytes: Option<f64>,
    non_heap_committed_in_bytes: Option<f64>,
    #[serde(default)]
    pools: BTreeMap<String, MemPool>,
}

#[derive(Debug, Default, Deserialize)]
struct MemPool {
    used_in_bytes: Option<f64>,
    max_in_bytes: Option<f64>,
    peak_used_in_bytes: Option<f64>,
    peak_max_in_bytes: Option<f64>,
    committed_in_bytes: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct JvmGc {
    #[serde(default)]
    collectors: BTreeMap<String, GcCollector>,
}

#[derive(Debug, Default, Deserialize)]
struct GcCollector {
    collection_count: Option<f64>,
    collection_time_in_millis: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Process {
    open_file_descriptors: Option<f64>,
    peak_open_file_descriptors: Option<f64>,
    max_file_descriptors: Option<f64>,
    #[serde(default)]
    mem: ProcessMem,
    #[serde(default)]
    cpu: ProcessCpu,
}

#[derive(Debug, Default, Deserialize)]
struct ProcessMem {
    total_virtual_in_bytes: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ProcessCpu {
    total_in_millis: Option<f64>,
    percent: Option<f64>,
    #[serde(default)]
    load_average: LoadAverage,
}

#[derive(Debug, Default, Deserialize)]
struct LoadAverage {
    #[serde(rename = "1m")]
    one: Option<f64>,
    #[serde(rename = "5m")]
    five: Option<f64>,
    #[serde(rename = "15m")]
    fifteen: Option<f64>,
}

impl NodeStatsResponse {
    fn record_jvm(&self, builder: &mut SampleBuilder) {
        let jvm = &self.jvm;
        builder
            .gauge("jvm_threads_count", "Number of live JVM threads.", jvm.threads.count)
            .gauge(
                "jvm_threads_peak_count",
                "Peak number of live JVM threads.",
                jvm.threads.peak_count,
            )
            .gauge(
                "jvm_mem_heap_used_percent",
                "Percentage of the JVM heap in use.",
                jvm.mem.heap_used_percent,
            )
            .gauge(
                "jvm_mem_heap_committed_bytes",
                "Committed JVM heap, in bytes.",
                jvm.mem.heap_committed_in_bytes,
            )
            .gauge("jvm_mem_heap_max_bytes", "Maximum JVM heap, in bytes.", jvm.mem.heap_max_in_bytes)
            .gauge(
                "jvm_mem_heap_used_bytes",
                "Used JVM heap, in bytes.",
                jvm.mem.heap_used_in_bytes,
            )
            .gauge(
                "jvm_mem_non_heap_used_bytes",
                "Used JVM non-heap memory, in bytes.",
                jvm.mem.non_heap_used_in_bytes,
            )
            .gauge(
                "jvm_mem_non_heap_committed_bytes",
                "Committed JVM non-heap memory, in bytes.",
                jvm.mem.non_heap_committed_in_bytes,
            );

        for (pool, stats) in &jvm.mem.pools {
            builder.scope([("pool", pool.as_str())], |b| {
                b.gauge(
                    "jvm_mem_pool_used_bytes",
                    "Used bytes of the JVM memory pool.",
                    stats.used_in_bytes,
                )
                .gauge(
                    "jvm_mem_pool_max_bytes",
                    "Maximum bytes of the JVM memory pool.",
                    stats.max_in_bytes,
                )
                .gauge(
                    "jvm_mem_pool_peak_used_bytes",
                    "Peak used bytes of the JVM memory pool.",
                    stats.peak_used_in_bytes,
                )
                .gauge(
                    "jvm_mem_pool_peak_max_bytes",
                    "Peak maximum bytes of the JVM memory pool.",
                    stats.peak_max_in_bytes,
                )
                .gauge(
                    "jvm_mem_pool_committed_bytes",
                    "Committed bytes of the JVM memory pool.",
                    stats.committed_in_bytes,
                );
            });
        }

        for (gc, stats) in &jvm.gc.collectors {
            builder.scope([("gc", gc.as_str())], |b| {
                b.counter(
                    "jvm_gc_collection_count",
                    "Number of garbage collections.",
                    stats.collection_count,
                )
                .counter(
                    "jvm_gc_collection_time_millis",
                    "Time spent in garbage collection, in milliseconds.",
                    stats.collection_time_in_millis,
                );
            });
        }

        builder.gauge(
            "jvm_uptime_millis",
            "JVM uptime, in milliseconds.",
            jvm.uptime_in_millis,
        );
    }

    fn record_process(&self, builder: &mut SampleBuilder) {
        let process = &self.process;
        builder
            .gauge(
                "process_open_file_descriptors",
                "Number of open file descriptors.",
                process.open_file_descriptors,
            )
            .gauge(
                "process_peak_open_file_descriptors",
                "Peak number of open file descriptors.",
                process.peak_open_file_descriptors,
            )
            .gauge(
                "process_max_file_descriptors",
                "Limit of open file descriptors.",
                process.max_file_descriptors,
            )
            .gauge(
                "process_mem_total_virtual_bytes",
                "Total virtual memory of the process, in bytes.",
                process.mem.total_virtual_in_bytes,
            )
            .counter(
                "process_cpu_total_millis",
                "Total CPU time used by the process, in milliseconds.",
                process.cpu.total_in_millis,
            )
            .gauge("process_cpu_percent", "CPU usage of the process.", process.cpu.percent)
            .gauge(
                "process_cpu_load_average_1m",
                "System load average over one minute.",
                process.cpu.load_average.one,
            )
            .gauge(
                "process_cpu_load_average_5m",
                "System load average over five minutes.",
                process.cpu.load_average.five,
            )
            .gauge(
                "process_cpu_load_average_15m",
                "System load average over fifteen minutes.",
                process.cpu.load_average.fifteen,
            );
    }
}

impl SubCollector for NodeStatsCollector {
    fn name(&self) -> &'static str {
        "nodestats"
    }

    fn path(&self) -> &'static str {
        "/_node/stats"
    }

    fn collect(&self, payload: &[u8]) -> Result<Vec<MetricSample>, CollectorError> {
        let stats: NodeStatsResponse = serde_json::from_slice(payload)?;
        let mut builder = SampleBuilder::new("stats");

        stats.record_jvm(&mut builder);
        stats.record_process(&mut builder);
        stats.events.record(&mut builder, "");
        stats.flow.record(&mut builder, "");
        stats.reloads.record(&mut builder, "");
        builder.gauge(
            "queue_events_count",
            "Number of events waiting in the queues of all pipelines.",
            stats.queue.events_count,
        );

        Ok(builder.finish())
    }
}
