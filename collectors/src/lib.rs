//! # Logstash Exporter Collectors
//!
//! Turns the Logstash monitoring API into Prometheus metric samples.
//!
//! ## Architecture
//!
//! - **`client`**: The [`StatsClient`] seam and its reqwest implementation. One `GET` per call, bounded by a
//!   deadline.
//! - **`metrics`**: The [`MetricSample`] model plus the helpers that build fully-qualified names and canonical label
//!   sets.
//! - **`collectors`**: One [`SubCollector`] per monitoring endpoint:
//!   - **`NodeInfoCollector`**: `/`
//!   - **`NodeStatsCollector`**: `/_node/stats`
//!   - **`PipelineStatsCollector`**: `/_node/stats/pipelines`
//!   - **`ClusterHealthCollector`**: `/_health_report`
//! - **`manager`**: The [`CollectorManager`] fans a scrape out to every sub-collector under one shared deadline and
//!   merges the results in registration order.

#[macro_use]
extern crate tracing;

pub mod client;
pub mod collectors;
pub mod error;
pub mod manager;
pub mod metrics;

pub use client::{
    Credentials,
    HttpStatsClient,
    MonitoredEndpoint,
    StatsClient,
};
pub use collectors::*;
pub use error::{
    CollectorError,
    FetchError,
};
pub use manager::{
    default_collectors,
    CollectorManager,
    Scrape,
    ScrapeOutcome,
};
pub use metrics::*;
