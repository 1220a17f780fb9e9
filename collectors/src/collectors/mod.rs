//! # Sub-Collectors
//!
//! Each sub-collector owns the schema of one Logstash monitoring endpoint and converts its payload into
//! [`MetricSample`](crate::MetricSample)s. They are pure: the manager does the I/O and hands them the raw body.
//!
//! Payload objects keyed by pipeline, pool or indicator name are decoded into `BTreeMap`s so that repeated scrapes
//! of the same payload yield identical output.

pub mod cluster_health;
pub mod collector;
pub mod node_info;
pub mod node_stats;
pub mod pipeline_stats;
mod schema;

pub use cluster_health::ClusterHealthCollector;
pub use collector::SubCollector;
pub use node_info::NodeInfoCollector;
pub use node_stats::NodeStatsCollector;
pub use pipeline_stats::PipelineStatsCollector;
