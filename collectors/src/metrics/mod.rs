pub mod builder;
pub mod sample;

pub use builder::SampleBuilder;
pub use sample::*;

/// Prefix shared by every metric this exporter emits.
pub const NAMESPACE: &str = "logstash";
