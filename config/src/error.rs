/// Configuration problems that prevent the exporter from starting.
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid http timeout {value:?}: {source}")]
    HttpTimeout {
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("http timeout must be greater than zero")]
    ZeroHttpTimeout,
    #[error("invalid logstash url {value:?}: {source}")]
    LogstashUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid listen address {value:?}: {source}")]
    ListenAddress {
        value: String,
        #[source]
        source: std::io::Error,
    },
}
