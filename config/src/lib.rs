//! # Configuration
//!
//! Resolves the exporter's settings once at startup. Sources are layered, later ones winning:
//!
//! 1. the built-in defaults (`default-config.yaml`)
//! 2. the optional YAML file given by `--config` / `EXPORTER_CONFIG`
//! 3. command line flags and their environment variables (see [`Args`])

mod args;
mod error;
mod logging;

pub use args::Args;
pub use error::StartupError;
pub use logging::{
    LogFormat,
    LogLevel,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    net::{
        IpAddr,
        Ipv4Addr,
        SocketAddr,
        ToSocketAddrs,
    },
    time::Duration,
};
use url::Url;

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub logstash_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logstash_username: Option<String>,
    #[serde(default, skip_serializing)]
    pub logstash_password: Option<String>,
    #[serde(default)]
    pub host: String,
    pub port: u16,
    pub http_timeout: String,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn new(args: Args) -> Result<Self, StartupError> {
        let mut builder =
            config::Config::builder().add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        if let Some(path) = &args.config {
            let source = config::File::from(path.clone())
                .format(config::FileFormat::Yaml)
                .required(true);
            builder = builder.add_source(source);
        }

        builder = builder.add_source(args);

        let cfg: Self = builder.build()?.try_deserialize()?;

        Ok(cfg)
    }

    pub fn http_timeout(&self) -> Result<Duration, StartupError> {
        let timeout = humantime::parse_duration(self.http_timeout.trim()).map_err(|source| {
            StartupError::HttpTimeout {
                value: self.http_timeout.clone(),
                source,
            }
        })?;
        if timeout.is_zero() {
            return Err(StartupError::ZeroHttpTimeout);
        }
        Ok(timeout)
    }

    pub fn logstash_url(&self) -> Result<Url, StartupError> {
        Url::parse(&self.logstash_url).map_err(|source| StartupError::LogstashUrl {
            value: self.logstash_url.clone(),
            source,
        })
    }

    /// Socket address of the scrape endpoint. An empty host binds every interface.
    pub fn listen_address(&self) -> Result<SocketAddr, StartupError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port));
        }
        if let Ok(ip) = host.trim_matches(|c| c == '[' || c == ']').parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        let value = format!("{host}:{}", self.port);
        let mut resolved = (host, self.port).to_socket_addrs().map_err(|source| StartupError::ListenAddress {
            value: value.clone(),
            source,
        })?;
        resolved.next().ok_or_else(|| StartupError::ListenAddress {
            value,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "host did not resolve to any address"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    #[test]
    fn defaults_apply_without_overrides() {
        let cfg = Config::new(Args::default()).unwrap();

        assert_eq!(
            cfg,
            Config {
                logstash_url: "http://localhost:9600".to_string(),
                logstash_username: None,
                logstash_password: None,
                host: String::new(),
                port: 9198,
                http_timeout: "2s".to_string(),
                log_level: LogLevel::Info,
                log_format: LogFormat::Text,
            }
        );
        assert_eq!(cfg.http_timeout().unwrap(), Duration::from_secs(2));
        assert_eq!(cfg.listen_address().unwrap(), "0.0.0.0:9198".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn arguments_override_defaults() {
        let cfg = Config::new(Args {
            logstash_url: Some("http://logstash:9600".to_string()),
            host: Some("127.0.0.1".to_string()),
            port: Some(9300),
            http_timeout: Some("750ms".to_string()),
            log_level: Some(LogLevel::Debug),
            ..Args::default()
        })
        .unwrap();

        assert_eq!(cfg.logstash_url().unwrap().as_str(), "http://logstash:9600/");
        assert_eq!(cfg.listen_address().unwrap(), "127.0.0.1:9300".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.http_timeout().unwrap(), Duration::from_millis(750));
        assert_eq!(cfg.log_level, LogLevel::Debug);
    }

    #[test]
    fn file_sits_between_defaults_and_arguments() {
        let path = std::env::temp_dir().join(format!("logstash-exporter-config-{}.yaml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "logstash_url: http://from-file:9600\nport: 9400\nlog_format: json").unwrap();

        let cfg = Config::new(Args {
            config: Some(path.clone()),
            port: Some(9500),
            ..Args::default()
        })
        .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cfg.logstash_url, "http://from-file:9600");
        assert_eq!(cfg.port, 9500);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn unreadable_timeout_is_a_startup_error() {
        let cfg = Config::new(Args {
            http_timeout: Some("soon".to_string()),
            ..Args::default()
        })
        .unwrap();
        assert!(matches!(cfg.http_timeout(), Err(StartupError::HttpTimeout { .. })));

        let cfg = Config::new(Args {
            http_timeout: Some("0s".to_string()),
            ..Args::default()
        })
        .unwrap();
        assert!(matches!(cfg.http_timeout(), Err(StartupError::ZeroHttpTimeout)));
    }

    #[test]
    fn missing_config_file_is_a_startup_error() {
        let error = Config::new(Args {
            config: Some("/nonexistent/logstash-exporter.yaml".into()),
            ..Args::default()
        })
        .unwrap_err();
        assert!(matches!(error, StartupError::Load(_)));
    }

    #[test]
    fn invalid_url_is_a_startup_error() {
        let cfg = Config::new(Args {
            logstash_url: Some("not a url".to_string()),
            ..Args::default()
        })
        .unwrap();
        assert!(matches!(cfg.logstash_url(), Err(StartupError::LogstashUrl { .. })));
    }

    #[test]
    fn ipv6_hosts_are_accepted() {
        let cfg = Config::new(Args {
            host: Some("[::1]".to_string()),
            ..Args::default()
        })
        .unwrap();
        assert_eq!(cfg.listen_address().unwrap(), "[::1]:9198".parse::<SocketAddr>().unwrap());
    }
}
