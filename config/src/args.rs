use crate::{
    LogFormat,
    LogLevel,
};
use clap::Parser;
use std::path::PathBuf;

/// Prometheus exporter for the Logstash monitoring API
#[derive(Parser, Debug, Clone, Default)]
#[command(author, about, long_about = None, disable_version_flag = true)]
pub struct Args {
    /// Optional YAML file layered between the built-in defaults and these arguments.
    #[arg(long, env = "EXPORTER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the Logstash monitoring API.
    #[arg(long, env = "LOGSTASH_URL", value_name = "URL")]
    pub logstash_url: Option<String>,

    /// Username for basic authentication against Logstash.
    #[arg(long, env = "LOGSTASH_USERNAME", value_name = "USER")]
    pub logstash_username: Option<String>,

    /// Password for basic authentication against Logstash.
    #[arg(long, env = "LOGSTASH_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    pub logstash_password: Option<String>,

    /// Address to listen on. Empty means all interfaces.
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Deadline for every scrape of Logstash (e.g. "2s", "500ms").
    #[arg(long, env = "HTTP_TIMEOUT", value_name = "DURATION")]
    pub http_timeout: Option<String>,

    /// One of debug, info, warn, error.
    #[arg(long, env = "LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// One of text, json.
    #[arg(long, env = "LOG_FORMAT", value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Print the version and exit.
    #[arg(short = 'V', long)]
    pub version: bool,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(logstash_url) = &self.logstash_url {
                cache.insert("logstash_url".to_string(), logstash_url.clone().into());
            }
            if let Some(username) = &self.logstash_username {
                cache.insert("logstash_username".to_string(), username.clone().into());
            }
            if let Some(password) = &self.logstash_password {
                cache.insert("logstash_password".to_string(), password.clone().into());
            }
            if let Some(host) = &self.host {
                cache.insert("host".to_string(), host.clone().into());
            }
            if let Some(port) = self.port {
                cache.insert("port".to_string(), i64::from(port).into());
            }
            if let Some(http_timeout) = &self.http_timeout {
                cache.insert("http_timeout".to_string(), http_timeout.clone().into());
            }
            if let Some(log_level) = self.log_level {
                cache.insert("log_level".to_string(), log_level.to_string().into());
            }
            if let Some(log_format) = self.log_format {
                cache.insert("log_format".to_string(), log_format.to_string().into());
            }
            Ok(cache)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "logstash-exporter",
            "--logstash-url",
            "http://logstash:9600",
            "--port",
            "9200",
            "--log-level",
            "DEBUG",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.logstash_url.as_deref(), Some("http://logstash:9600"));
        assert_eq!(args.port, Some(9200));
        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert_eq!(args.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn version_flag_is_a_plain_switch() {
        assert!(Args::try_parse_from(["logstash-exporter", "--version"]).unwrap().version);
        assert!(Args::try_parse_from(["logstash-exporter", "-V"]).unwrap().version);
        assert!(!Args::try_parse_from(["logstash-exporter"]).unwrap().version);
    }
}
