//! Prometheus exporter for the Logstash monitoring API.
//!
//! Wires the resolved [`Config`] into a [`CollectorManager`] and serves it until a shutdown signal arrives.

#[macro_use]
extern crate tracing;

mod logging;

pub use logging::init_logging;
use logstash_exporter_collectors::{
    CollectorManager,
    Credentials,
    MonitoredEndpoint,
};
use logstash_exporter_config::{
    Config,
    StartupError,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Semantic version printed by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn init_errors() -> eyre::Result<()> {
    color_eyre::install()
}

/// The Logstash endpoint described by `config`.
pub fn monitored_endpoint(config: &Config) -> Result<MonitoredEndpoint, StartupError> {
    let credentials = config.logstash_username.clone().map(|username| Credentials {
        username,
        password: config.logstash_password.clone(),
    });

    Ok(MonitoredEndpoint::new(config.logstash_url()?, config.http_timeout()?).with_credentials(credentials))
}

pub async fn run(config: Config) -> eyre::Result<()> {
    let endpoint = monitored_endpoint(&config)?;
    let address = config.listen_address()?;

    info!(
        logstash_url = %endpoint.base_url(),
        timeout = ?endpoint.timeout(),
        authenticated = endpoint.credentials().is_some(),
        "monitoring logstash"
    );

    let manager = Arc::new(CollectorManager::new(endpoint)?);
    let listener = TcpListener::bind(address).await?;

    let shutdown = CancellationToken::new();
    tokio::spawn(logstash_exporter_http::shutdown_signal(shutdown.clone()));

    logstash_exporter_http::serve(listener, manager, shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use logstash_exporter_config::Args;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn credentials_require_a_username() {
        let config = Config::new(Args {
            logstash_url: Some("http://logstash:9600/prefix".to_string()),
            logstash_username: Some("logstash".to_string()),
            logstash_password: Some("secret".to_string()),
            http_timeout: Some("5s".to_string()),
            ..Args::default()
        })
        .unwrap();
        let endpoint = monitored_endpoint(&config).unwrap();

        assert_eq!(endpoint.base_url().as_str(), "http://logstash:9600/prefix");
        assert_eq!(endpoint.timeout(), Duration::from_secs(5));
        assert_eq!(
            endpoint.credentials(),
            Some(&Credentials {
                username: "logstash".to_string(),
                password: Some("secret".to_string()),
            })
        );

        let config = Config::new(Args {
            logstash_password: Some("secret".to_string()),
            ..Args::default()
        })
        .unwrap();
        assert_eq!(monitored_endpoint(&config).unwrap().credentials(), None);
    }

    #[test]
    fn version_is_a_bare_semantic_version() {
        let parts: Vec<_> = VERSION.split('.').collect();

        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|part| part.parse::<u64>().is_ok()));
    }

    #[test]
    fn invalid_settings_fail_before_serving() {
        let config = Config::new(Args {
            http_timeout: Some("0ms".to_string()),
            ..Args::default()
        })
        .unwrap();

        assert!(matches!(monitored_endpoint(&config), Err(StartupError::ZeroHttpTimeout)));
    }
}
