use crate::error::FetchError;
use reqwest::{
    header::ACCEPT,
    Client,
};
use std::{
    future::Future,
    pin::Pin,
    time::Duration,
};
use tokio::time::Instant;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

/// The Logstash instance being observed.
///
/// Built once at startup and shared read-only by every scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredEndpoint {
    base_url: Url,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl MonitoredEndpoint {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        Self {
            base_url,
            credentials: None,
            timeout,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Appends `path` to the base URL, keeping any path prefix the base URL already has.
    pub fn url_for(&self, path: &str) -> Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
    }
}

/// Fetches raw monitoring payloads.
pub trait StatsClient: Send + Sync {
    /// Issue one request for `path`. The call must not outlive `deadline`.
    fn fetch<'a>(
        &'a self,
        path: &'a str,
        deadline: Instant,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, FetchError>> + Send + 'a>>;
}

/// [`StatsClient`] backed by a shared reqwest connection pool.
#[derive(Debug, Clone)]
pub struct HttpStatsClient {
    http_client: Client,
    endpoint: MonitoredEndpoint,
}

impl HttpStatsClient {
    pub fn new(endpoint: MonitoredEndpoint) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .user_agent(concat!("logstash-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http_client, endpoint })
    }

    async fn get(&self, path: &str, deadline: Instant) -> Result<Vec<u8>, FetchError> {
        let url = self.endpoint.url_for(path).map_err(|source| FetchError::Url {
            path: path.to_string(),
            source,
        })?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(FetchError::Timeout { url });
        }

        let mut request = self
            .http_client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .timeout(remaining);
        if let Some(credentials) = self.endpoint.credentials() {
            request = request.basic_auth(&credentials.username, credentials.password.as_ref());
        }

        trace!(%url, ?remaining, "fetching stats");
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url.clone(), e))?;
        Ok(body.to_vec())
    }
}

impl StatsClient for HttpStatsClient {
    fn fetch<'a>(
        &'a self,
        path: &'a str,
        deadline: Instant,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, FetchError>> + Send + 'a>> {
        Box::pin(self.get(path, deadline))
    }
}
