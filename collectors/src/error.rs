use url::Url;

/// Failure of a single request against the monitoring API.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: Url },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with status {status}")]
    Status { url: Url, status: u16 },
    #[error("cannot build a request url for path {path:?}: {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

impl FetchError {
    pub(crate) fn from_reqwest(url: Url, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            FetchError::Timeout { url }
        } else {
            FetchError::Transport { url, source }
        }
    }
}

/// Why a sub-collector contributed no samples to a scrape.
#[derive(thiserror::Error, Debug)]
pub enum CollectorError {
    #[error("transport error: {0}")]
    Transport(FetchError),
    #[error("deadline elapsed before the collector completed")]
    Timeout,
    #[error("payload did not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CollectorError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CollectorError::Timeout)
    }
}

impl From<FetchError> for CollectorError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Timeout { .. } => CollectorError::Timeout,
            other => CollectorError::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_timeouts_are_reported_as_collector_timeouts() {
        let url = Url::parse("http://localhost:9600/_node/stats").unwrap();
        let error = CollectorError::from(FetchError::Timeout { url: url.clone() });
        assert!(error.is_timeout());

        let error = CollectorError::from(FetchError::Status { url, status: 503 });
        assert!(!error.is_timeout());
        assert_eq!(
            error.to_string(),
            "transport error: http://localhost:9600/_node/stats responded with status 503"
        );
    }

    #[test]
    fn decode_errors_keep_the_serde_message() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let error = CollectorError::from(source);
        assert!(error.to_string().starts_with("payload did not match the expected shape"));
    }
}
