use crate::{
    client::{
        HttpStatsClient,
        MonitoredEndpoint,
        StatsClient,
    },
    collectors::{
        ClusterHealthCollector,
        NodeInfoCollector,
        NodeStatsCollector,
        PipelineStatsCollector,
        SubCollector,
    },
    error::CollectorError,
    metrics::{
        fq_name,
        MetricSample,
        NAMESPACE,
    },
};
use futures::future::join_all;
use std::{
    sync::Arc,
    time::Duration,
};
use tokio::time::{
    timeout_at,
    Instant,
};

const OUTCOME_HELP: &str = "Whether the collector succeeded (1) or failed (0) during the last scrape.";

/// Result of one sub-collector during one scrape.
#[derive(Debug)]
pub struct ScrapeOutcome {
    collector: &'static str,
    error: Option<CollectorError>,
}

impl ScrapeOutcome {
    pub fn collector(&self) -> &'static str {
        self.collector
    }

    pub fn error(&self) -> Option<&CollectorError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The `logstash_exporter_collector_up` sample for this outcome.
    pub fn to_sample(&self) -> MetricSample {
        let value = if self.is_success() { 1.0 } else { 0.0 };
        MetricSample::gauge(fq_name(NAMESPACE, "exporter", "collector_up"), value, OUTCOME_HELP)
            .with_label("collector", self.collector)
    }
}

/// Everything gathered by one scrape, ordered by collector registration.
#[derive(Debug)]
pub struct Scrape {
    outcomes: Vec<ScrapeOutcome>,
    samples: Vec<MetricSample>,
}

impl Scrape {
    pub fn outcomes(&self) -> &[ScrapeOutcome] {
        &self.outcomes
    }

    /// Outcome samples first, then the substantive samples.
    pub fn into_samples(self) -> Vec<MetricSample> {
        let mut samples: Vec<_> = self.outcomes.iter().map(ScrapeOutcome::to_sample).collect();
        samples.extend(self.samples);
        samples
    }
}

/// Coordinates all sub-collectors against one monitored endpoint.
///
/// Holds no per-scrape state, so concurrent scrapes may share one manager.
pub struct CollectorManager {
    client: Arc<dyn StatsClient>,
    collectors: Vec<Box<dyn SubCollector>>,
    timeout: Duration,
}

impl CollectorManager {
    /// Registers the default collectors against `endpoint`. Performs no I/O.
    pub fn new(endpoint: MonitoredEndpoint) -> Result<Self, reqwest::Error> {
        let timeout = endpoint.timeout();
        let client = HttpStatsClient::new(endpoint)?;
        Ok(Self::with_collectors(Arc::new(client), default_collectors(), timeout))
    }

    pub fn with_collectors(
        client: Arc<dyn StatsClient>,
        collectors: Vec<Box<dyn SubCollector>>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            collectors,
            timeout,
        }
    }

    pub fn collector_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.collectors.iter().map(|collector| collector.name())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Scrape every collector and return the combined samples. Never fails.
    pub async fn collect(&self) -> Vec<MetricSample> {
        self.scrape().await.into_samples()
    }

    /// Run every collector concurrently under a shared deadline of now + timeout.
    ///
    /// A collector that has not finished by the deadline is dropped, cancelling its request, and recorded as timed
    /// out.
    pub async fn scrape(&self) -> Scrape {
        let deadline = Instant::now() + self.timeout;
        let results = join_all(
            self.collectors
                .iter()
                .map(|collector| self.run_collector(collector.as_ref(), deadline)),
        )
        .await;

        let mut outcomes = Vec::with_capacity(self.collectors.len());
        let mut samples = Vec::new();
        for (collector, result) in self.collectors.iter().zip(results) {
            let name = collector.name();
            let error = match result {
                Ok(collected) => {
                    debug!(collector = name, samples = collected.len(), "collector succeeded");
                    samples.extend(collected);
                    None
                }
                Err(error) if error.is_timeout() => {
                    warn!(collector = name, timeout = ?self.timeout, "collector timed out");
                    Some(error)
                }
                Err(error) => {
                    error!(collector = name, %error, "collector failed");
                    Some(error)
                }
            };
            outcomes.push(ScrapeOutcome { collector: name, error });
        }

        Scrape { outcomes, samples }
    }

    /// Checks that the monitored endpoint answers its root path within the timeout.
    pub async fn check_health(&self) -> Result<(), CollectorError> {
        let deadline = Instant::now() + self.timeout;
        match timeout_at(deadline, self.client.fetch("/", deadline)).await {
            Ok(result) => result.map(drop).map_err(CollectorError::from),
            Err(_) => Err(CollectorError::Timeout),
        }
    }

    async fn run_collector(
        &self,
        collector: &dyn SubCollector,
        deadline: Instant,
    ) -> Result<Vec<MetricSample>, CollectorError> {
        let run = async {
            let payload = self.client.fetch(collector.path(), deadline).await?;
            collector.collect(&payload)
        };

        timeout_at(deadline, run).await.unwrap_or(Err(CollectorError::Timeout))
    }
}

/// The collectors registered by [`CollectorManager::new`], in emission order.
pub fn default_collectors() -> Vec<Box<dyn SubCollector>> {
    vec![
        Box::new(NodeInfoCollector),
        Box::new(NodeStatsCollector),
        Box::new(PipelineStatsCollector),
        Box::new(ClusterHealthCollector),
    ]
}
