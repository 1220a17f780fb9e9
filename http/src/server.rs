use crate::router::create_router;
use logstash_exporter_collectors::CollectorManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Serves the scrape endpoint on `listener` until `shutdown` is cancelled.
///
/// Requests in flight when shutdown begins are allowed to finish.
pub async fn serve(listener: TcpListener, manager: Arc<CollectorManager>, shutdown: CancellationToken) -> eyre::Result<()> {
    let app = create_router(manager);

    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("server stopped");
    Ok(())
}

/// Cancels `token` on the first interrupt or terminate signal.
pub async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown requested");
    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use logstash_exporter_collectors::MonitoredEndpoint;
    use std::time::Duration;
    use url::Url;

    #[tokio::test]
    async fn stops_when_cancelled() {
        let endpoint = MonitoredEndpoint::new(Url::parse("http://127.0.0.1:1").unwrap(), Duration::from_millis(100));
        let manager = Arc::new(CollectorManager::new(endpoint).unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let token = CancellationToken::new();

        let server = tokio::spawn(serve(listener, manager, token.clone()));
        token.cancel();

        server.await.unwrap().unwrap();
    }
}
