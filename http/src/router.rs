use crate::{
    encoder,
    error::AppError,
};
use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{
        Html,
        IntoResponse,
        Response,
    },
    routing::get,
    Router,
};
use logstash_exporter_collectors::CollectorManager;
use std::sync::Arc;

const INDEX: &str = r#"<html>
<head><title>Logstash Exporter</title></head>
<body>
<h1>Logstash Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#;

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<CollectorManager>,
}

pub fn create_router(manager: Arc<CollectorManager>) -> Router {
    let state = AppState { manager };

    Router::new()
        .route("/metrics", get(metrics))
        .route("/healthcheck", get(healthcheck))
        .route("/", get(index))
        .with_state(state)
}

async fn metrics(State(state): State<AppState>) -> Result<Response, AppError> {
    let samples = state.manager.collect().await;
    let body = encoder::encode(&samples)?;
    Ok(([(CONTENT_TYPE, encoder::CONTENT_TYPE)], body).into_response())
}

async fn healthcheck(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.manager.check_health().await.map_err(|error| {
        warn!(%error, "health check failed");
        AppError::Unhealthy(error)
    })?;
    Ok("OK")
}

async fn index() -> Html<&'static str> {
    Html(INDEX)
}
