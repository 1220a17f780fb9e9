use axum::{
    http::StatusCode,
    response::{
        IntoResponse,
        Response,
    },
};
use logstash_exporter_collectors::CollectorError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Encoding the scrape failed: {0}")]
    Encode(#[from] prometheus::Error),
    #[error("Logstash is unreachable: {0}")]
    Unhealthy(CollectorError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
