use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error body `{"error": code}` with a fixed machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
}

impl ApiError {
    pub const INVALID_PAYLOAD: &'static str = "invalid_payload";
    pub const FAILED_TO_GET_STATS: &'static str = "failed_to_get_stats";
    pub const FAILED_TO_INCREMENT: &'static str = "failed_to_increment";
    pub const FAILED_TO_SAVE_SCORE: &'static str = "failed_to_save_score";
    pub const FAILED_TO_GET_LEADERBOARD: &'static str = "failed_to_get_leaderboard";

    pub fn invalid_payload() -> Self {
        Self { status: StatusCode::BAD_REQUEST, code: Self::INVALID_PAYLOAD }
    }

    /// Storage failure; the cause is logged, the client only sees `code`.
    pub fn storage(code: &'static str, cause: &ServiceError) -> Self {
        error!(event = "storage_error", code, error = %cause, "request failed");
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, code }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.code}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database initialization failed: {0}")]
    Database(String),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
}
