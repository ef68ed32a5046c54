use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::ServerState;

pub mod scores;
pub mod stats;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: health probe plus the four API routes.
pub fn build_router(state: ServerState, cors: CorsLayer, body_limit: usize) -> Router {
    let api = Router::new()
        .route("/api/stats", get(stats::get_stats))
        .route("/api/tower/start", post(stats::start_tower))
        .route("/api/score", post(scores::submit_score))
        .route("/api/leaderboard", get(scores::get_leaderboard));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
