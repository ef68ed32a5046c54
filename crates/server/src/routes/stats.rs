use axum::{extract::State, Json};
use serde::Serialize;
use service::counter_service;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOutput {
    pub total_base_drops: i64,
}

/// GET /api/stats
pub async fn get_stats(State(state): State<ServerState>) -> Result<Json<StatsOutput>, ApiError> {
    counter_service::get_total(state.counters.as_ref())
        .await
        .map(|total| Json(StatsOutput { total_base_drops: total }))
        .map_err(|e| ApiError::storage(ApiError::FAILED_TO_GET_STATS, &e))
}

/// POST /api/tower/start
pub async fn start_tower(State(state): State<ServerState>) -> Result<Json<StatsOutput>, ApiError> {
    counter_service::increment_and_get(state.counters.as_ref())
        .await
        .map(|total| Json(StatsOutput { total_base_drops: total }))
        .map_err(|e| ApiError::storage(ApiError::FAILED_TO_INCREMENT, &e))
}
