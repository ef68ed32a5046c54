use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::score_service::{self, LeaderboardEntry};

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Serialize)]
pub struct OkOutput {
    pub ok: bool,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub top: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardOutput {
    pub top: Vec<LeaderboardEntry>,
}

/// Pull `(nickname, floors)` out of an arbitrary JSON body.
///
/// Truthy scalar nicknames are stringified; falsy ones (`""`, `0`, `false`,
/// `null`) and containers become empty. Numbers and numeric strings are both
/// accepted for `floors`; anything else becomes NaN and fails validation
/// downstream.
pub fn extract_score(body: &Value) -> (String, f64) {
    let nickname = match body.get("nickname") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    };
    let floors = match body.get("floors") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    };
    (nickname, floors)
}

/// POST /api/score
pub async fn submit_score(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> Result<Json<OkOutput>, ApiError> {
    let (nickname, floors) = extract_score(&body);
    match score_service::submit_score(state.scores.as_ref(), &nickname, floors).await {
        Ok(_) => Ok(Json(OkOutput { ok: true })),
        Err(e) if e.is_validation() => Err(ApiError::invalid_payload()),
        Err(e) => Err(ApiError::storage(ApiError::FAILED_TO_SAVE_SCORE, &e)),
    }
}

/// GET /api/leaderboard?top=N
pub async fn get_leaderboard(
    State(state): State<ServerState>,
    Query(q): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardOutput>, ApiError> {
    let top = score_service::normalize_top(q.top.as_deref());
    score_service::get_leaderboard(state.scores.as_ref(), top)
        .await
        .map(|top| Json(LeaderboardOutput { top }))
        .map_err(|e| ApiError::storage(ApiError::FAILED_TO_GET_LEADERBOARD, &e))
}
