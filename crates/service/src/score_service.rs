use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use models::{errors::ModelError, score::{self, NewScore}};

use crate::errors::ServiceError;
use crate::store::ScoreRepository;

pub const DEFAULT_TOP: u64 = 3;
pub const MAX_TOP: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub nickname: String,
    pub floors: i64,
}

/// Validate and append one score stamped with the current time.
pub async fn submit_score(
    repo: &dyn ScoreRepository,
    nickname: &str,
    floors: f64,
) -> Result<score::Model, ServiceError> {
    let entry = NewScore::validate(nickname, floors, Utc::now().timestamp_millis()).map_err(|e| match e {
        ModelError::Validation(msg) => ServiceError::Validation(msg),
        other => ServiceError::Model(other),
    })?;
    let saved = repo.append(entry).await?;
    debug!(id = saved.id, nickname = %saved.nickname, floors = saved.floors, "score saved");
    Ok(saved)
}

/// Parse the `top` query value.
///
/// Missing or non-numeric input gives [`DEFAULT_TOP`]; numbers are truncated
/// and clamped to `1..=MAX_TOP`.
pub fn normalize_top(raw: Option<&str>) -> u64 {
    let parsed = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| !v.is_nan());
    match parsed {
        Some(v) => v.trunc().clamp(1.0, MAX_TOP as f64) as u64,
        None => DEFAULT_TOP,
    }
}

/// Top `top` nicknames by personal best, ranked from 1.
pub async fn get_leaderboard(
    repo: &dyn ScoreRepository,
    top: u64,
) -> Result<Vec<LeaderboardEntry>, ServiceError> {
    let top = top.clamp(1, MAX_TOP);
    let rows = repo.best_per_nickname(top).await?;
    Ok(rows
        .into_iter()
        .zip(1u32..)
        .map(|(row, rank)| LeaderboardEntry { rank, nickname: row.nickname, floors: row.floors })
        .collect())
}
