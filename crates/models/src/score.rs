use sea_orm::entity::prelude::*;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// One submitted run. Rows are append-only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub nickname: String,
    pub floors: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A nickname's personal best and the earliest time it was reached.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct BestScore {
    pub nickname: String,
    pub floors: i64,
    pub reached_at: i64,
}

/// A validated score waiting to be appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewScore {
    pub nickname: String,
    pub floors: i64,
    pub created_at: i64,
}

impl NewScore {
    /// Trims the nickname and truncates floors toward zero.
    ///
    /// Rejects an empty nickname and any floors value that is not a finite
    /// number strictly greater than zero.
    pub fn validate(nickname: &str, floors: f64, created_at: i64) -> Result<Self, ModelError> {
        let nickname = validate_nickname(nickname)?;
        if !floors.is_finite() || floors <= 0.0 {
            return Err(ModelError::Validation("floors must be a positive finite number".into()));
        }
        Ok(Self { nickname, floors: floors.trunc() as i64, created_at })
    }
}

pub fn validate_nickname(nickname: &str) -> Result<String, ModelError> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation("nickname required".into()));
    }
    Ok(trimmed.to_string())
}
