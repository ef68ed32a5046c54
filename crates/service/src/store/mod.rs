//! Storage seams used by the services.
//!
//! Handlers only see the traits; `SeaOrmStore` is the SQLite implementation
//! and tests may substitute their own.
use async_trait::async_trait;
use models::score::{self, BestScore, NewScore};

use crate::errors::ServiceError;

pub mod seaorm;

pub use seaorm::SeaOrmStore;

#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Current value, `None` when the row does not exist.
    async fn get(&self, key: &str) -> Result<Option<i64>, ServiceError>;
    /// Add one and return the new value as a single atomic store operation.
    async fn increment(&self, key: &str) -> Result<i64, ServiceError>;
}

#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn append(&self, entry: NewScore) -> Result<score::Model, ServiceError>;
    /// Best score per nickname, best first, earliest achiever first on ties.
    async fn best_per_nickname(&self, limit: u64) -> Result<Vec<BestScore>, ServiceError>;
}
