//! Persistence models: the `counters` and `scores` tables, connection helpers
//! and startup schema creation.
pub mod errors;
pub mod db;
pub mod schema;
pub mod counter;
pub mod score;
