//! Service layer for the tower backend.
//! - `store` defines the storage seams and the SQLite implementation.
//! - `counter_service` and `score_service` hold the request-level operations.

pub mod errors;
pub mod store;
pub mod counter_service;
pub mod score_service;
#[cfg(test)]
pub mod test_support;
