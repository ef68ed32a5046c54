#![cfg(test)]
use std::path::PathBuf;

use configs::DatabaseConfig;
use uuid::Uuid;

use crate::store::SeaOrmStore;

/// Fresh single-connection in-memory store with schema applied.
pub async fn memory_store() -> Result<SeaOrmStore, anyhow::Error> {
    SeaOrmStore::in_memory().await
}

/// Store backed by a throwaway SQLite file, for tests that need a real pool.
/// Returns the config (to reopen) and the directory to clean up.
pub async fn file_store() -> Result<(SeaOrmStore, DatabaseConfig, PathBuf), anyhow::Error> {
    let dir = std::env::temp_dir().join(format!("towerboard-test-{}", Uuid::new_v4()));
    let path = dir.join("data.sqlite");
    let mut cfg = DatabaseConfig::for_path(&path.to_string_lossy());
    cfg.max_connections = 8;
    let store = SeaOrmStore::open(&cfg).await?;
    Ok((store, cfg, dir))
}
