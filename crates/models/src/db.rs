use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Open a pool for `cfg`. In-memory URLs are forced to a single connection.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    if cfg.is_memory() {
        // every pooled connection would otherwise get its own empty database
        opts.max_connections(1).min_connections(1);
    }
    let db = Database::connect(opts).await?;
    info!(memory = cfg.is_memory(), max_connections = cfg.max_connections, "database connected");
    Ok(db)
}
