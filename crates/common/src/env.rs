//! Environment/runtime helpers
//!
//! Prepares the filesystem before the database file is opened.

use std::path::Path;

use tracing::info;

/// Create the parent directory of the database file when it is missing.
/// A bare file name (no parent component) needs nothing.
pub async fn ensure_parent_dir(db_file: &Path) -> anyhow::Result<()> {
    let parent = match db_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    if tokio::fs::metadata(parent).await.is_ok() {
        return Ok(());
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    info!(dir = %parent.display(), "created database directory");
    Ok(())
}
