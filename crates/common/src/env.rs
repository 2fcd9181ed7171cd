//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the upload directory exists and is writable.
pub async fn ensure_env(upload_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {upload_dir}: {e}"))?;
    let meta = tokio::fs::metadata(upload_dir).await?;
    if meta.permissions().readonly() {
        warn!(%upload_dir, "upload directory is read-only; picture uploads will fail");
    } else {
        info!(%upload_dir, "upload directory ready");
    }
    Ok(())
}
