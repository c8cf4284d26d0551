//! Environment/runtime helpers
//!
//! Sanity checks on directories the server expects at startup.

use tracing::warn;

/// Warn when the static assets directory is missing; pages still render without it.
pub async fn ensure_static_dir(static_dir: &str) -> bool {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "static assets directory not found; /static/* will 404");
        return false;
    }
    true
}
