//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use std::path::Path;

/// Ensure the data directory exists; warn when the static directory is missing.
pub async fn ensure_env(static_dir: &str, data_file: &Path) -> anyhow::Result<()> {
    common::env::ensure_env(static_dir, data_file).await
}
