use anyhow::Context;
use correios_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the storage file.
///
/// Priority:
/// 1. `--file` flag / `CORREIOS_FILESTORAGE` env var (passed in as `explicit`)
/// 2. `.correios` in the user's home directory
pub fn resolve_store_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    paths::default_store_path().context("cannot locate storage file")
}
