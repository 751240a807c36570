use crate::error::{CorreiosError, Result};
use std::path::{Path, PathBuf};

pub const STORE_FILE: &str = ".correios";
pub const STORE_ENV: &str = "CORREIOS_FILESTORAGE";

/// `$HOME/.correios`
pub fn default_store_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(CorreiosError::HomeNotFound)?;
    Ok(store_path_in(&home))
}

pub fn store_path_in(dir: &Path) -> PathBuf {
    dir.join(STORE_FILE)
}

/// Mapping-backed (YAML) storage is selected by a `.yaml`/`.yml` extension.
pub fn is_yaml_store(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
