use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorreiosError {
    #[error("invalid tracking code '{code}': must have 13 characters and no spaces or ';' (got {len})")]
    InvalidCode { code: String, len: usize },

    #[error("invalid label '{0}': labels must fit on a single line")]
    InvalidLabel(String),

    #[error("tracking code already added: {0}")]
    AlreadyExists(String),

    #[error("tracking code not found: {0}")]
    NotFound(String),

    #[error("label '{label}' matches more than one code: {}", .codes.join(", "))]
    AmbiguousLabel { label: String, codes: Vec<String> },

    #[error("no tracking codes to check")]
    EmptyBatch,

    #[error(
        "corrupt storage file {}{}: {reason}",
        .path.display(),
        .line.map(|n| format!(" (line {n})")).unwrap_or_default()
    )]
    CorruptStore {
        path: PathBuf,
        line: Option<usize>,
        reason: String,
    },

    #[error("home directory not found: set HOME or CORREIOS_FILESTORAGE")]
    HomeNotFound,

    #[error("request to carrier failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected carrier response: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CorreiosError>;
