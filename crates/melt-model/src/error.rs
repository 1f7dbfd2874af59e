use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid measure selector pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid dataset '{dataset}': {reason}")]
    InvalidDataset { dataset: String, reason: String },
    #[error("unknown dataset preset '{0}'")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
