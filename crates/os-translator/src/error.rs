//! Error types for the translator layer.

use std::path::PathBuf;

/// Failures outside the per-object translation path. Problems with a single
/// source object are reported as [`TranslationMessage`](crate::TranslationMessage)s
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum TranslatorError {
    #[error("IDF error: {0}")]
    Idf(#[from] os_idf::IdfError),

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TranslatorResult<T> = Result<T, TranslatorError>;
