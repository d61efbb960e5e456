//! Error types for persistence operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing persisted tracker state
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to create data directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize JSON")]
    SerializeJson(#[source] serde_json::Error),

    #[error("failed to serialize TOML")]
    SerializeToml(#[source] toml::ser::Error),
}
