//! Error types for sync, snapshot and share operations

use thiserror::Error;

/// Errors reading or writing a boss list snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to parse boss list")]
    Parse(#[source] serde_json::Error),

    #[error("boss list must be a JSON array")]
    NotAList,

    #[error("failed to serialize boss list")]
    Serialize(#[source] serde_json::Error),
}

/// Errors building or applying a share token
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("no bosses are counting down, nothing to share")]
    NothingToShare,

    #[error("share token is not valid base64")]
    Decode(#[from] base64::DecodeError),

    #[error("share token has an invalid payload")]
    Parse(#[source] serde_json::Error),

    #[error("failed to encode share token")]
    Encode(#[source] serde_json::Error),
}
