use thiserror::Error;

pub type ShieldResult<T> = Result<T, ShieldError>;

/// Engine-edge errors. The decision path itself is total — policy rejections
/// and timeouts are ordinary responses, never errors.
#[derive(Error, Debug)]
pub enum ShieldError {
    #[error("Unknown permission type: {0}")]
    UnknownPermission(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
