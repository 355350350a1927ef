//! Error types for the world text service

use thiserror::Error;

use crate::multiline::TextId;

/// Errors surfaced by registry and persistence operations
#[derive(Debug, Error)]
pub enum WorldTextError {
    /// Operation referenced an id absent from the live registry
    #[error("world text {0} not found")]
    NotFound(TextId),

    /// Persisted origin string is not three space-separated numbers
    #[error("malformed vector string {0:?}: expected \"x y z\"")]
    MalformedVector(String),

    /// Persisted rotation string is not three space-separated numbers
    #[error("malformed angle string {0:?}: expected \"x y z\"")]
    MalformedAngles(String),

    /// Config file could not be read or written
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file contents do not match the persisted schema
    #[error("config deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}
