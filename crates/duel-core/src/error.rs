//! Error types for the duel simulation

use thiserror::Error;

/// Result type for fallible duel operations
pub type Result<T> = std::result::Result<T, DuelError>;

/// Duel error types.
///
/// Rejected combat actions are not errors; see [`crate::ActionOutcome`].
/// These cover the paths that touch configuration and storage.
#[derive(Debug, Error)]
pub enum DuelError {
    /// Policy load/save failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Bad configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for DuelError {
    fn from(err: serde_json::Error) -> Self {
        DuelError::Serialization(err.to_string())
    }
}
