//! Error types for the sync system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the sync system
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP layer could not complete the exchange
    #[error("transport error: {0}")]
    Transport(String),

    /// Remote answered with a non-success status code
    #[error("remote rejected request: status {status}: {body}")]
    RemoteRejection {
        /// HTTP status code of the rejection
        status: u16,
        /// Response body, for operator diagnosis
        body: String,
    },

    /// Response body not shaped as expected
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Storage lookup miss
    #[error("record not found: {0}")]
    NotFound(String),

    /// Contact store errors
    #[error("contact store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Job queue errors
    #[error("job queue error: {0}")]
    Queue(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a remote rejection error
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteRejection {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed document error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a contact store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a job queue error
    pub fn queue(msg: impl Into<String>) -> Self {
        Self::Queue(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
