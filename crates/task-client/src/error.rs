//! Error types for the task client.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur when talking to the task service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Task service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Another request is still in flight
    #[error("Another request is still in progress")]
    Busy,

    /// Input rejected before any request was sent
    #[error("{0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Whether the service reported the task as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
