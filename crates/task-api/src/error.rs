//! Error types for the store and the HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Body returned for any 500 response.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by `TaskStore` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing or invalid required field
    #[error("{0}")]
    Validation(String),

    /// No task has the requested id
    #[error("Task not found: {0}")]
    NotFound(String),

    /// The store has been closed
    #[error("Task store is not connected")]
    Unavailable,

    /// Backing file could not be read or written
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored documents could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Connection target names a backend we do not have
    #[error("Unsupported store target: {0}")]
    UnsupportedTarget(String),
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400
    #[error("{0}")]
    Validation(String),

    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 500; the source is logged, never sent to the caller
    #[error("Unexpected error: {0}")]
    Unexpected(#[source] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => Self::Validation(msg),
            StoreError::NotFound(_) => Self::NotFound("Task not found".to_string()),
            other => Self::Unexpected(other.into()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Validation(msg) | Self::NotFound(msg) => msg.clone(),
            Self::Unexpected(source) => {
                error!(error = ?source, "Unhandled error while serving request");
                GENERIC_ERROR_MESSAGE.to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
