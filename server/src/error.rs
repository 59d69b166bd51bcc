//! Error types for the repository and the HTTP handlers.
//!
//! # Design
//! `RepoError` only knows whether a row was missing or the engine failed.
//! `ApiError` adds the client-fault cases and owns the status code mapping,
//! so handlers can use `?` on repository calls and input validation alike.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Errors returned by `TodoRepository`.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// No row matches the requested id.
    #[error("Task not found")]
    NotFound,

    /// The merged row would break a table invariant.
    #[error("Invalid input: {0}")]
    Invalid(&'static str),

    /// The SQLite engine or the connection pool failed.
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

/// Errors returned by request handlers, rendered as `{"error": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field is missing or empty.
    #[error("Invalid input: {0}")]
    Validation(&'static str),

    /// The request body or path could not be read.
    #[error("{0}")]
    BadRequest(String),

    #[error("Task not found")]
    NotFound,

    /// Surfaced verbatim, without redaction.
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => ApiError::NotFound,
            RepoError::Invalid(reason) => ApiError::Validation(reason),
            RepoError::Storage(source) => ApiError::Storage(source.to_string()),
        }
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "storage fault");
        } else {
            tracing::debug!(status = %status, error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
