//! Axum-specific error types and mappings.
//!
//! Errors here only cover failures before a progress stream starts and the
//! history endpoints. Once streaming begins, failures travel as events.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use calmwave_core::{RepositoryError, ValidationError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Caller identity or credential missing or rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Well-formed JSON with the wrong shape.
    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<RepositoryError> for HttpError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => Self::NotFound("Meditation not found".to_string()),
            RepositoryError::Storage(msg) | RepositoryError::Serialization(msg) => {
                error!(error = %msg, "Meditation storage failed");
                Self::Internal("Failed to load meditations".to_string())
            }
        }
    }
}

impl From<ValidationError> for HttpError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyPrompt => Self::BadRequest(err.to_string()),
            other => Self::Unprocessable(other.to_string()),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
            Self::Unprocessable(rejection.body_text())
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (HttpError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (HttpError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (HttpError::Unprocessable("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (HttpError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (HttpError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_storage_details_are_not_exposed() {
        let err: HttpError = RepositoryError::Storage("disk I/O error at page 7".into()).into();
        assert!(matches!(err, HttpError::Internal(ref m) if !m.contains("page 7")));
    }

    #[test]
    fn test_empty_prompt_is_bad_request() {
        let err: HttpError = ValidationError::EmptyPrompt.into();
        assert!(matches!(err, HttpError::BadRequest(ref m) if m == "Please describe how you are feeling"));
    }
}
