//! Error types for the REST API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kpod_core::KpodError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for REST API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned to REST clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Reference did not resolve to an image.
    #[error("{0}")]
    NotFound(String),

    /// Missing or unusable request parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Request did not finish within its deadline.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Server error.
    #[error("Server error: {0}")]
    Server(String),
}

impl ApiError {
    /// Wrap a runtime error with what the handler was trying to do.
    pub fn lookup(context: &str, err: KpodError) -> Self {
        let message = format!("{context}, {err}");
        match err {
            KpodError::ImageNotFound(_) => Self::NotFound(message),
            KpodError::AmbiguousReference(_) => Self::InvalidParameter(message),
            KpodError::Cancelled => Self::Timeout(message),
            _ => Self::Server(message),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            message: self.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_status_mapping() {
        let cases = [
            (KpodError::ImageNotFound("x".into()), StatusCode::NOT_FOUND),
            (KpodError::AmbiguousReference("ab".into()), StatusCode::BAD_REQUEST),
            (KpodError::StorageError("index".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (KpodError::Cancelled, StatusCode::GATEWAY_TIMEOUT),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::lookup("unable to get image", err).status_code(), status);
        }
    }

    #[test]
    fn test_lookup_message_keeps_cause() {
        let err = ApiError::lookup(
            "unable to get image",
            KpodError::ImageNotFound("doesnotexist".into()),
        );
        assert_eq!(
            err.to_string(),
            "unable to get image, No such image: doesnotexist"
        );
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = ApiError::InvalidParameter("missing 'id'".into());
        assert_eq!(err.to_string(), "Invalid parameter: missing 'id'");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
