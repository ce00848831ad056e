//! API error types and responses.
//!
//! Every failure is returned as
//! `{"status": "error", "message": "...", "details": "..."}`, where
//! `details` carries the underlying cause when there is one.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use assistant_chat_client::ClientError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request body or parameters.
    #[error("{0}")]
    BadRequest(String),

    /// The upstream call failed; the status mirrors the upstream's when it
    /// produced one.
    #[error("{message}")]
    Upstream {
        /// Status returned to the caller.
        status: StatusCode,
        /// What the gateway was doing.
        message: String,
        /// Cause reported by the upstream.
        details: Option<String>,
    },

    /// Internal server error.
    #[error("{message}")]
    Internal {
        /// What the gateway was doing.
        message: String,
        /// Underlying cause.
        details: Option<String>,
    },
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    /// Wrap a client error, passing through the upstream status.
    ///
    /// Errors without an upstream status (unreachable endpoint, unreadable
    /// body) map to 500.
    pub fn from_client(message: impl Into<String>, err: ClientError) -> Self {
        let status = match &err {
            ClientError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ClientError::Config(_)
            | ClientError::Io(_)
            | ClientError::Connection(_)
            | ClientError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let details = match err {
            ClientError::Upstream { message, .. } => message,
            other => other.to_string(),
        };
        Self::Upstream {
            status,
            message: message.into(),
            details: Some(details),
        }
    }

    /// A 500 with the cause attached.
    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.into(),
            details: Some(cause.to_string()),
        }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Upstream { .. } => "upstream_error",
            Self::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();
        let details = match self {
            Self::BadRequest(_) => None,
            Self::Upstream { details, .. } | Self::Internal { details, .. } => details,
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), code, message = %message, details = ?details, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), code, message = %message, "Request rejected");
        }

        let body = ErrorResponse {
            status: "error",
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::internal("Failed", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_status_passes_through() {
        let err = ApiError::from_client(
            "Failed to upload file",
            ClientError::Upstream {
                status: 413,
                message: "file too large".into(),
            },
        );
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.to_string(), "Failed to upload file");
        assert_eq!(err.code(), "upstream_error");
    }

    #[test]
    fn parse_failure_is_internal_error() {
        let err = ApiError::from_client("Failed", ClientError::Parse("bad json".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "upstream_error");
    }

    #[test]
    fn error_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).code(), "bad_request");
        assert_eq!(ApiError::internal("x", "y").code(), "internal_error");
    }
}
