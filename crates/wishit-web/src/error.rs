//! JSON error responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use wishit_client::ClientError;

/// Error returned by the JSON endpoints
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code
    pub status: StatusCode,
    /// Machine readable code
    pub code: &'static str,
    /// Message for the user
    pub message: String,
    /// Where the browser should go instead, for session errors
    pub redirect: Option<&'static str>,
}

impl ApiError {
    /// Create a new API error
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            redirect: None,
        }
    }

    /// Request body rejected before reaching the backend
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// Unknown collection or record
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// Backend failure, described by `message`
    #[must_use]
    pub fn backend(err: &ClientError, message: impl Into<String>) -> Self {
        match err {
            ClientError::Validation { .. } => Self::bad_request(message),
            _ => Self::new(StatusCode::BAD_GATEWAY, "BACKEND_ERROR", message),
        }
    }

    /// Attach a redirect target
    #[must_use]
    pub const fn with_redirect(mut self, path: &'static str) -> Self {
        self.redirect = Some(path);
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Error code
    pub error: &'static str,
    /// Message for the user
    pub message: String,
    /// Redirect target, for session errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            error: self.code,
            message: self.message,
            redirect: self.redirect,
        };

        (self.status, Json(body)).into_response()
    }
}
