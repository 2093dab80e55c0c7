//! Error types for backend requests

use thiserror::Error;

/// Result type alias for backend operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Fallback when a failed request carries no backend message
pub const GENERIC_FAILURE: &str = "Request failed. Please try again.";
/// Shown when the backend cannot be reached
pub const SERVER_NOT_RESPONDING: &str = "The server is not responding";
/// Shown when the backend answers with an unusable body
pub const UNEXPECTED_RESPONSE: &str = "Unexpected response from the server";

/// Errors that can occur while talking to the Wishit backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Input rejected before any request was sent
    #[error("Validation error: {message}")]
    Validation {
        /// Message for the user
        message: String,
    },

    /// No response: connection refused, DNS failure, reset
    #[error("Backend unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Backend returned HTTP {status}{}", status_detail(.message.as_deref()))]
    Status {
        /// HTTP status code
        status: u16,
        /// `message` field of the error body, when present
        message: Option<String>,
    },

    /// The backend answered `success: false`
    #[error("Request rejected by the backend")]
    Rejected,

    /// The body is not the JSON the operation expects
    #[error("Invalid response body: {message}")]
    Decode {
        /// Decoder message
        message: String,
    },

    /// A collection body had an unrecognized shape
    #[error(transparent)]
    Shape(#[from] wishit_core::Error),
}

fn status_detail(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ClientError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl std::fmt::Display) -> Self {
        Self::Decode {
            message: message.to_string(),
        }
    }

    /// HTTP status, when the backend answered
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human readable message, using `fallback` when the backend gave none
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Transport(_) => SERVER_NOT_RESPONDING.to_string(),
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Status { .. } | Self::Rejected => fallback.to_string(),
            Self::Decode { .. } | Self::Shape(_) => UNEXPECTED_RESPONSE.to_string(),
        }
    }

    /// Human readable message for screens
    #[must_use]
    pub fn user_message(&self) -> String {
        self.message_or(GENERIC_FAILURE)
    }
}

impl From<ClientError> for wishit_core::context_error::ContextError {
    fn from(err: ClientError) -> Self {
        Self::with_context(err, "Backend request failed")
    }
}
