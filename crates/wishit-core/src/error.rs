//! Error types for the Wishit admin dashboard

use std::{error::Error as StdError, fmt};

/// Main error type for the Wishit admin core
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or parsed
    Configuration {
        /// Error message
        message: String,
    },

    /// A backend response body had none of the recognized collection shapes
    UnexpectedShape {
        /// Collection that was being read
        collection: String,
        /// Short description of what was received
        found: String,
    },

    /// Session storage error
    Session(String),

    /// Serialization error
    Serialization(serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::UnexpectedShape { collection, found } => {
                write!(f, "Unexpected response shape for {collection}: {found}")
            }
            Self::Session(msg) => write!(f, "Session error: {msg}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}
