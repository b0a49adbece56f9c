//! Error handling for the CCL Prep client

use std::fmt;
use thiserror::Error;

/// Fallback message shown when neither the server nor the transport
/// provided anything human-readable.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Unified error type for the CCL Prep client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File IO errors (audio uploads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The backend answered with a failure envelope or non-2xx status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Client-side validation failure; no request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication errors (missing or rejected session)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new API error from a status code and server message
    pub fn api(status: u16, message: impl fmt::Display) -> Self {
        Error::Api {
            status,
            message: message.to_string(),
        }
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The message to surface in a user-facing notification.
    ///
    /// Precedence: the server-provided message, else the transport error's own
    /// text, else a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } if !message.is_empty() => message.clone(),
            Error::Validation(msg) | Error::Auth(msg) | Error::General(msg) => msg.clone(),
            Error::Http(err) => err.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
