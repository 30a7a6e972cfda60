//! Error types for the libris library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, protocol, input validation and token storage
//! errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for libris operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, body decoding).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (missing token, rejected session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses from the API.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Token persistence errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns the human-readable message supplied by the server, if any.
    ///
    /// Only errors produced from an HTTP response carry a server message;
    /// transport and local failures return `None`.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Protocol(err) => err.message.as_deref(),
            Error::Auth(AuthError::Unauthorized { message }) => message.as_deref(),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol(err) => Some(err.status),
            Error::Auth(AuthError::Unauthorized { .. }) => Some(401),
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout { duration_ms: 0 }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server answered 401; the stored token has been discarded.
    #[error("unauthorized{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unauthorized { message: Option<String> },

    /// An operation needed a session but none is established.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// A non-success response from the API.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Check if this is a not-found response.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A form field failed validation.
    #[error("{field}: {reason}")]
    Field { field: &'static str, reason: String },
}

/// Token persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the token file failed.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// The token file exists but could not be parsed.
    #[error("corrupt token file {path}: {message}")]
    Corrupt { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_from_protocol_error() {
        let err = Error::Protocol(ProtocolError::new(409, Some("Username taken".into())));
        assert_eq!(err.server_message(), Some("Username taken"));
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "protocol error: HTTP 409: Username taken");
    }

    #[test]
    fn unauthorized_display_includes_message() {
        let err = AuthError::Unauthorized {
            message: Some("Token expired".into()),
        };
        assert_eq!(err.to_string(), "unauthorized: Token expired");
        assert_eq!(
            AuthError::Unauthorized { message: None }.to_string(),
            "unauthorized"
        );
    }

    #[test]
    fn transport_errors_have_no_server_message() {
        let err = Error::Transport(TransportError::Timeout { duration_ms: 10_000 });
        assert_eq!(err.server_message(), None);
        assert_eq!(err.status(), None);
    }
}
