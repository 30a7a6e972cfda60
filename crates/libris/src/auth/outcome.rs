//! Result values returned by session operations.

use serde::Serialize;

use crate::Error;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Outcome of a login or registration attempt.
///
/// Session operations never return `Err`; failures are folded into this
/// value with the server's message when it sent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Failure carrying the message of `err`, or `fallback`.
    ///
    /// Server messages are used verbatim; local validation errors use their
    /// own description. Transport failures and bare status codes fall back.
    pub fn from_error(err: &Error, fallback: &str) -> Self {
        let message = match err {
            Error::InvalidInput(input) => Some(input.to_string()),
            other => other.server_message().map(str::to_string),
        };
        Self::failure(message.unwrap_or_else(|| fallback.to_string()))
    }
}

/// Outcome of [`AuthSession::register_and_login`](super::AuthSession::register_and_login).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// Account created and session established.
    Registered,
    /// Account created but the follow-up login failed.
    RegisteredLoginFailed { message: String },
    /// The account was not created.
    RegistrationFailed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InvalidInputError, ProtocolError, TransportError};

    #[test]
    fn server_message_wins_over_fallback() {
        let err = Error::Protocol(ProtocolError::new(401, Some("Bad credentials".into())));
        assert_eq!(
            AuthOutcome::from_error(&err, LOGIN_FAILED),
            AuthOutcome::failure("Bad credentials")
        );
    }

    #[test]
    fn fallback_when_no_message() {
        let err = Error::Protocol(ProtocolError::new(500, None));
        assert_eq!(
            AuthOutcome::from_error(&err, REGISTRATION_FAILED).message.as_deref(),
            Some("Registration failed")
        );

        let err = Error::Transport(TransportError::Timeout { duration_ms: 10_000 });
        assert_eq!(
            AuthOutcome::from_error(&err, LOGIN_FAILED).message.as_deref(),
            Some("Login failed")
        );
    }

    #[test]
    fn validation_error_is_described() {
        let err = Error::InvalidInput(InvalidInputError::Field {
            field: "email",
            reason: "Email should be valid".into(),
        });
        assert_eq!(
            AuthOutcome::from_error(&err, REGISTRATION_FAILED).message.as_deref(),
            Some("email: Email should be valid")
        );
    }

    #[test]
    fn success_serializes_without_message() {
        assert_eq!(
            serde_json::to_value(AuthOutcome::success()).unwrap(),
            serde_json::json!({"success": true})
        );
    }
}
