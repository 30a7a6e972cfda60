//! Login and registration input.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, InvalidInputError};

/// Login credentials for the library API.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use libris::Credentials;
///
/// let creds = Credentials::new("alice", "secret");
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Clone, Serialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration form for a new account.
///
/// [`RegisterInput::validate`] applies the same constraints the server
/// enforces, so obviously bad input fails before a request is made.
#[derive(Clone, Serialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// The credentials to log in with once registration succeeds.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }

    /// Check field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as [`InvalidInputError::Field`].
    pub fn validate(&self) -> Result<(), Error> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(field("username", "Username is required"));
        }
        if username.chars().count() > 50 {
            return Err(field("username", "Username must be less than 50 characters"));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(field("email", "Email is required"));
        }
        if !is_plausible_email(email) {
            return Err(field("email", "Email should be valid"));
        }
        if email.chars().count() > 100 {
            return Err(field("email", "Email must be less than 100 characters"));
        }

        let len = self.password.chars().count();
        if self.password.trim().is_empty() {
            return Err(field("password", "Password is required"));
        }
        if !(6..=100).contains(&len) {
            return Err(field(
                "password",
                "Password must be between 6 and 100 characters",
            ));
        }

        Ok(())
    }
}

fn field(field: &'static str, reason: &str) -> Error {
    InvalidInputError::Field {
        field,
        reason: reason.to_string(),
    }
    .into()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_password_in_debug() {
        let creds = Credentials::new("alice", "secret123");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn credentials_serialize_as_login_body() {
        let creds = Credentials::new("alice", "secret");
        assert_eq!(
            serde_json::to_value(&creds).unwrap(),
            serde_json::json!({"username": "alice", "password": "secret"})
        );
    }

    #[test]
    fn valid_registration_passes() {
        RegisterInput::new("bob", "bob@example.com", "hunter22")
            .validate()
            .unwrap();
    }

    #[test]
    fn registration_constraints() {
        let cases = [
            RegisterInput::new(" ", "bob@example.com", "hunter22"),
            RegisterInput::new("b".repeat(51), "bob@example.com", "hunter22"),
            RegisterInput::new("bob", "not-an-email", "hunter22"),
            RegisterInput::new("bob", "bob@example.com", "short"),
            RegisterInput::new("bob", "bob@example.com", "p".repeat(101)),
        ];
        for input in cases {
            assert!(input.validate().is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn register_debug_hides_password() {
        let input = RegisterInput::new("bob", "bob@example.com", "hunter22");
        assert!(!format!("{input:?}").contains("hunter22"));
    }
}
