//! Authenticated user and role.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A user as returned by `/api/v1/auth/me` and `/api/v1/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl User {
    /// Whether this user holds the admin role.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Some(Role::Admin))
    }
}

/// Role claim carried by a [`User`].
///
/// Only `ROLE_ADMIN` grants admin access; every other value is kept
/// verbatim so it can be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    User,
    Other(String),
}

impl Role {
    pub const ADMIN: &'static str = "ROLE_ADMIN";
    pub const USER: &'static str = "ROLE_USER";

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => Self::ADMIN,
            Role::User => Self::USER,
            Role::Other(s) => s,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::ADMIN => Role::Admin,
            Self::USER => Role::User,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn admin_role_is_recognised() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "username": "alice",
            "role": "ROLE_ADMIN"
        }))
        .unwrap();
        assert_eq!(user.role, Some(Role::Admin));
        assert!(user.is_admin());
    }

    #[test]
    fn other_roles_are_not_admin() {
        for role in ["ROLE_USER", "ADMIN", "role_admin", ""] {
            let user: User = serde_json::from_value(json!({
                "id": 2,
                "username": "bob",
                "role": role
            }))
            .unwrap();
            assert!(!user.is_admin(), "{role} must not grant admin");
        }
    }

    #[test]
    fn missing_role_is_not_admin() {
        let user: User = serde_json::from_value(json!({"id": 3, "username": "carol"})).unwrap();
        assert_eq!(user.role, None);
        assert!(!user.is_admin());
    }

    #[test]
    fn unknown_role_keeps_wire_value() {
        let role = Role::from("ROLE_LIBRARIAN".to_string());
        assert_eq!(role.to_string(), "ROLE_LIBRARIAN");
        assert_eq!(serde_json::to_value(&role).unwrap(), json!("ROLE_LIBRARIAN"));
    }
}
