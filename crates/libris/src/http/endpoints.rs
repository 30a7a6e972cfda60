//! API paths and auth request/response bodies.

use serde::Deserialize;

use crate::models::User;

// ============================================================================
// Endpoint Paths
// ============================================================================

pub const AUTH_LOGIN: &str = "/api/v1/auth/login";
pub const AUTH_REGISTER: &str = "/api/v1/auth/register";
pub const AUTH_ME: &str = "/api/v1/auth/me";

pub const BOOKS: &str = "/api/v1/books";
pub const AUTHORS: &str = "/api/v1/authors";
pub const GENRES: &str = "/api/v1/genres";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response from the login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Error body produced by the API's exception handler.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
