//! libris - client for the library-management REST API.
//!
//! The crate is built around an explicit [`AuthSession`]: it owns the
//! signed-in user, persists the bearer token through a [`TokenStore`], and
//! talks to the API through an [`ApiClient`] that invalidates the session on
//! any 401. A [`RouteGuard`] decides which views a visitor may open.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use libris::{
//!     ApiClient, ApiUrl, AuthSession, ClientConfig, Credentials, Decision, FileTokenStore,
//!     History, RouteGuard,
//! };
//!
//! # async fn example() -> Result<(), libris::Error> {
//! let config = ClientConfig::new(ApiUrl::new("http://localhost:8080")?);
//! let tokens = Arc::new(FileTokenStore::new("/tmp/libris/token.json"));
//! let client = ApiClient::new(config, tokens, Arc::new(History::new()))?;
//!
//! let session = AuthSession::new(client);
//! session.initialize_auth().await;
//!
//! if !session.is_authenticated().await {
//!     let outcome = session.login(&Credentials::new("alice", "secret")).await;
//!     assert!(outcome.success, "{:?}", outcome.message);
//! }
//!
//! let guard = RouteGuard::library();
//! if session.navigate(&guard, "/dashboard/books/create").await == Decision::Allow {
//!     for book in session.client().books().list().await? {
//!         println!("{}: {}", book.id, book.title);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod error;
pub mod guard;
pub mod http;
pub mod models;
pub mod types;

// Re-export primary types at crate root for convenience
pub use api::DashboardSummary;
pub use auth::{
    AuthOutcome, AuthSession, AuthToken, Credentials, FileTokenStore, MemoryTokenStore,
    RegisterInput, RegistrationOutcome, SessionState, TokenStore,
};
pub use error::Error;
pub use guard::{Access, Decision, RouteGuard};
pub use http::{ApiClient, ClientConfig, History, Navigator};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
