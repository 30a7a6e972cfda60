//! Authentication types and session management.
//!
//! The [`TokenStore`] persists the bearer token; the [`AuthSession`] owns
//! the signed-in user and drives login, registration, logout and startup
//! restoration.

mod credentials;
mod outcome;
mod session;
mod store;
mod token;

pub use credentials::{Credentials, RegisterInput};
pub use outcome::{AuthOutcome, LOGIN_FAILED, REGISTRATION_FAILED, RegistrationOutcome};
pub use session::{AuthSession, SessionState};
pub use store::{DEFAULT_TOKEN_TTL, FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::AuthToken;
