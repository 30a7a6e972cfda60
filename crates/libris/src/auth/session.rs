//! Authentication session for the library client.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::guard::{Access, Decision, RouteGuard};
use crate::http::{AUTH_LOGIN, AUTH_ME, AUTH_REGISTER, ApiClient, LoginResponse};
use crate::models::User;

use super::outcome::{AuthOutcome, LOGIN_FAILED, REGISTRATION_FAILED, RegistrationOutcome};
use super::{AuthToken, Credentials, RegisterInput};

/// Lifecycle state of an [`AuthSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No verified user.
    Anonymous,
    /// A current-user fetch is in flight.
    Verifying,
    /// A user has been fetched and its role is known.
    Authenticated(User),
}

/// The signed-in user of one client, and the operations that change it.
///
/// An `AuthSession` is an explicit context object: build one at startup
/// around an [`ApiClient`], call [`initialize_auth`](Self::initialize_auth)
/// once, and pass clones to whatever needs it. Clones share state.
///
/// Each user fetch is tagged with a generation number. [`logout`] and every
/// newer fetch advance the generation, and a fetch that completes after
/// being superseded is discarded instead of overwriting newer state.
///
/// [`logout`]: Self::logout
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use libris::{ApiClient, ApiUrl, AuthSession, ClientConfig, Credentials, History, MemoryTokenStore};
///
/// # async fn example() -> Result<(), libris::Error> {
/// let config = ClientConfig::new(ApiUrl::new("http://localhost:8080")?);
/// let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new()), Arc::new(History::new()))?;
/// let session = AuthSession::new(client);
///
/// let outcome = session.login(&Credentials::new("alice", "secret")).await;
/// if outcome.success {
///     println!("admin: {}", session.is_admin().await);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: ApiClient,
    state: RwLock<SessionState>,
    generation: AtomicU64,
}

impl AuthSession {
    /// Create an anonymous session around `client`.
    pub fn new(client: ApiClient) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                client,
                state: RwLock::new(SessionState::Anonymous),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    pub async fn state(&self) -> SessionState {
        self.inner.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        match &*self.inner.state.read().await {
            SessionState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(
            &*self.inner.state.read().await,
            SessionState::Authenticated(_)
        )
    }

    pub async fn is_admin(&self) -> bool {
        matches!(
            &*self.inner.state.read().await,
            SessionState::Authenticated(user) if user.is_admin()
        )
    }

    /// Access level as seen by the route guard.
    pub async fn access(&self) -> Access {
        match &*self.inner.state.read().await {
            SessionState::Authenticated(user) if user.is_admin() => Access::Admin,
            SessionState::Authenticated(_) => Access::User,
            _ => Access::Anonymous,
        }
    }

    /// Log in and load the current user.
    ///
    /// On success the token is stored and the session is
    /// [`Authenticated`](SessionState::Authenticated) when this returns. On
    /// failure the token store is left as it was.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> AuthOutcome {
        info!("Logging in");

        let response: LoginResponse = match self
            .inner
            .client
            .post_credentials(AUTH_LOGIN, credentials)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login rejected");
                return AuthOutcome::from_error(&e, LOGIN_FAILED);
            }
        };

        let token = AuthToken::new(response.token);
        if token.is_empty() {
            warn!("Login response carried an empty token");
            return AuthOutcome::failure(LOGIN_FAILED);
        }

        if let Err(e) = self.inner.client.token_store().set(&token) {
            warn!(error = %e, "Failed to store token");
            return AuthOutcome::from_error(&e, LOGIN_FAILED);
        }

        match self.fetch_current_user().await {
            Some(user) => {
                debug!(user = %user.username, "Login complete");
                AuthOutcome::success()
            }
            None => AuthOutcome::failure(LOGIN_FAILED),
        }
    }

    /// Create an account. Does not log in.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: &RegisterInput) -> AuthOutcome {
        info!("Registering account");

        if let Err(e) = input.validate() {
            debug!(error = %e, "Registration input rejected locally");
            return AuthOutcome::from_error(&e, REGISTRATION_FAILED);
        }

        match self
            .inner
            .client
            .post_credentials::<_, User>(AUTH_REGISTER, input)
            .await
        {
            Ok(user) => {
                debug!(id = user.id, "Account registered");
                AuthOutcome::success()
            }
            Err(e) => {
                warn!(error = %e, "Registration rejected");
                AuthOutcome::from_error(&e, REGISTRATION_FAILED)
            }
        }
    }

    /// Register, then log in with the same credentials.
    ///
    /// A failed login after a successful registration is reported as
    /// [`RegistrationOutcome::RegisteredLoginFailed`], never as a
    /// registration failure.
    pub async fn register_and_login(&self, input: &RegisterInput) -> RegistrationOutcome {
        let registered = self.register(input).await;
        if !registered.success {
            return RegistrationOutcome::RegistrationFailed {
                message: registered
                    .message
                    .unwrap_or_else(|| REGISTRATION_FAILED.to_string()),
            };
        }

        let login = self.login(&input.credentials()).await;
        if login.success {
            RegistrationOutcome::Registered
        } else {
            RegistrationOutcome::RegisteredLoginFailed {
                message: login.message.unwrap_or_else(|| LOGIN_FAILED.to_string()),
            }
        }
    }

    /// Load the user for the stored token.
    ///
    /// Returns the user on success. On any failure the session is logged
    /// out, so a stale token never leaves it half-populated. Returns `None`
    /// as well when a newer fetch or a logout superseded this one.
    #[instrument(skip(self))]
    pub async fn fetch_current_user(&self) -> Option<User> {
        let generation = {
            let mut state = self.inner.state.write().await;
            *state = SessionState::Verifying;
            self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        debug!(generation, "Fetching current user");

        let result = self.inner.client.get::<User>(AUTH_ME).await;

        let mut state = self.inner.state.write().await;
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding superseded user fetch");
            return None;
        }

        match result {
            Ok(user) => {
                debug!(user = %user.username, admin = user.is_admin(), "Current user loaded");
                *state = SessionState::Authenticated(user.clone());
                Some(user)
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch current user");
                drop(state);
                self.logout().await;
                None
            }
        }
    }

    /// Clear the stored token and forget the user. Safe to call repeatedly.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.inner.client.token_store().remove() {
            warn!(error = %e, "Failed to remove stored token");
        }

        let mut state = self.inner.state.write().await;
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        *state = SessionState::Anonymous;
        debug!("Logged out");
    }

    /// Restore the session from a stored token, if any.
    ///
    /// Without a stored token this makes no request and the session stays
    /// anonymous.
    #[instrument(skip(self))]
    pub async fn initialize_auth(&self) {
        if self.inner.client.has_token() {
            debug!("Stored token found; verifying");
            self.fetch_current_user().await;
        } else {
            debug!("No stored token");
        }
    }

    /// Evaluate a navigation to `path` against `guard`.
    ///
    /// When a token is stored but no user is loaded yet, the session is
    /// initialized first so the decision reflects the verified role.
    pub async fn navigate(&self, guard: &RouteGuard, path: &str) -> Decision {
        if !self.is_authenticated().await && self.inner.client.has_token() {
            self.initialize_auth().await;
        }
        guard.evaluate(path, self.access().await)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("client", &self.inner.client)
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::auth::store::TokenStore;
    use crate::http::{ClientConfig, History};
    use crate::types::ApiUrl;

    fn offline_session(store: Arc<MemoryTokenStore>) -> AuthSession {
        // Port 9 (discard) is never served in test environments.
        let config = ClientConfig::new(ApiUrl::new("http://127.0.0.1:9").unwrap())
            .with_timeout(std::time::Duration::from_millis(200));
        let client = ApiClient::new(config, store, Arc::new(History::new())).unwrap();
        AuthSession::new(client)
    }

    #[tokio::test]
    async fn new_session_is_anonymous() {
        let session = offline_session(Arc::new(MemoryTokenStore::new()));
        assert_eq!(session.state().await, SessionState::Anonymous);
        assert!(!session.is_authenticated().await);
        assert!(!session.is_admin().await);
        assert_eq!(session.access().await, Access::Anonymous);
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let store = Arc::new(MemoryTokenStore::with_token(AuthToken::new("tok")));
        let session = offline_session(store.clone());

        session.logout().await;
        session.logout().await;

        assert!(!store.contains());
        assert_eq!(session.state().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn register_rejects_invalid_input_locally() {
        let session = offline_session(Arc::new(MemoryTokenStore::new()));
        let outcome = session
            .register(&RegisterInput::new("bob", "bob-at-example", "hunter22"))
            .await;
        assert_eq!(outcome, AuthOutcome::failure("email: Email should be valid"));
    }

    #[tokio::test]
    async fn unreachable_server_on_fetch_logs_out() {
        let store = Arc::new(MemoryTokenStore::with_token(AuthToken::new("tok")));
        let session = offline_session(store.clone());

        assert_eq!(session.fetch_current_user().await, None);
        assert_eq!(session.state().await, SessionState::Anonymous);
        assert!(!store.contains());
    }
}
