//! Token-aware HTTP client for the library API.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace, warn};

use crate::Result;
use crate::auth::{AuthToken, TokenStore};
use crate::error::{AuthError, Error, ProtocolError, TransportError};
use crate::guard::LOGIN_PATH;

use super::config::ClientConfig;
use super::endpoints::ErrorBody;
use super::navigator::Navigator;

/// What to do when the server answers 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnUnauthorized {
    /// Treat as session invalidation: drop the token, redirect to login.
    Invalidate,
    /// Report as an ordinary protocol error (credential endpoints).
    Report,
}

/// HTTP client for the library API.
///
/// Cheap to clone; clones share the underlying connection pool, token
/// store and navigator.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use libris::{ApiClient, ApiUrl, ClientConfig, History, MemoryTokenStore};
///
/// # async fn example() -> Result<(), libris::Error> {
/// let config = ClientConfig::new(ApiUrl::new("http://localhost:8080")?);
/// let client = ApiClient::new(config, Arc::new(MemoryTokenStore::new()), Arc::new(History::new()))?;
/// let books = client.books().list().await?;
/// println!("{} books", books.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Http {
                message: e.to_string(),
            })?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                tokens,
                navigator,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn token_store(&self) -> &dyn TokenStore {
        self.inner.tokens.as_ref()
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.inner.navigator.as_ref()
    }

    /// Whether a token is currently stored. Says nothing about its validity.
    pub fn has_token(&self) -> bool {
        self.inner.tokens.contains()
    }

    /// Authenticated GET returning a JSON body.
    #[instrument(skip(self), fields(api = %self.inner.config.base_url))]
    pub async fn get<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        debug!(path, "GET");
        let response = self
            .execute(self.request(Method::GET, path), OnUnauthorized::Invalidate)
            .await?;
        self.decode(response).await
    }

    /// Authenticated POST with a JSON body.
    #[instrument(skip(self, body), fields(api = %self.inner.config.base_url))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(path, "POST");
        let request = self.request(Method::POST, path).json(body);
        let response = self.execute(request, OnUnauthorized::Invalidate).await?;
        self.decode(response).await
    }

    /// Authenticated PUT with a JSON body.
    #[instrument(skip(self, body), fields(api = %self.inner.config.base_url))]
    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(path, "PUT");
        let request = self.request(Method::PUT, path).json(body);
        let response = self.execute(request, OnUnauthorized::Invalidate).await?;
        self.decode(response).await
    }

    /// Authenticated DELETE; the response body is ignored.
    #[instrument(skip(self), fields(api = %self.inner.config.base_url))]
    pub async fn delete(&self, path: &str) -> Result<()> {
        debug!(path, "DELETE");
        self.execute(self.request(Method::DELETE, path), OnUnauthorized::Invalidate)
            .await?;
        Ok(())
    }

    /// POST to a credential endpoint (login, register).
    ///
    /// A 401 here means the submitted credentials were rejected, not that
    /// the stored session went stale, so it is reported as a plain
    /// [`ProtocolError`] and leaves the token store alone.
    #[instrument(skip(self, body), fields(api = %self.inner.config.base_url))]
    pub(crate) async fn post_credentials<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(path, "POST (credentials)");
        let request = self.request(Method::POST, path).json(body);
        let response = self.execute(request, OnUnauthorized::Report).await?;
        self.decode(response).await
    }

    /// Build a request, attaching the bearer token when one is stored.
    fn request(&self, method: Method, path: &str) -> Outgoing {
        let url = self.inner.config.base_url.endpoint(path);
        let mut builder = self
            .inner
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let token = match self.inner.tokens.get() {
            Ok(Some(token)) => {
                trace!("Attaching bearer token");
                builder = builder.header(AUTHORIZATION, token.bearer());
                Some(token)
            }
            Ok(None) => {
                trace!("No token stored; sending without authorization");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read token; sending without authorization");
                None
            }
        };

        Outgoing { builder, token }
    }

    async fn execute(
        &self,
        outgoing: Outgoing,
        on_unauthorized: OnUnauthorized,
    ) -> Result<reqwest::Response> {
        let Outgoing { builder, token } = outgoing;
        let response = builder.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        trace!(status = %status, "API response");

        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response).await;

        if status == StatusCode::UNAUTHORIZED && on_unauthorized == OnUnauthorized::Invalidate {
            return Err(self.invalidate(token.as_ref(), message));
        }

        Err(ProtocolError::new(status.as_u16(), message).into())
    }

    async fn decode<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        response.json::<R>().await.map_err(|e| self.transport_error(e))
    }

    /// Drop the stored token and send the user to the login view.
    ///
    /// Only acts while the store still holds the token `sent` with the
    /// rejected request. A token stored since then belongs to a newer
    /// session and is left alone, as is the current location.
    fn invalidate(&self, sent: Option<&AuthToken>, message: Option<String>) -> Error {
        let current = match sent {
            Some(token) => self.inner.tokens.remove_if(token),
            None => self.inner.tokens.get().map(|stored| stored.is_none()),
        };

        match current {
            Ok(true) => {
                warn!("Received 401; clearing token and redirecting to login");
                self.inner.navigator.redirect(LOGIN_PATH);
            }
            Ok(false) => debug!("Received 401 for a replaced token; keeping current session"),
            Err(e) => {
                warn!(error = %e, "Failed to remove token after 401");
                self.inner.navigator.redirect(LOGIN_PATH);
            }
        }

        AuthError::Unauthorized { message }.into()
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        let err = match TransportError::from(err) {
            TransportError::Timeout { .. } => TransportError::Timeout {
                duration_ms: u64::try_from(self.inner.config.timeout.as_millis())
                    .unwrap_or(u64::MAX),
            },
            other => other,
        };
        Error::Transport(err)
    }
}

/// A prepared request and the token it carries.
struct Outgoing {
    builder: RequestBuilder,
    token: Option<AuthToken>,
}

impl Outgoing {
    fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.builder = self.builder.json(body);
        self
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Extract a human-readable message from an error response.
///
/// Understands `{"message": ".."}` and the field-to-message map returned
/// for validation failures; anything else yields `None`.
async fn error_message(response: reqwest::Response) -> Option<String> {
    let text = response.text().await.ok()?;
    parse_error_body(&text)
}

fn parse_error_body(text: &str) -> Option<String> {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ErrorBody>(text)
        && !message.is_empty()
    {
        return Some(message);
    }

    let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text).ok()?;
    let mut messages: Vec<String> = fields
        .iter()
        .filter_map(|(field, value)| value.as_str().map(|m| format!("{field}: {m}")))
        .collect();
    if messages.is_empty() {
        return None;
    }
    messages.sort();
    Some(messages.join("; "))
}
