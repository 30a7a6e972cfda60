//! Client configuration.

use std::time::Duration;

use crate::types::ApiUrl;

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for an [`ApiClient`](super::ApiClient).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use libris::{ApiUrl, ClientConfig};
///
/// let config = ClientConfig::new(ApiUrl::new("http://localhost:8080").unwrap())
///     .with_timeout(Duration::from_secs(3));
/// assert_eq!(config.timeout, Duration::from_secs(3));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: ApiUrl,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("libris/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
