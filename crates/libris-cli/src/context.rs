//! Per-invocation client context.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use tracing::debug;

use libris::guard::LOGIN_PATH;
use libris::{
    ApiClient, ApiUrl, AuthSession, ClientConfig, Decision, FileTokenStore, Navigator, RouteGuard,
};

use crate::output;
use crate::storage;

/// Reports forced redirects on the terminal.
#[derive(Default)]
struct TerminalNavigator {
    quiet: AtomicBool,
}

impl Navigator for TerminalNavigator {
    fn redirect(&self, to: &str) {
        if to == LOGIN_PATH && !self.quiet.load(Ordering::Relaxed) {
            output::error("Session is no longer valid. Run 'libris login' to sign in again.");
        } else {
            debug!(to, "Redirect requested");
        }
    }
}

/// Session and route guard shared by all commands.
pub struct Context {
    pub session: AuthSession,
    pub guard: RouteGuard,
    navigator: Arc<TerminalNavigator>,
}

impl Context {
    pub fn new(api: &str, timeout: Duration) -> Result<Self> {
        let api = ApiUrl::new(api).context("Invalid API URL")?;
        let tokens = FileTokenStore::new(storage::token_path()?);
        debug!(path = %tokens.path().display(), "Using token file");

        let config = ClientConfig::new(api)
            .with_timeout(timeout)
            .with_user_agent(concat!("libris-cli/", env!("LIBRIS_VERSION")));
        let navigator = Arc::new(TerminalNavigator::default());
        let client = ApiClient::new(config, Arc::new(tokens), navigator.clone())
            .context("Failed to build HTTP client")?;

        Ok(Self {
            session: AuthSession::new(client),
            guard: RouteGuard::library(),
            navigator,
        })
    }

    /// Stop announcing expired sessions. For commands that establish a new
    /// session anyway.
    pub fn quiet_redirects(&self) {
        self.navigator.quiet.store(true, Ordering::Relaxed);
    }

    /// Run the route guard for the view a command corresponds to.
    pub async fn enter(&self, route: &str) -> Result<()> {
        match self.session.navigate(&self.guard, route).await {
            Decision::Allow => Ok(()),
            Decision::Redirect(to) if to == LOGIN_PATH => {
                bail!("Not logged in. Run 'libris login' first.")
            }
            Decision::Redirect(to) => {
                bail!("{route} requires the admin role (redirected to {to})")
            }
        }
    }
}
