//! Dashboard counts.

use serde::Serialize;
use tracing::instrument;

use crate::Result;
use crate::auth::AuthSession;
use crate::error::AuthError;

/// Collection sizes shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub username: String,
    pub is_admin: bool,
    pub books: usize,
    pub authors: usize,
    pub genres: usize,
}

impl DashboardSummary {
    /// Fetch the three collections concurrently and count them.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] without making requests when
    /// the session has no user, and otherwise the first failing request.
    #[instrument(skip(session))]
    pub async fn load(session: &AuthSession) -> Result<Self> {
        let user = session.user().await.ok_or(AuthError::NotAuthenticated)?;
        let client = session.client();

        let books = client.books();
        let authors = client.authors();
        let genres = client.genres();
        let (books, authors, genres) =
            tokio::try_join!(books.list(), authors.list(), genres.list())?;

        Ok(Self {
            is_admin: user.is_admin(),
            username: user.username,
            books: books.len(),
            authors: authors.len(),
            genres: genres.len(),
        })
    }
}
