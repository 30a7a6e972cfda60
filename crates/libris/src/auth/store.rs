//! Bearer token persistence.
//!
//! A [`TokenStore`] holds at most one token. The store itself never
//! validates tokens; a 401 from the API is the signal that a token has
//! gone stale, and the HTTP layer removes it then.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use fs2::FileExt;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::error::StorageError;

use super::AuthToken;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// How long a persisted token stays readable.
pub const DEFAULT_TOKEN_TTL: TimeDelta = TimeDelta::days(7);

/// Persistent holder of the current bearer token.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn get(&self) -> Result<Option<AuthToken>>;

    /// Replace the stored token.
    fn set(&self, token: &AuthToken) -> Result<()>;

    /// Remove the stored token. Removing from an empty store succeeds.
    fn remove(&self) -> Result<()>;

    /// Remove the stored token only if it is still `expected`.
    ///
    /// Returns whether a token was removed. A token replaced since
    /// `expected` was read is left in place.
    fn remove_if(&self, expected: &AuthToken) -> Result<bool> {
        if self.get()?.as_ref() == Some(expected) {
            self.remove()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Whether a token is currently stored.
    ///
    /// Read failures count as "no token".
    fn contains(&self) -> bool {
        matches!(self.get(), Ok(Some(_)))
    }
}

/// In-process token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out holding `token`.
    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<AuthToken>> {
        Ok(self.token.read().clone())
    }

    fn set(&self, token: &AuthToken) -> Result<()> {
        *self.token.write() = Some(token.clone());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        self.token.write().take();
        Ok(())
    }

    fn remove_if(&self, expected: &AuthToken) -> Result<bool> {
        let mut token = self.token.write();
        if token.as_ref() == Some(expected) {
            *token = None;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// On-disk token record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Token store backed by a single JSON file.
///
/// Tokens expire `ttl` after they were written (seven days by default);
/// an expired token reads as absent and the file is removed. On Unix the
/// file is created with mode `0600`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    ttl: TimeDelta,
}

impl FileTokenStore {
    /// Create a store persisting to `path`. Parent directories are created
    /// on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ttl: DEFAULT_TOKEN_TTL,
        }
    }

    /// Override the token lifetime.
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Take the advisory lock guarding the token file. Released on drop.
    fn lock(&self, exclusive: bool) -> Result<LockGuard> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| self.io_error(e))?;

        let locked = if exclusive {
            FileExt::lock_exclusive(&file)
        } else {
            FileExt::lock_shared(&file)
        };
        locked.map_err(|e| self.io_error(e))?;

        Ok(LockGuard(file))
    }

    fn io_error(&self, err: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Read the record. Caller holds the lock.
    fn read(&self) -> Result<Option<StoredToken>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e).into()),
        };

        let stored = serde_json::from_str(&json).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(stored))
    }

    /// Caller holds the exclusive lock.
    fn remove_file(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e).into()),
        }
    }
}

/// Holds an fs2 lock until dropped.
struct LockGuard(File);

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

impl TokenStore for FileTokenStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn get(&self) -> Result<Option<AuthToken>> {
        // Nothing stored yet; the parent directory may not exist either.
        if !self.path.exists() {
            return Ok(None);
        }

        let stored = {
            let _lock = self.lock(false)?;
            match self.read()? {
                Some(stored) => stored,
                None => return Ok(None),
            }
        };

        if stored.expires_at <= Utc::now() {
            debug!(expires_at = %stored.expires_at, "Stored token expired");
            let expired = AuthToken::new(stored.token);
            if let Err(e) = self.remove_if(&expired) {
                warn!(error = %e, "Failed to remove expired token file");
            }
            return Ok(None);
        }

        if stored.token.is_empty() {
            return Ok(None);
        }

        Ok(Some(AuthToken::new(stored.token)))
    }

    #[instrument(skip(self, token), fields(path = %self.path.display()))]
    fn set(&self, token: &AuthToken) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let _lock = self.lock(true)?;

        let stored = StoredToken {
            token: token.as_str().to_string(),
            expires_at: Utc::now() + self.ttl,
        };
        let json = serde_json::to_string_pretty(&stored).map_err(|e| StorageError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        {
            let mut perms = file.metadata().map_err(|e| self.io_error(e))?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(|e| self.io_error(e))?;
        }

        file.write_all(json.as_bytes())
            .map_err(|e| self.io_error(e))?;
        file.sync_data().map_err(|e| self.io_error(e))?;

        debug!(expires_at = %stored.expires_at, "Token stored");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let _lock = self.lock(true)?;
        self.remove_file()?;
        debug!("Token removed");
        Ok(())
    }

    #[instrument(skip(self, expected), fields(path = %self.path.display()))]
    fn remove_if(&self, expected: &AuthToken) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        let _lock = self.lock(true)?;
        // An unreadable record cannot be the expected token.
        let current = self.read().ok().flatten();
        if current.is_some_and(|stored| stored.token == expected.as_str()) {
            self.remove_file()?;
            debug!("Token removed");
            Ok(true)
        } else {
            debug!("Stored token changed; left in place");
            Ok(false)
        }
    }
}
