//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// Hosts reachable over plain HTTP.
const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// A validated base URL of the library API.
///
/// The URL must be absolute and use HTTPS, except for loopback hosts where
/// plain HTTP is accepted for local development.
///
/// # Example
///
/// ```
/// use libris::ApiUrl;
///
/// let api = ApiUrl::new("http://localhost:8080/").unwrap();
/// assert_eq!(api.endpoint("/api/v1/books"), "http://localhost:8080/api/v1/books");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Parse and validate an API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::ApiUrl`] if the URL cannot be parsed, has
    /// no host, uses plain HTTP for a non-loopback host, or carries a query
    /// or fragment.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let reject = |reason: &str| -> Error {
            InvalidInputError::ApiUrl {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let url = Url::parse(s).map_err(|e| reject(&e.to_string()))?;
        let host = url.host_str().ok_or_else(|| reject("must have a host"))?;

        match url.scheme() {
            "https" => {}
            "http" if LOOPBACK_HOSTS.contains(&host) => {}
            _ => return Err(reject("must use HTTPS (HTTP allowed only for localhost)")),
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(reject("must not carry a query or fragment"));
        }

        Ok(Self(url))
    }

    /// Joins an absolute API path (such as `/api/v1/books`) onto the base.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}
