//! Subcommand implementations.

pub mod authors;
pub mod books;
pub mod dashboard;
pub mod genres;
pub mod login;
pub mod logout;
pub mod navigate;
pub mod register;
pub mod whoami;

use anyhow::{Context as _, Result, bail};

/// View path of a resource section, as the route guard knows it.
pub(crate) fn section_route(section: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("/dashboard/{section}/{suffix}"),
        None => format!("/dashboard/{section}"),
    }
}

/// Unwrap a single-item fetch, reporting a 404 as a missing item.
pub(crate) fn fetched<T>(result: libris::Result<T>, kind: &str, id: i64) -> Result<T> {
    match result {
        Err(libris::Error::Protocol(err)) if err.is_not_found() => bail!("No {kind} with id {id}"),
        other => other.with_context(|| format!("Failed to get {kind} {id}")),
    }
}
