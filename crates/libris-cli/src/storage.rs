//! Location of the persisted token.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// Overrides the data directory; used by tests for isolation.
const DATA_DIR_ENV: &str = "LIBRIS_DATA_DIR";

/// Get the token file path, creating its directory.
pub fn token_path() -> Result<PathBuf> {
    let data_dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => ProjectDirs::from("", "", "libris")
            .context("Could not determine data directory")?
            .data_dir()
            .to_path_buf(),
    };

    fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("token.json"))
}
