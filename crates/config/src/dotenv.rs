//! `.env` discovery
//!
//! The relay shares its credentials file with the rest of the user's
//! tooling. `~/.env` wins; `$PAI_DIR/.env` is tried when the home file is
//! missing. Variables already present in the process environment are never
//! overwritten.

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Find the `.env` file to load, if any
pub fn discover_env_file(home: Option<&Path>, pai_dir: Option<&Path>) -> Option<PathBuf> {
    [home, pai_dir]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(".env"))
        .find(|candidate| candidate.is_file())
}

/// Load the discovered `.env` file into the process environment
///
/// Returns the path that was loaded, or `None` if no file was found.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    let home = dirs::home_dir();
    let pai_dir = std::env::var_os("PAI_DIR").map(PathBuf::from);

    let Some(path) = discover_env_file(home.as_deref(), pai_dir.as_deref()) else {
        return Ok(None);
    };

    dotenvy::from_path(&path)
        .map_err(|e| ConfigError::Environment(format!("{}: {}", path.display(), e)))?;

    Ok(Some(path))
}
