// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::model::{RawConfigFile, SupervisorConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it into a
/// [`SupervisorConfig`].
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SupervisorConfig> {
    let raw_config = load_from_path(&path)?;
    SupervisorConfig::try_from(raw_config)
}

/// Resolve the configuration the binary should run with.
///
/// - An explicitly given path must exist and be valid.
/// - Without a path, [`default_config_path`] is used if present; otherwise
///   the built-in defaults apply.
pub fn load_or_default(explicit: Option<&Path>) -> Result<SupervisorConfig> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        return load_and_validate(&default_path);
    }

    info!(
        path = %default_path.display(),
        "no config file found; using built-in defaults"
    );
    SupervisorConfig::try_from(RawConfigFile::default())
}

/// Default config file name, looked up in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Keepalive.toml")
}
