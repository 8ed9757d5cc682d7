// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
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

/// Load a configuration file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that every request declares something to watch and that every
///   glob compiles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// `Watchpoints.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Watchpoints.toml")
}

/// Directory that relative paths in the config are resolved against.
///
/// - "configs/Watchpoints.toml" → absolute form of "configs".
/// - A bare "Watchpoints.toml" (parent = "") → the current working directory.
pub fn config_root_dir(config_path: &Path) -> Result<PathBuf> {
    let parent = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(std::path::absolute(parent)?)
}
