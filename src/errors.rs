// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchpointsError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(String),

    /// A requested root could not be resolved to an existing directory
    /// because the filesystem refused to answer.
    #[error("Cannot resolve watch root {path:?}: {reason}")]
    RootNormalization { path: PathBuf, reason: String },

    #[error("Cannot watch directory {path:?}: {reason}")]
    Facility { path: PathBuf, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchpointsError>;
