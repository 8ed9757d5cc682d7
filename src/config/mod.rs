// src/config/mod.rs

//! Configuration loading and validation for watchpoints.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate requests and their glob patterns (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{config_root_dir, default_config_path, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, ConfigSection, DefaultSection, RawConfigFile, RequestConfig, TreeConfig,
};
pub use validate::validate_config;
