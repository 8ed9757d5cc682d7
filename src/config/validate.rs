// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile, RequestConfig};
use crate::errors::{Result, WatchpointsError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::WatchpointsError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.default, raw.request))
    }
}

/// Run every semantic check on a raw config.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_requests(cfg)?;
    for (name, request) in cfg.request.iter() {
        validate_request(name, request)?;
        validate_patterns(cfg, name, request)?;
    }
    Ok(())
}

fn ensure_has_requests(cfg: &RawConfigFile) -> Result<()> {
    if cfg.request.is_empty() {
        return Err(WatchpointsError::ConfigError(
            "config must contain at least one [request.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_request(name: &str, request: &RequestConfig) -> Result<()> {
    if request.files.is_empty() && request.tree.is_empty() {
        return Err(WatchpointsError::ConfigError(format!(
            "request '{}' must declare at least one file or tree",
            name
        )));
    }
    if request.files.iter().any(|f| f.trim().is_empty()) {
        return Err(WatchpointsError::ConfigError(format!(
            "request '{}' has an empty entry in `files`",
            name
        )));
    }
    if request.tree.iter().any(|t| t.dir.trim().is_empty()) {
        return Err(WatchpointsError::ConfigError(format!(
            "request '{}' has a tree with an empty `dir`",
            name
        )));
    }
    Ok(())
}

fn validate_patterns(cfg: &RawConfigFile, name: &str, request: &RequestConfig) -> Result<()> {
    for tree in request.tree.iter() {
        let patterns = tree
            .effective_include(&cfg.default)
            .into_iter()
            .chain(tree.effective_exclude(&cfg.default));
        for pat in patterns {
            Glob::new(&pat).map_err(|e| {
                WatchpointsError::Pattern(format!(
                    "request '{}', tree '{}': {pat}: {e}",
                    name, tree.dir
                ))
            })?;
        }
    }
    Ok(())
}
