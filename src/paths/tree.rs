// src/paths/tree.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{Result, WatchpointsError};

/// A directory tree narrowed down by include/exclude glob patterns.
///
/// Patterns are matched against the path relative to `root`, with forward
/// slashes (e.g. `"src/main.rs"` for `<root>/src/main.rs`). The root itself
/// always belongs to the tree.
#[derive(Clone)]
pub struct FilteredTree {
    root: PathBuf,
    includes: Vec<String>,
    excludes: Vec<String>,
    include_set: Option<GlobSet>,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for FilteredTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredTree")
            .field("root", &self.root)
            .field("includes", &self.includes)
            .field("excludes", &self.excludes)
            .finish_non_exhaustive()
    }
}

impl FilteredTree {
    /// Compile a tree filter. No includes means "everything under `root`".
    pub fn new(
        root: impl Into<PathBuf>,
        includes: Vec<String>,
        excludes: Vec<String>,
    ) -> Result<Self> {
        let include_set = build_globset(&includes)?;
        let exclude_set = build_globset(&excludes)?;
        Ok(Self {
            root: root.into(),
            includes,
            excludes,
            include_set,
            exclude_set,
        })
    }

    /// A tree without filters.
    pub fn unfiltered(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
            include_set: None,
            exclude_set: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The same filters anchored at another root.
    pub fn with_root(&self, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..self.clone()
        }
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn contains(&self, path: &Path) -> bool {
        if path == self.root {
            return true;
        }
        let Ok(rel) = path.strip_prefix(&self.root) else {
            return false;
        };
        let rel_str = rel.to_string_lossy().replace('\\', "/");

        if let Some(include) = &self.include_set {
            if !include.is_match(&rel_str) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(&rel_str) {
                return false;
            }
        }
        true
    }
}

/// Build a GlobSet from simple string patterns; `None` for an empty list.
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .map_err(|e| WatchpointsError::Pattern(format!("{pat}: {e}")))?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|e| WatchpointsError::Pattern(e.to_string()))?;
    Ok(Some(set))
}
