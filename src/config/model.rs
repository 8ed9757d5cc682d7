// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::Result;
use crate::paths::{FilteredTree, RequestedPathSet};
use crate::types::MergePolicy;

/// Top-level configuration exactly as read from TOML.
///
/// ```toml
/// [config]
/// merge_policy = "collapse"
///
/// [default]
/// exclude = ["**/target/**"]
///
/// [request.sources]
/// files = ["Cargo.toml"]
///
/// [[request.sources.tree]]
/// dir = "src"
/// include = ["**/*.rs"]
/// ```
///
/// All sections are optional at the TOML level; [`ConfigFile`] is the
/// validated form.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub default: DefaultSection,

    /// All requests from `[request.<name>]`, registered in name order.
    #[serde(default)]
    pub request: BTreeMap<String, RequestConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigSection {
    /// `"collapse"` (default) or `"append"`.
    #[serde(default)]
    pub merge_policy: MergePolicy,
}

/// `[default]` section: filters for trees that do not declare their own.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DefaultSection {
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[request.<name>]` section: one watch request.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RequestConfig {
    /// Plain roots: files or directories, existing or not.
    #[serde(default)]
    pub files: Vec<String>,

    /// Filtered directory trees (`[[request.<name>.tree]]`).
    #[serde(default)]
    pub tree: Vec<TreeConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TreeConfig {
    pub dir: String,

    /// If `None`, the tree uses `default.include`.
    #[serde(default)]
    pub include: Option<Vec<String>>,

    /// If `None`, the tree uses `default.exclude`.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,

    /// If true, `default.include` is appended to `include`.
    #[serde(default)]
    pub append_default_include: bool,

    /// If true, `default.exclude` is appended to `exclude`.
    #[serde(default)]
    pub append_default_exclude: bool,
}

impl TreeConfig {
    pub fn effective_include(&self, defaults: &DefaultSection) -> Vec<String> {
        effective_patterns(
            self.include.as_ref(),
            &defaults.include,
            self.append_default_include,
        )
    }

    pub fn effective_exclude(&self, defaults: &DefaultSection) -> Vec<String> {
        effective_patterns(
            self.exclude.as_ref(),
            &defaults.exclude,
            self.append_default_exclude,
        )
    }
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    default: DefaultSection,
    request: BTreeMap<String, RequestConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        default: DefaultSection,
        request: BTreeMap<String, RequestConfig>,
    ) -> Self {
        Self {
            config,
            default,
            request,
        }
    }

    pub fn default_section(&self) -> &DefaultSection {
        &self.default
    }

    pub fn requests(&self) -> &BTreeMap<String, RequestConfig> {
        &self.request
    }

    /// Turn every request into a [`RequestedPathSet`], resolving relative
    /// paths against `base_dir`.
    pub fn path_sets(&self, base_dir: &Path) -> Result<Vec<(String, RequestedPathSet)>> {
        let mut sets = Vec::with_capacity(self.request.len());

        for (name, request) in self.request.iter() {
            let mut builder = RequestedPathSet::builder();
            for file in &request.files {
                builder = builder.add_root(resolve(base_dir, file));
            }
            for tree in &request.tree {
                let filtered = FilteredTree::new(
                    resolve(base_dir, &tree.dir),
                    tree.effective_include(&self.default),
                    tree.effective_exclude(&self.default),
                )?;
                builder = builder.add_tree(filtered);
            }
            sets.push((name.clone(), builder.build()));
        }

        Ok(sets)
    }
}

/// Decide the effective patterns for one dimension (include or exclude).
///
/// - tree list + append: `tree + default`
/// - tree list only: `tree`
/// - no tree list: `default`
fn effective_patterns(
    tree_list: Option<&Vec<String>>,
    default_list: &[String],
    append_default: bool,
) -> Vec<String> {
    match (tree_list, append_default) {
        (Some(list), true) => {
            let mut combined = list.clone();
            combined.extend(default_list.iter().cloned());
            combined
        }
        (Some(list), false) => list.clone(),
        (None, _) => default_list.to_vec(),
    }
}

fn resolve(base_dir: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
