#![allow(dead_code)]

use std::collections::BTreeMap;

use watchpoints::config::{
    ConfigFile, ConfigSection, DefaultSection, RawConfigFile, RequestConfig, TreeConfig,
};
use watchpoints::types::MergePolicy;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                default: DefaultSection::default(),
                request: BTreeMap::new(),
            },
        }
    }

    pub fn with_request(mut self, name: &str, request: RequestConfig) -> Self {
        self.config.request.insert(name.to_string(), request);
        self
    }

    pub fn with_default_include(mut self, pattern: &str) -> Self {
        self.config.default.include.push(pattern.to_string());
        self
    }

    pub fn with_default_exclude(mut self, pattern: &str) -> Self {
        self.config.default.exclude.push(pattern.to_string());
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.config.config.merge_policy = policy;
        self
    }

    /// The unvalidated config, for tests that exercise validation itself.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RequestConfig`.
#[derive(Default)]
pub struct RequestConfigBuilder {
    request: RequestConfig,
}

impl RequestConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: &str) -> Self {
        self.request.files.push(path.to_string());
        self
    }

    pub fn tree(mut self, tree: TreeConfig) -> Self {
        self.request.tree.push(tree);
        self
    }

    pub fn build(self) -> RequestConfig {
        self.request
    }
}

/// Builder for `TreeConfig`.
pub struct TreeConfigBuilder {
    tree: TreeConfig,
}

impl TreeConfigBuilder {
    pub fn new(dir: &str) -> Self {
        Self {
            tree: TreeConfig {
                dir: dir.to_string(),
                include: None,
                exclude: None,
                append_default_include: false,
                append_default_exclude: false,
            },
        }
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.tree
            .include
            .get_or_insert_with(Vec::new)
            .push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.tree
            .exclude
            .get_or_insert_with(Vec::new)
            .push(pattern.to_string());
        self
    }

    pub fn append_default_include(mut self, val: bool) -> Self {
        self.tree.append_default_include = val;
        self
    }

    pub fn append_default_exclude(mut self, val: bool) -> Self {
        self.tree.append_default_exclude = val;
        self
    }

    pub fn build(self) -> TreeConfig {
        self.tree
    }
}
