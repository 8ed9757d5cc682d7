// src/paths/set.rs

use std::path::{Path, PathBuf};

use crate::errors::{Result, WatchpointsError};
use crate::paths::collapse::{collapse_roots, is_within};
use crate::paths::tree::FilteredTree;

/// One watch request: plain roots plus filtered directory trees.
///
/// A plain root covers itself and everything below it. A tree covers its
/// root and the descendants its filters admit.
#[derive(Debug, Clone, Default)]
pub struct RequestedPathSet {
    files: Vec<PathBuf>,
    trees: Vec<FilteredTree>,
}

impl RequestedPathSet {
    pub fn builder() -> RequestedPathSetBuilder {
        RequestedPathSetBuilder::default()
    }

    /// A set made only of plain roots.
    pub fn from_roots<I>(roots: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            files: roots.into_iter().collect(),
            trees: Vec::new(),
        }
    }

    /// Every root of this set, tree roots included, collapsed so that no
    /// entry lies inside another.
    pub fn roots(&self) -> Vec<PathBuf> {
        collapse_roots(
            self.files
                .iter()
                .cloned()
                .chain(self.trees.iter().map(|t| t.root().to_path_buf())),
        )
    }

    /// The same roots with every tree filter dropped.
    pub fn unfiltered(&self) -> RequestedPathSet {
        RequestedPathSet::from_roots(self.roots())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|root| is_within(path, root, true))
            || self.trees.iter().any(|tree| tree.contains(path))
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.trees.is_empty()
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn trees(&self) -> &[FilteredTree] {
        &self.trees
    }

    /// The same set with every relative root resolved against the current
    /// working directory. Filters are kept as they are.
    pub fn to_absolute(&self) -> Result<RequestedPathSet> {
        let files = self
            .files
            .iter()
            .map(|file| absolute_root(file))
            .collect::<Result<Vec<_>>>()?;
        let trees = self
            .trees
            .iter()
            .map(|tree| Ok(tree.with_root(absolute_root(tree.root())?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { files, trees })
    }
}

fn absolute_root(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::path::absolute(path).map_err(|e| WatchpointsError::RootNormalization {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Union builder for [`RequestedPathSet`].
#[derive(Debug, Clone, Default)]
pub struct RequestedPathSetBuilder {
    files: Vec<PathBuf>,
    trees: Vec<FilteredTree>,
}

impl RequestedPathSetBuilder {
    pub fn add_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn add_tree(mut self, tree: FilteredTree) -> Self {
        self.trees.push(tree);
        self
    }

    /// Union another set into this one.
    pub fn add(mut self, other: &RequestedPathSet) -> Self {
        self.files.extend(other.files.iter().cloned());
        self.trees.extend(other.trees.iter().cloned());
        self
    }

    pub fn build(self) -> RequestedPathSet {
        RequestedPathSet {
            files: self.files,
            trees: self.trees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    fn rust_sources(root: &str) -> FilteredTree {
        FilteredTree::new(root, vec!["**/*.rs".to_string()], Vec::new()).unwrap()
    }

    #[test]
    fn roots_merge_files_and_tree_roots() {
        let set = RequestedPathSet::builder()
            .add_root("/p/Cargo.toml")
            .add_root("/p/src/lib.rs")
            .add_tree(rust_sources("/p/src"))
            .build();

        assert_eq!(set.roots(), vec![p("/p/Cargo.toml"), p("/p/src")]);
    }

    #[test]
    fn contains_honours_tree_filters_but_unfiltered_does_not() {
        let set = RequestedPathSet::builder()
            .add_tree(rust_sources("/p/src"))
            .build();

        assert!(set.contains(Path::new("/p/src/main.rs")));
        assert!(!set.contains(Path::new("/p/src/README.md")));

        let unfiltered = set.unfiltered();
        assert!(unfiltered.contains(Path::new("/p/src/README.md")));
        assert!(unfiltered.trees().is_empty());
    }

    #[test]
    fn plain_roots_cover_descendants() {
        let set = RequestedPathSet::from_roots(vec![p("/a")]);
        assert!(set.contains(Path::new("/a")));
        assert!(set.contains(Path::new("/a/b/c")));
        assert!(!set.contains(Path::new("/ab")));
    }

    #[test]
    fn builder_unions_sets() {
        let left = RequestedPathSet::from_roots(vec![p("/a")]);
        let right = RequestedPathSet::builder()
            .add_tree(rust_sources("/b"))
            .build();

        let union = RequestedPathSet::builder().add(&left).add(&right).build();
        assert_eq!(union.roots(), vec![p("/a"), p("/b")]);
        assert!(union.contains(Path::new("/b/x.rs")));
        assert!(!union.contains(Path::new("/b/x.txt")));
    }

    #[test]
    fn to_absolute_resolves_relative_roots_only() {
        let cwd = std::env::current_dir().unwrap();
        let set = RequestedPathSet::builder()
            .add_root("/etc/hosts")
            .add_root("Cargo.toml")
            .add_tree(rust_sources("src"))
            .build();

        let absolute = set.to_absolute().unwrap();
        assert_eq!(absolute.files(), &[p("/etc/hosts"), cwd.join("Cargo.toml")]);
        assert_eq!(absolute.trees()[0].root(), cwd.join("src"));
        assert!(absolute.contains(&cwd.join("src/lib.rs")));
        assert!(!absolute.contains(&cwd.join("src/notes.md")));
    }

    #[test]
    fn empty_set_has_no_roots() {
        let set = RequestedPathSet::default();
        assert!(set.is_empty());
        assert!(set.roots().is_empty());
        assert!(!set.contains(Path::new("/")));
    }
}
