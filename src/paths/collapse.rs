// src/paths/collapse.rs

//! Ancestor checks and root collapsing.
//!
//! Everything here compares paths component-wise (`Path::starts_with`), so
//! `/ab` is never treated as being inside `/a`.

use std::path::{Path, PathBuf};

/// Return true if `path` lies inside `root`.
///
/// With `include_self`, `path == root` also counts. Otherwise `root` must be
/// a strict ancestor of `path`.
pub fn is_within(path: &Path, root: &Path, include_self: bool) -> bool {
    if path == root {
        return include_self;
    }
    path.starts_with(root)
}

/// Return true if `path` is an ancestor of (or, with `include_self`, equal to)
/// any of `roots`.
pub fn is_ancestor_of_any<'a, I>(path: &Path, roots: I, include_self: bool) -> bool
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    roots
        .into_iter()
        .any(|root| is_within(root, path, include_self))
}

/// Reduce `paths` to the topmost entries: no member of the result lies
/// inside another member.
///
/// The result is sorted and free of duplicates, so collapsing an already
/// collapsed list returns it unchanged.
pub fn collapse_roots<I>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut sorted: Vec<PathBuf> = paths.into_iter().collect();
    // Component order puts every ancestor before its descendants.
    sorted.sort();
    sorted.dedup();

    let mut collapsed: Vec<PathBuf> = Vec::with_capacity(sorted.len());
    for path in sorted {
        // Descendants of the last kept root sort contiguously right after it.
        let covered = collapsed
            .last()
            .is_some_and(|root| is_within(&path, root, true));
        if !covered {
            collapsed.push(path);
        }
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn within_respects_self_flag_and_components() {
        assert!(is_within(Path::new("/a/b"), Path::new("/a"), false));
        assert!(is_within(Path::new("/a"), Path::new("/a"), true));
        assert!(!is_within(Path::new("/a"), Path::new("/a"), false));
        assert!(!is_within(Path::new("/ab"), Path::new("/a"), true));
        assert!(!is_within(Path::new("/a"), Path::new("/a/b"), true));
    }

    #[test]
    fn ancestor_of_any_checks_direction() {
        let roots = vec![p("/x/y/z")];
        assert!(is_ancestor_of_any(Path::new("/x"), &roots, false));
        assert!(is_ancestor_of_any(Path::new("/x/y/z"), &roots, true));
        assert!(!is_ancestor_of_any(Path::new("/x/y/z"), &roots, false));
        assert!(!is_ancestor_of_any(Path::new("/x/y/z/w"), &roots, true));
    }

    #[test]
    fn collapse_keeps_topmost_roots() {
        let collapsed = collapse_roots(vec![
            p("/a/b/c"),
            p("/d"),
            p("/a"),
            p("/a/b"),
            p("/ab"),
            p("/d"),
        ]);
        assert_eq!(collapsed, vec![p("/a"), p("/ab"), p("/d")]);
    }

    #[test]
    fn collapse_sibling_prefix_is_not_swallowed() {
        // "/a.txt" sorts between "/a" and "/a/b" as a string but not as
        // components; both orders must keep "/a.txt".
        let collapsed = collapse_roots(vec![p("/a/b"), p("/a.txt"), p("/a")]);
        assert_eq!(collapsed, vec![p("/a"), p("/a.txt")]);
    }

    #[test]
    fn collapse_of_empty_is_empty() {
        assert!(collapse_roots(Vec::new()).is_empty());
    }
}
