// src/registry/update.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::paths::{is_ancestor_of_any, RequestedPathSet};

/// Result of one `register_additional_paths` call.
///
/// Carries the directories the caller must hand to the watch facility, and a
/// predicate for deciding, while walking the trees below them, which
/// subdirectories still need their own registration. The predicate is
/// evaluated against the registry as it stood right after this call.
#[derive(Debug, Clone, Default)]
pub struct IncrementalUpdate {
    new_roots: Vec<PathBuf>,
    local_unfiltered: RequestedPathSet,
    new_watch_points: Vec<PathBuf>,
    subsumed_watch_points: Vec<PathBuf>,
    all_requested_roots: BTreeSet<PathBuf>,
    current_watch_points: BTreeSet<PathBuf>,
}

impl IncrementalUpdate {
    pub(crate) fn new(
        new_roots: Vec<PathBuf>,
        local_unfiltered: RequestedPathSet,
        new_watch_points: Vec<PathBuf>,
        subsumed_watch_points: Vec<PathBuf>,
        all_requested_roots: BTreeSet<PathBuf>,
        current_watch_points: BTreeSet<PathBuf>,
    ) -> Self {
        Self {
            new_roots,
            local_unfiltered,
            new_watch_points,
            subsumed_watch_points,
            all_requested_roots,
            current_watch_points,
        }
    }

    /// Directories that must now be registered with the watch facility.
    pub fn new_watch_points(&self) -> &[PathBuf] {
        &self.new_watch_points
    }

    /// Watch points this call dropped from the registry's bookkeeping because
    /// a new, broader watch point now covers them. Always empty under the
    /// append policy.
    pub fn subsumed_watch_points(&self) -> &[PathBuf] {
        &self.subsumed_watch_points
    }

    /// The (collapsed) roots requested by this call.
    pub fn new_roots(&self) -> &[PathBuf] {
        &self.new_roots
    }

    pub fn is_empty(&self) -> bool {
        self.new_watch_points.is_empty()
    }

    /// Whether `directory`, found while walking below this update's watch
    /// points, needs its own registration.
    ///
    /// A directory qualifies when it lies under this call's roots, is an
    /// ancestor-or-self of one of them, or is a strict ancestor of any root
    /// ever requested; and it must not be a strict ancestor of a current
    /// watch point.
    pub fn should_watch_directory(&self, directory: &Path) -> bool {
        let requested = self.local_unfiltered.contains(directory)
            || is_ancestor_of_any(directory, &self.new_roots, true)
            || is_ancestor_of_any(directory, &self.all_requested_roots, false);
        let result =
            requested && !is_ancestor_of_any(directory, &self.current_watch_points, false);

        if !result {
            debug!(
                ?directory,
                current_watch_points = ?self.current_watch_points,
                all_requested_roots = ?self.all_requested_roots,
                new_roots = ?self.new_roots,
                "not watching directory"
            );
        }
        result
    }
}
