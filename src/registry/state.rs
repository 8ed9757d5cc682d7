// src/registry/state.rs

//! Registry state and the merge step that folds one request into it.
//!
//! `merge_request` is pure: it never touches the filesystem and never
//! mutates its input. The registry feeds it the already-normalized watch
//! point candidates and swaps in the state it returns.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::paths::{collapse_roots, is_ancestor_of_any, RequestedPathSet};
use crate::registry::update::IncrementalUpdate;
use crate::types::MergePolicy;

/// Everything a registry accumulates over a watch session.
#[derive(Debug, Clone, Default)]
pub struct RegistryState {
    /// Union of every request ever registered, filters included.
    combined: RequestedPathSet,
    /// `combined.unfiltered()`, refreshed after each merge.
    combined_unfiltered: RequestedPathSet,
    /// Every root ever requested. Never collapsed.
    all_requested_roots: BTreeSet<PathBuf>,
    /// Directories believed to be registered with the watch facility.
    current_watch_points: BTreeSet<PathBuf>,
}

impl RegistryState {
    pub fn combined(&self) -> &RequestedPathSet {
        &self.combined
    }

    pub fn all_requested_roots(&self) -> &BTreeSet<PathBuf> {
        &self.all_requested_roots
    }

    pub fn current_watch_points(&self) -> &BTreeSet<PathBuf> {
        &self.current_watch_points
    }

    /// Whether a change at `path` matches anything ever requested, filters
    /// included.
    pub fn should_fire_event(&self, path: &Path) -> bool {
        self.combined.contains(path)
    }

    /// Whether a directory found outside any particular update (e.g. freshly
    /// created) needs its own registration.
    pub fn should_watch_directory(&self, directory: &Path) -> bool {
        // combined_unfiltered only holds plain roots: the collapsed combined roots.
        let combined_roots = self.combined_unfiltered.files();
        let requested = self.combined_unfiltered.contains(directory)
            || is_ancestor_of_any(directory, combined_roots, true)
            || is_ancestor_of_any(directory, &self.all_requested_roots, true);
        requested && !is_ancestor_of_any(directory, &self.current_watch_points, true)
    }
}

/// Fold `request` into `prior`.
///
/// `normalized` holds, for each root of the request, the nearest directory
/// that exists on disk. Returns the new state and the update describing what
/// the caller has to register.
pub fn merge_request(
    prior: &RegistryState,
    request: &RequestedPathSet,
    normalized: Vec<PathBuf>,
    policy: MergePolicy,
) -> (RegistryState, IncrementalUpdate) {
    let new_roots = request.roots();
    if new_roots.is_empty() {
        let update = IncrementalUpdate::new(
            Vec::new(),
            RequestedPathSet::default(),
            Vec::new(),
            Vec::new(),
            prior.all_requested_roots.clone(),
            prior.current_watch_points.clone(),
        );
        return (prior.clone(), update);
    }

    let mut all_requested_roots = prior.all_requested_roots.clone();
    all_requested_roots.extend(new_roots.iter().cloned());

    let local_unfiltered = request.unfiltered();
    let candidates: Vec<PathBuf> = collapse_roots(normalized)
        .into_iter()
        .filter(|dir| {
            local_unfiltered.contains(dir) || is_ancestor_of_any(dir, &new_roots, true)
        })
        .collect();

    let (combined, current_watch_points, new_watch_points, subsumed_watch_points) =
        if prior.current_watch_points.is_empty() {
            // Nothing registered yet: no union needed.
            let current: BTreeSet<PathBuf> = candidates.iter().cloned().collect();
            (request.clone(), current, candidates, Vec::new())
        } else {
            let combined = RequestedPathSet::builder()
                .add(&prior.combined)
                .add(request)
                .build();
            match policy {
                MergePolicy::Append => {
                    let fresh = not_in(candidates, &prior.current_watch_points);
                    let mut current = prior.current_watch_points.clone();
                    current.extend(fresh.iter().cloned());
                    (combined, current, fresh, Vec::new())
                }
                MergePolicy::Collapse => {
                    let merged = collapse_roots(
                        prior
                            .current_watch_points
                            .iter()
                            .cloned()
                            .chain(candidates),
                    );
                    let merged_set: BTreeSet<PathBuf> = merged.iter().cloned().collect();
                    let subsumed: Vec<PathBuf> = prior
                        .current_watch_points
                        .iter()
                        .filter(|point| !merged_set.contains(*point))
                        .cloned()
                        .collect();
                    let fresh = not_in(merged, &prior.current_watch_points);
                    (combined, merged_set, fresh, subsumed)
                }
            }
        };

    let combined_unfiltered = combined.unfiltered();
    let state = RegistryState {
        combined,
        combined_unfiltered,
        all_requested_roots,
        current_watch_points,
    };
    let update = IncrementalUpdate::new(
        new_roots,
        local_unfiltered,
        new_watch_points,
        subsumed_watch_points,
        state.all_requested_roots.clone(),
        state.current_watch_points.clone(),
    );
    (state, update)
}

/// Keep the paths not already present (exact match only).
fn not_in(paths: Vec<PathBuf>, existing: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|path| !existing.contains(path))
        .collect()
}
