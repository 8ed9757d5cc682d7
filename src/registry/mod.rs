// src/registry/mod.rs

//! Watch-point registry.
//!
//! Keeps, across a whole watch session, the minimal set of directories that
//! have to be registered with a non-recursive watch facility so that every
//! requested path is covered. Each `register_additional_paths` call returns an
//! [`IncrementalUpdate`] telling the caller what to register next.
//!
//! The registry performs no synchronization of its own: updates take
//! `&mut self`, queries take `&self`. Share it behind a mutex if several
//! threads need it.

pub mod state;
pub mod update;

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, WatchpointsError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::paths::RequestedPathSet;
use crate::types::MergePolicy;

pub use state::{merge_request, RegistryState};
pub use update::IncrementalUpdate;

pub struct WatchPointRegistry {
    policy: MergePolicy,
    fs: Arc<dyn FileSystem>,
    state: RegistryState,
}

impl fmt::Debug for WatchPointRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchPointRegistry")
            .field("policy", &self.policy)
            .field("current_watch_points", self.state.current_watch_points())
            .finish_non_exhaustive()
    }
}

impl WatchPointRegistry {
    /// Registry over the real filesystem.
    ///
    /// `allow_new_points_under_existing_roots` selects the append policy;
    /// otherwise watch points are kept collapsed.
    pub fn new(allow_new_points_under_existing_roots: bool) -> Self {
        Self::with_policy(MergePolicy::from_allow_nested(
            allow_new_points_under_existing_roots,
        ))
    }

    pub fn with_policy(policy: MergePolicy) -> Self {
        Self::with_file_system(policy, Arc::new(RealFileSystem))
    }

    pub fn with_file_system(policy: MergePolicy, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            policy,
            fs,
            state: RegistryState::default(),
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    pub fn file_system(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }

    pub fn current_watch_points(&self) -> &BTreeSet<PathBuf> {
        self.state.current_watch_points()
    }

    pub fn all_requested_roots(&self) -> &BTreeSet<PathBuf> {
        self.state.all_requested_roots()
    }

    pub fn combined_path_set(&self) -> &RequestedPathSet {
        self.state.combined()
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Put back a state taken from [`state`](Self::state), undoing every
    /// registration made since.
    pub fn restore_state(&mut self, state: RegistryState) {
        self.state = state;
    }

    /// Fold another request into the session.
    ///
    /// Fails only when the filesystem cannot tell whether a root's ancestor
    /// exists; the registry is left unchanged in that case.
    pub fn register_additional_paths(
        &mut self,
        path_set: &RequestedPathSet,
    ) -> Result<IncrementalUpdate> {
        let path_set = path_set.to_absolute()?;
        let normalized = path_set
            .roots()
            .iter()
            .map(|root| self.nearest_existing_directory(root))
            .collect::<Result<Vec<_>>>()?;

        let (state, update) = merge_request(&self.state, &path_set, normalized, self.policy);
        self.state = state;

        debug!(
            policy = ?self.policy,
            new_watch_points = ?update.new_watch_points(),
            subsumed = ?update.subsumed_watch_points(),
            "registered additional paths"
        );
        Ok(update)
    }

    /// Whether a change at `path` is something a caller asked for.
    pub fn should_fire_event(&self, path: &Path) -> bool {
        self.state.should_fire_event(path)
    }

    /// Whether `directory`, discovered outside of an update (e.g. created
    /// after its parent was registered), needs its own registration.
    pub fn should_watch_directory(&self, directory: &Path) -> bool {
        self.state.should_watch_directory(directory)
    }

    /// Walk up from the absolute `root` to the first directory that exists.
    /// The filesystem root is accepted without asking the filesystem.
    fn nearest_existing_directory(&self, root: &Path) -> Result<PathBuf> {
        let mut target = root;
        loop {
            let Some(parent) = target.parent() else {
                return Ok(target.to_path_buf());
            };
            let is_dir =
                self.fs
                    .is_dir(target)
                    .map_err(|e| WatchpointsError::RootNormalization {
                        path: root.to_path_buf(),
                        reason: format!("{e:#}"),
                    })?;
            if is_dir {
                return Ok(target.to_path_buf());
            }
            target = parent;
        }
    }
}
