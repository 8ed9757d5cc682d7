// src/session.rs

//! Watch session: turns registry decisions into facility registrations.
//!
//! For every request the session asks the registry for an update, registers
//! each new watch point and walks the directories below it, registering the
//! ones the update says still need their own watch. Directories created later
//! go through the registry-scoped check instead.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result as AnyResult;
use tracing::{debug, info, warn};

use crate::errors::{Result, WatchpointsError};
use crate::fs::FileSystem;
use crate::paths::RequestedPathSet;
use crate::registry::{IncrementalUpdate, WatchPointRegistry};

/// A non-recursive directory watch facility (e.g. inotify via `notify`).
pub trait WatchFacility {
    /// Start watching the direct children of `directory`.
    fn watch_directory(&mut self, directory: &Path) -> AnyResult<()>;
}

/// Facility that only records what it was asked to watch. Backs `--dry-run`.
#[derive(Debug, Default)]
pub struct DryRunFacility {
    directories: Vec<PathBuf>,
}

impl DryRunFacility {
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }
}

impl WatchFacility for DryRunFacility {
    fn watch_directory(&mut self, directory: &Path) -> AnyResult<()> {
        self.directories.push(directory.to_path_buf());
        Ok(())
    }
}

/// Outcome of [`WatchSession::register`].
#[derive(Debug)]
pub struct Registration {
    pub update: IncrementalUpdate,
    /// Directories newly handed to the facility, in walk order.
    pub directories: Vec<PathBuf>,
}

pub struct WatchSession<W: WatchFacility> {
    registry: WatchPointRegistry,
    facility: W,
    fs: Arc<dyn FileSystem>,
    registered: BTreeSet<PathBuf>,
}

impl<W: WatchFacility> fmt::Debug for WatchSession<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSession")
            .field("registry", &self.registry)
            .field("registered", &self.registered.len())
            .finish_non_exhaustive()
    }
}

impl<W: WatchFacility> WatchSession<W> {
    pub fn new(registry: WatchPointRegistry, facility: W) -> Self {
        let fs = registry.file_system();
        Self {
            registry,
            facility,
            fs,
            registered: BTreeSet::new(),
        }
    }

    pub fn registry(&self) -> &WatchPointRegistry {
        &self.registry
    }

    pub fn facility(&self) -> &W {
        &self.facility
    }

    /// Every directory handed to the facility so far.
    pub fn registered_directories(&self) -> &BTreeSet<PathBuf> {
        &self.registered
    }

    /// Register a request and every directory it needs watched.
    ///
    /// Returns the directories newly handed to the facility by this call.
    pub fn watch(&mut self, path_set: &RequestedPathSet) -> Result<Vec<PathBuf>> {
        Ok(self.register(path_set)?.directories)
    }

    /// Like [`watch`](Self::watch), but also hands back the registry update.
    ///
    /// If the walk fails, the registry is rolled back so the same request can
    /// be retried. Directories the facility accepted before the failure stay
    /// registered.
    pub fn register(&mut self, path_set: &RequestedPathSet) -> Result<Registration> {
        let prior = self.registry.state().clone();
        let update = self.registry.register_additional_paths(path_set)?;
        if !update.subsumed_watch_points().is_empty() {
            // Their facility registrations stay in place; overlap is harmless.
            debug!(
                subsumed = ?update.subsumed_watch_points(),
                "watch points subsumed by a broader one"
            );
        }

        let mut directories = Vec::new();
        for start in update.new_watch_points() {
            if let Err(err) =
                self.walk(start, &mut directories, |dir| update.should_watch_directory(dir))
            {
                self.registry.restore_state(prior);
                return Err(err);
            }
        }

        info!(
            watch_points = update.new_watch_points().len(),
            directories = directories.len(),
            "registered watch request"
        );
        Ok(Registration {
            update,
            directories,
        })
    }

    /// React to a directory that appeared after the session started.
    pub fn directory_created(&mut self, directory: &Path) -> Result<Vec<PathBuf>> {
        let mut added = Vec::new();
        if !self.registry.should_watch_directory(directory) {
            return Ok(added);
        }
        let registry = &self.registry;
        let fs = Arc::clone(&self.fs);
        let facility = &mut self.facility;
        let registered = &mut self.registered;
        walk_tree(
            fs.as_ref(),
            facility,
            registered,
            directory,
            &mut added,
            |dir| registry.should_watch_directory(dir),
        )?;
        Ok(added)
    }

    /// Whether a change at `path` should be forwarded to the caller.
    pub fn should_fire_event(&self, path: &Path) -> bool {
        self.registry.should_fire_event(path)
    }

    fn walk<F>(&mut self, start: &Path, added: &mut Vec<PathBuf>, should_watch: F) -> Result<()>
    where
        F: Fn(&Path) -> bool,
    {
        walk_tree(
            self.fs.as_ref(),
            &mut self.facility,
            &mut self.registered,
            start,
            added,
            should_watch,
        )
    }
}

/// Depth-first walk from `start`. The start directory is always registered;
/// below it, a directory is registered and descended into only when
/// `should_watch` accepts it, otherwise its whole subtree is skipped.
fn walk_tree<W, F>(
    fs: &dyn FileSystem,
    facility: &mut W,
    registered: &mut BTreeSet<PathBuf>,
    start: &Path,
    added: &mut Vec<PathBuf>,
    should_watch: F,
) -> Result<()>
where
    W: WatchFacility,
    F: Fn(&Path) -> bool,
{
    let mut stack = vec![start.to_path_buf()];

    while let Some(dir) = stack.pop() {
        if dir != start && !should_watch(&dir) {
            continue;
        }
        if !fs.is_dir(&dir)? {
            // Vanished since it was listed.
            continue;
        }

        if !registered.contains(&dir) {
            facility
                .watch_directory(&dir)
                .map_err(|e| WatchpointsError::Facility {
                    path: dir.clone(),
                    reason: format!("{e:#}"),
                })?;
            registered.insert(dir.clone());
            added.push(dir.clone());
        }

        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if !fs.is_dir(&dir).unwrap_or(true) => {
                debug!(?dir, "directory vanished before listing: {err:#}");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let mut children = Vec::new();
        for child in entries {
            match fs.is_dir(&child) {
                Ok(true) => children.push(child),
                Ok(false) => {}
                Err(err) => warn!(?child, "skipping entry that cannot be inspected: {err:#}"),
            }
        }
        // Pushed in reverse so the stack pops children in name order.
        children.sort();
        stack.extend(children.into_iter().rev());
    }
    Ok(())
}
