use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use watchpoints::session::WatchFacility;

/// A fake watch facility that:
/// - records every directory it was asked to watch, in order
/// - optionally fails for one chosen directory until told to stop.
///
/// Clones share the same state, so a test can keep a handle after moving the
/// facility into a `WatchSession`.
#[derive(Debug, Clone, Default)]
pub struct RecordingFacility {
    watched: Arc<Mutex<Vec<PathBuf>>>,
    fail_on: Arc<Mutex<Option<PathBuf>>>,
}

impl RecordingFacility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `watch_directory` fail for `path`.
    pub fn failing_on(path: impl Into<PathBuf>) -> Self {
        Self {
            watched: Arc::default(),
            fail_on: Arc::new(Mutex::new(Some(path.into()))),
        }
    }

    /// Accept every directory from now on.
    pub fn stop_failing(&self) {
        *self.fail_on.lock().unwrap() = None;
    }

    /// Snapshot of the directories watched so far.
    pub fn watched(&self) -> Vec<PathBuf> {
        self.watched.lock().unwrap().clone()
    }
}

impl WatchFacility for RecordingFacility {
    fn watch_directory(&mut self, directory: &Path) -> anyhow::Result<()> {
        if self.fail_on.lock().unwrap().as_deref() == Some(directory) {
            anyhow::bail!("refusing to watch {}", directory.display());
        }
        self.watched.lock().unwrap().push(directory.to_path_buf());
        Ok(())
    }
}
