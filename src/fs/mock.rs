// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File,
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Paths whose inspection fails, as if permission were denied.
    denied: HashSet<PathBuf>,
}

/// In-memory filesystem for tests. Absolute paths only; `/` always exists.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        state.entries.insert(PathBuf::from("/"), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock filesystem lock poisoned")
    }

    /// Add a directory (and all of its missing ancestors).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        ensure_dir_entry(&mut state.entries, path.as_ref());
    }

    /// Add a plain file; parent directories are created implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        state.entries.insert(path.clone(), MockEntry::File);

        if let Some(parent) = path.parent() {
            ensure_dir_entry(&mut state.entries, parent);
            link_child(&mut state.entries, parent, &path);
        }
    }

    /// Make every inspection of `path` fail.
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.lock().denied.insert(path.as_ref().to_path_buf());
    }
}

fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    if let Some(parent) = path.parent() {
        ensure_dir_entry(entries, parent);
        link_child(entries, parent, path);
    }
}

fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
    if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
        if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn is_dir(&self, path: &Path) -> Result<bool> {
        let state = self.lock();
        if state.denied.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        Ok(matches!(state.entries.get(path), Some(MockEntry::Dir(_))))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.lock();
        if state.denied.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        match state.entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
