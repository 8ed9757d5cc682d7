// src/watch/watcher.rs

use std::path::Path;

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::paths::RequestedPathSet;
use crate::registry::WatchPointRegistry;
use crate::session::{WatchFacility, WatchSession};
use crate::types::MergePolicy;

/// `notify` watcher driven one directory at a time.
///
/// Dropping this stops file watching.
pub struct NotifyFacility {
    inner: RecommendedWatcher,
}

impl std::fmt::Debug for NotifyFacility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyFacility").finish()
    }
}

impl NotifyFacility {
    /// Create a watcher that forwards every event into `event_tx`.
    pub fn new(event_tx: mpsc::UnboundedSender<Event>) -> Result<Self> {
        // Closure called synchronously by notify whenever an event arrives.
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        // No subscriber may be installed on this thread; use stderr.
                        eprintln!("watchpoints: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("watchpoints: file watch error: {err}");
                }
            },
            Config::default(),
        )?;
        Ok(Self { inner })
    }
}

impl WatchFacility for NotifyFacility {
    fn watch_directory(&mut self, directory: &Path) -> Result<()> {
        self.inner.watch(directory, RecursiveMode::NonRecursive)?;
        Ok(())
    }
}

/// Register every request, then print each changed path that matches one of
/// them until Ctrl-C.
pub async fn run_watch(
    policy: MergePolicy,
    requests: Vec<(String, RequestedPathSet)>,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let facility = NotifyFacility::new(event_tx)?;
    let mut session = WatchSession::new(WatchPointRegistry::with_policy(policy), facility);

    for (name, path_set) in requests.iter() {
        let added = session.watch(path_set)?;
        info!(request = %name, directories = added.len(), "watching request");
    }
    info!(
        ?policy,
        directories = session.registered_directories().len(),
        "file watcher started"
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    warn!("failed to listen for Ctrl+C: {e}");
                }
                info!("shutdown requested");
                break;
            }
            maybe_event = event_rx.recv() => {
                let Some(event) = maybe_event else {
                    info!("notify event channel closed; exiting");
                    break;
                };
                for path in handle_event(&mut session, event) {
                    println!("{}", path.display());
                }
            }
        }
    }

    debug!("watcher event loop finished");
    Ok(())
}

/// Feed one notify event into the session; returns the paths to report.
pub fn handle_event<W: WatchFacility>(
    session: &mut WatchSession<W>,
    event: Event,
) -> Vec<std::path::PathBuf> {
    debug!(?event, "received notify event");
    let created = matches!(event.kind, EventKind::Create(_));

    let mut fired = Vec::new();
    for path in event.paths {
        if created {
            match session.directory_created(&path) {
                Ok(added) if !added.is_empty() => {
                    debug!(?added, "registered newly created directories");
                }
                Ok(_) => {}
                Err(err) => warn!("failed to watch created directory {:?}: {err}", path),
            }
        }
        if session.should_fire_event(&path) {
            fired.push(path);
        }
    }
    fired
}
