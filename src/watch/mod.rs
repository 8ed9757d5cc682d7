// src/watch/mod.rs

//! Live file watching on top of a [`WatchSession`](crate::session::WatchSession).
//!
//! This module is the only place that talks to `notify`: it registers the
//! directories the session selects (non-recursively), feeds created
//! directories back into the session, and reports changed paths that match a
//! request.

pub mod watcher;

pub use watcher::{handle_event, run_watch, NotifyFacility};
