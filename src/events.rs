//! Store change notifications.
//!
//! The stores announce state changes over an [`EventBus`] without
//! knowing who listens: subscribers each get their own `mpsc` receiver
//! and the bus fans every event out to all of them, dropping subscribers
//! whose receiving end has gone away.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::playlist::PlaylistId;

/// Flat per-track payload handed to subscribers, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSummary {
    pub display: String,
    pub file_path: PathBuf,
    pub duration_ms: u64,
}

/// Events emitted by the library and playlist stores.
#[derive(Debug, Clone)]
pub enum Event {
    /// Library finished loading from disk (possibly into an empty state).
    LibraryLoaded,
    /// The track set changed. Carries new tracks after a scan pass (may
    /// be empty) or the full remaining list after a folder removal.
    LibraryUpdated(Vec<TrackSummary>),
    /// Progress during a folder walk; `files_scanned` counts every file
    /// visited, audio or not.
    ScanProgress {
        files_scanned: usize,
        path: PathBuf,
    },
    /// Playlists finished loading from disk.
    PlaylistsLoaded,
    /// The set of playlists (or a playlist's name) changed.
    PlaylistsChanged,
    /// The tracks of one specific playlist changed.
    PlaylistTracksChanged(PlaylistId),
}

/// Fan-out notification channel shared by the stores.
///
/// Cloning the bus is cheap; all clones feed the same subscriber set.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Sender<Event>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and return its receiving end.
    pub fn subscribe(&self) -> Receiver<Event> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    /// Deliver `event` to every live subscriber, pruning dead ones.
    pub fn emit(&self, event: Event) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

/// Cooperative cancellation flag for long-running scans, checked between
/// files. Clones share the flag.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
