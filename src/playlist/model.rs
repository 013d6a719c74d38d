use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Opaque playlist identifier, stable for the playlist's lifetime.
///
/// Generated ids are random 128-bit values rendered as hex; uniqueness is
/// by construction, not by checking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaylistId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Named, ordered list of track paths. The order is the playback order.
///
/// Referenced paths are not validated against the library; dangling
/// references surface as "missing track" at the consuming layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    #[serde(default)]
    pub track_paths: Vec<PathBuf>,
}

impl Playlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            track_paths: Vec::new(),
        }
    }

    /// Append a track unless it is already in the list.
    pub fn add_track(&mut self, path: &Path) -> bool {
        if self.track_paths.iter().any(|p| p == path) {
            return false;
        }
        self.track_paths.push(path.to_path_buf());
        true
    }

    /// Remove a track if present; returns whether it was found.
    pub fn remove_track(&mut self, path: &Path) -> bool {
        let before = self.track_paths.len();
        self.track_paths.retain(|p| p != path);
        self.track_paths.len() != before
    }

    /// Replace the track order wholesale; the caller's list is
    /// authoritative. A count mismatch is logged as a sanity warning but
    /// the new order is accepted regardless.
    pub fn reorder(&mut self, new_order: Vec<PathBuf>) {
        if new_order.len() != self.track_paths.len() {
            warn!(
                playlist = %self.name,
                current = self.track_paths.len(),
                new = new_order.len(),
                "track count mismatch during reorder; accepting new order"
            );
        }
        self.track_paths = new_order;
    }
}
