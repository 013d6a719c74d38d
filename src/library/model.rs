use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Placeholder used when a file carries no artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Placeholder used when a file carries no album tag.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Metadata record for one audio file, keyed by its path.
///
/// Tracks are immutable once produced by a scan; rescanning a known path
/// is a no-op, so edited tags only show up after remove + rescan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub file_path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(default)]
    pub duration_ms: u64,
}
