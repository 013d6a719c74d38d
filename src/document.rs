//! Shared persisted JSON document.
//!
//! Both stores persist into one JSON file, each owning independent
//! top-level sections. [`ConfigDocument`] hides the read-merge-write
//! discipline so a save by one store never destroys another store's
//! section (including `ui_settings`, which belongs to an external
//! collaborator).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Top-level section holding the watched folder list.
pub const LIBRARY_FOLDERS_SECTION: &str = "library_folders";
/// Top-level section holding the cached track records.
pub const TRACKS_CACHE_SECTION: &str = "tracks_cache";
/// Top-level section holding the playlist records.
pub const PLAYLISTS_SECTION: &str = "playlists_data";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("document serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Handle to the shared JSON document on disk.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
}

impl ConfigDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read one top-level section. A missing file, an unparseable file or
    /// an absent key all yield `None`; corruption is logged, not raised.
    pub fn read_section(&self, key: &str) -> Option<Value> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read document");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(mut map)) => map.remove(key),
            Ok(_) => {
                warn!(path = %self.path.display(), "document root is not a JSON object");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "document is corrupted");
                None
            }
        }
    }

    /// Replace one top-level section, preserving every other section.
    ///
    /// The current document is re-read on every write; a corrupt or
    /// missing file degrades to an empty object so the write still lands.
    pub fn write_section(&self, key: &str, value: Value) -> Result<(), DocumentError> {
        let mut root = self.read_root();
        root.insert(key.to_string(), value);

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let serialized = serde_json::to_string_pretty(&Value::Object(root))?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }

    fn read_root(&self) -> Map<String, Value> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "failed to read document");
                }
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!(path = %self.path.display(), "document root is not a JSON object; resetting");
                Map::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "document is corrupted; resetting");
                Map::new()
            }
        }
    }
}
