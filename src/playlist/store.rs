use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::document::{ConfigDocument, PLAYLISTS_SECTION};
use crate::events::{Event, EventBus};

use super::model::{Playlist, PlaylistId};

/// Owns the collection of playlists and guards name uniqueness.
///
/// List membership and renames emit the global
/// [`Event::PlaylistsChanged`]; track-content changes emit the scoped
/// [`Event::PlaylistTracksChanged`]. Persistence is explicit, as with the
/// library store.
pub struct PlaylistStore {
    document: ConfigDocument,
    events: EventBus,
    playlists: HashMap<PlaylistId, Playlist>,
}

impl PlaylistStore {
    /// Create an empty store. Call [`PlaylistStore::load_from_disk`] to
    /// populate it from the shared document.
    pub fn new(document: ConfigDocument, events: EventBus) -> Self {
        Self {
            document,
            events,
            playlists: HashMap::new(),
        }
    }

    /// Create a playlist with a fresh id. Returns `None` when the name is
    /// blank or already taken (exact, case-sensitive match).
    pub fn create_playlist(&mut self, name: &str) -> Option<PlaylistId> {
        if name.trim().is_empty() {
            debug!("rejected playlist with blank name");
            return None;
        }
        if self.playlists.values().any(|p| p.name == name) {
            debug!(name, "rejected duplicate playlist name");
            return None;
        }

        let playlist = Playlist::new(name);
        let id = playlist.id.clone();
        self.playlists.insert(id.clone(), playlist);
        info!(name, %id, "created playlist");
        self.events.emit(Event::PlaylistsChanged);
        Some(id)
    }

    /// Delete a playlist; no-op returning false when the id is unknown.
    pub fn delete_playlist(&mut self, id: &PlaylistId) -> bool {
        if self.playlists.remove(id).is_none() {
            return false;
        }
        info!(%id, "deleted playlist");
        self.events.emit(Event::PlaylistsChanged);
        true
    }

    /// Rename a playlist, with the same blank/duplicate checks as
    /// creation (the playlist itself is excluded from the check).
    pub fn rename_playlist(&mut self, id: &PlaylistId, new_name: &str) -> bool {
        if new_name.trim().is_empty() {
            return false;
        }
        if self
            .playlists
            .values()
            .any(|p| p.id != *id && p.name == new_name)
        {
            debug!(name = new_name, "rejected duplicate playlist name on rename");
            return false;
        }
        let Some(playlist) = self.playlists.get_mut(id) else {
            return false;
        };
        playlist.name = new_name.to_string();
        info!(%id, name = new_name, "renamed playlist");
        self.events.emit(Event::PlaylistsChanged);
        true
    }

    pub fn get_playlist_by_id(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.get(id)
    }

    /// All playlists sorted by name, case-insensitive.
    pub fn get_all_playlists(&self) -> Vec<&Playlist> {
        let mut playlists: Vec<&Playlist> = self.playlists.values().collect();
        playlists.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        playlists
    }

    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }

    /// Append a track to a playlist; false when the id is unknown or the
    /// track is already in it.
    pub fn add_track_to_playlist(&mut self, id: &PlaylistId, path: &Path) -> bool {
        let Some(playlist) = self.playlists.get_mut(id) else {
            debug!(%id, "unknown playlist for add_track");
            return false;
        };
        if !playlist.add_track(path) {
            return false;
        }
        self.events.emit(Event::PlaylistTracksChanged(id.clone()));
        true
    }

    /// Remove a track from a playlist; false when the id is unknown or
    /// the track was not in it.
    pub fn remove_track_from_playlist(&mut self, id: &PlaylistId, path: &Path) -> bool {
        let Some(playlist) = self.playlists.get_mut(id) else {
            debug!(%id, "unknown playlist for remove_track");
            return false;
        };
        if !playlist.remove_track(path) {
            return false;
        }
        self.events.emit(Event::PlaylistTracksChanged(id.clone()));
        true
    }

    /// Replace a playlist's track order; fails only on an unknown id.
    pub fn reorder_tracks_in_playlist(&mut self, id: &PlaylistId, new_order: Vec<PathBuf>) -> bool {
        let Some(playlist) = self.playlists.get_mut(id) else {
            debug!(%id, "unknown playlist for reorder");
            return false;
        };
        playlist.reorder(new_order);
        self.events.emit(Event::PlaylistTracksChanged(id.clone()));
        true
    }

    /// Merge the playlist section into the shared document. Failures are
    /// logged, never raised.
    pub fn save_to_disk(&self) -> bool {
        let playlists = match serde_json::to_value(self.get_all_playlists()) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "could not serialize playlists");
                return false;
            }
        };

        if let Err(e) = self.document.write_section(PLAYLISTS_SECTION, playlists) {
            warn!(path = %self.document.path().display(), error = %e, "failed to save playlists");
            return false;
        }
        info!(path = %self.document.path().display(), "playlists saved");
        true
    }

    /// Load playlists from the shared document. Records missing an id or
    /// a name are skipped with a warning; a missing or corrupt section
    /// yields an empty store. Exactly one [`Event::PlaylistsLoaded`] is
    /// emitted no matter what happened.
    pub fn load_from_disk(&mut self) {
        self.playlists = match self.document.read_section(PLAYLISTS_SECTION) {
            Some(Value::Array(entries)) => {
                let mut playlists = HashMap::with_capacity(entries.len());
                for entry in entries {
                    match serde_json::from_value::<Playlist>(entry) {
                        Ok(playlist)
                            if !playlist.id.as_str().trim().is_empty()
                                && !playlist.name.trim().is_empty() =>
                        {
                            playlists.insert(playlist.id.clone(), playlist);
                        }
                        Ok(playlist) => {
                            warn!(
                                %playlist.id,
                                name = %playlist.name,
                                "skipping persisted playlist with blank id or name"
                            );
                        }
                        Err(e) => {
                            warn!(error = %e, "skipping malformed playlist record");
                        }
                    }
                }
                playlists
            }
            Some(_) => {
                warn!("playlists_data section is not an array; starting empty");
                HashMap::new()
            }
            None => HashMap::new(),
        };

        info!(playlists = self.playlists.len(), "playlists loaded");
        self.events.emit(Event::PlaylistsLoaded);
    }
}
