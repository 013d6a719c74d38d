use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::LibrarySettings;
use crate::document::{ConfigDocument, LIBRARY_FOLDERS_SECTION, TRACKS_CACHE_SECTION};
use crate::events::{CancelToken, Event, EventBus, TrackSummary};

use super::display::summary_for;
use super::model::Track;
use super::scan::{is_audio_file, is_hidden, read_track, walker};

/// Owns the watched folders and the global track cache.
///
/// Scans are additive: a path already in the cache is never re-read, so
/// metadata for known tracks only changes via remove + rescan. Persistence
/// is explicit; mutating operations never write to disk on their own.
pub struct LibraryStore {
    settings: LibrarySettings,
    document: ConfigDocument,
    events: EventBus,
    folders: BTreeSet<PathBuf>,
    tracks: HashMap<PathBuf, Track>,
}

impl LibraryStore {
    /// Create an empty store. Call [`LibraryStore::load_from_disk`] to
    /// populate it from the shared document.
    pub fn new(settings: LibrarySettings, document: ConfigDocument, events: EventBus) -> Self {
        Self {
            settings,
            document,
            events,
            folders: BTreeSet::new(),
            tracks: HashMap::new(),
        }
    }

    /// Register a folder for scanning. Returns false (and changes
    /// nothing) when the path is not an existing directory or is already
    /// watched.
    pub fn add_folder(&mut self, path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }
        let added = self.folders.insert(path.to_path_buf());
        if added {
            info!(folder = %path.display(), "added library folder");
        }
        added
    }

    /// Unregister a folder and drop every cached track underneath it,
    /// then emit a full [`Event::LibraryUpdated`] snapshot so subscribers
    /// can rebuild their view. Returns false if the folder was not watched.
    pub fn remove_folder(&mut self, path: &Path) -> bool {
        if !self.folders.remove(path) {
            return false;
        }

        // Component-aware containment, so removing /music/rock leaves
        // /music/rock2 alone.
        self.tracks.retain(|fp, _| !fp.starts_with(path));
        info!(folder = %path.display(), "removed library folder and its tracks");

        self.events
            .emit(Event::LibraryUpdated(self.summaries_sorted()));
        true
    }

    pub fn get_library_folders(&self) -> Vec<PathBuf> {
        self.folders.iter().cloned().collect()
    }

    /// Walk one folder and cache every new audio file found.
    ///
    /// Per-file progress is emitted for every file visited. Paths already
    /// cached or listed in `exclude` are skipped, as are files whose tags
    /// cannot be read. Cancellation is honored between files. Returns the
    /// summaries of the newly cached tracks.
    pub fn scan_folder(
        &mut self,
        folder: &Path,
        exclude: &HashSet<PathBuf>,
        cancel: &CancelToken,
    ) -> Vec<TrackSummary> {
        let mut new_tracks: Vec<TrackSummary> = Vec::new();
        let mut files_scanned = 0usize;
        let include_hidden = self.settings.include_hidden;

        debug!(folder = %folder.display(), "scanning folder");
        for entry in walker(folder, &self.settings)
            .into_iter()
            .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            if cancel.is_cancelled() {
                info!(folder = %folder.display(), "scan cancelled");
                break;
            }

            let path = entry.path();
            if !path.is_file() || (!include_hidden && is_hidden(path)) {
                continue;
            }

            files_scanned += 1;
            self.events.emit(Event::ScanProgress {
                files_scanned,
                path: path.to_path_buf(),
            });

            if !is_audio_file(path, &self.settings) {
                continue;
            }
            if self.tracks.contains_key(path) || exclude.contains(path) {
                continue;
            }

            if let Some(track) = read_track(path) {
                let summary = summary_for(&track, &self.settings);
                self.tracks.insert(track.file_path.clone(), track);
                new_tracks.push(summary);
            }
        }

        debug!(
            folder = %folder.display(),
            new_tracks = new_tracks.len(),
            "finished scanning folder"
        );
        new_tracks
    }

    /// Scan every watched folder, dropping folders that no longer exist.
    ///
    /// Each physical file is processed at most once per pass even when
    /// watched folders nest or overlap, because every folder scan sees
    /// the tracks cached by the previous ones. One aggregate
    /// [`Event::LibraryUpdated`] is always emitted after all progress
    /// events, with an empty list when nothing new was found.
    pub fn scan_all_folders(&mut self, cancel: &CancelToken) -> Vec<TrackSummary> {
        let mut all_new: Vec<TrackSummary> = Vec::new();
        let exclude = HashSet::new();

        for folder in self.folders.clone() {
            if cancel.is_cancelled() {
                break;
            }
            if !folder.is_dir() {
                warn!(folder = %folder.display(), "library folder no longer exists; dropping it");
                self.folders.remove(&folder);
                continue;
            }
            all_new.extend(self.scan_folder(&folder, &exclude, cancel));
        }

        if all_new.is_empty() {
            debug!("no new tracks found during rescan");
        } else {
            info!(new_tracks = all_new.len(), "rescan added new tracks");
        }
        self.events.emit(Event::LibraryUpdated(all_new.clone()));
        all_new
    }

    pub fn get_track_by_path(&self, path: &Path) -> Option<&Track> {
        self.tracks.get(path)
    }

    /// All cached tracks ordered by artist, album, then title
    /// (case-insensitive), with the path as a final deterministic tiebreak.
    pub fn get_all_tracks_sorted(&self) -> Vec<&Track> {
        let mut tracks: Vec<&Track> = self.tracks.values().collect();
        tracks.sort_by_cached_key(|t| {
            (
                t.artist.to_lowercase(),
                t.album.to_lowercase(),
                t.title.to_lowercase(),
                t.file_path.clone(),
            )
        });
        tracks
    }

    /// Sorted display summaries of the whole cache.
    pub fn summaries_sorted(&self) -> Vec<TrackSummary> {
        self.get_all_tracks_sorted()
            .into_iter()
            .map(|t| summary_for(t, &self.settings))
            .collect()
    }

    /// Drop a single track from the cache. Watched folders are untouched.
    pub fn remove_track_by_path(&mut self, path: &Path) -> bool {
        self.tracks.remove(path).is_some()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    #[cfg(test)]
    pub(crate) fn insert_for_test(&mut self, track: Track) {
        self.tracks.insert(track.file_path.clone(), track);
    }

    /// Merge the folder list and the track cache into the shared
    /// document. Failures are logged, never raised.
    pub fn save_to_disk(&self) -> bool {
        let folders = match serde_json::to_value(self.get_library_folders()) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "could not serialize library folders");
                return false;
            }
        };
        let tracks = match serde_json::to_value(self.tracks.values().collect::<Vec<_>>()) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "could not serialize track cache");
                return false;
            }
        };

        if let Err(e) = self
            .document
            .write_section(LIBRARY_FOLDERS_SECTION, folders)
            .and_then(|_| self.document.write_section(TRACKS_CACHE_SECTION, tracks))
        {
            warn!(path = %self.document.path().display(), error = %e, "failed to save library");
            return false;
        }
        info!(path = %self.document.path().display(), "library saved");
        true
    }

    /// Load the folder list and track cache from the shared document.
    ///
    /// A missing or corrupt document yields an empty store. Cache entries
    /// whose file no longer exists are dropped. Exactly one
    /// [`Event::LibraryLoaded`] is emitted no matter what happened.
    pub fn load_from_disk(&mut self) {
        self.folders = match self.document.read_section(LIBRARY_FOLDERS_SECTION) {
            Some(v) => match serde_json::from_value::<Vec<PathBuf>>(v) {
                Ok(folders) => folders.into_iter().collect(),
                Err(e) => {
                    warn!(error = %e, "library_folders section is malformed; starting empty");
                    BTreeSet::new()
                }
            },
            None => BTreeSet::new(),
        };

        self.tracks = match self.document.read_section(TRACKS_CACHE_SECTION) {
            Some(Value::Array(entries)) => {
                let mut tracks = HashMap::with_capacity(entries.len());
                for entry in entries {
                    let track = match serde_json::from_value::<Track>(entry) {
                        Ok(track) => track,
                        Err(e) => {
                            warn!(error = %e, "skipping malformed track cache entry");
                            continue;
                        }
                    };
                    if !track.file_path.exists() {
                        debug!(path = %track.file_path.display(), "cached track no longer exists; dropping");
                        continue;
                    }
                    tracks.insert(track.file_path.clone(), track);
                }
                tracks
            }
            Some(_) => {
                warn!("tracks_cache section is not an array; starting empty");
                HashMap::new()
            }
            None => HashMap::new(),
        };

        info!(
            folders = self.folders.len(),
            tracks = self.tracks.len(),
            "library loaded"
        );
        self.events.emit(Event::LibraryLoaded);
    }
}
