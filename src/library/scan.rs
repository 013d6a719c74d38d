use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::ItemKey;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{Track, UNKNOWN_ALBUM, UNKNOWN_ARTIST};

pub(super) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

pub(super) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Build the directory walker for one folder according to the settings.
pub(super) fn walker(dir: &Path, settings: &LibrarySettings) -> WalkDir {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }
    walker
}

/// Read one audio file's tags into a [`Track`].
///
/// Missing tag fields fall back to the filename stem and the
/// "Unknown Artist"/"Unknown Album" placeholders. A failed tag read is
/// logged and yields `None`; the file is skipped, never the whole scan.
pub(super) fn read_track(path: &Path) -> Option<Track> {
    let tagged = match Probe::open(path).and_then(|p| p.read()) {
        Ok(tagged) => tagged,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read audio tags; skipping file");
            return None;
        }
    };

    let duration_ms = tagged.properties().duration().as_millis() as u64;

    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown Title")
        .to_string();
    let mut artist = UNKNOWN_ARTIST.to_string();
    let mut album = UNKNOWN_ALBUM.to_string();

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
            if !v.trim().is_empty() {
                title = v.to_string();
            }
        }
        if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
            let v = v.trim();
            if !v.is_empty() {
                artist = v.to_string();
            }
        }
        if let Some(v) = tag.get_string(&ItemKey::AlbumTitle) {
            let v = v.trim();
            if !v.is_empty() {
                album = v.to_string();
            }
        }
    }

    Some(Track {
        file_path: path.to_path_buf(),
        title,
        artist,
        album,
        duration_ms,
    })
}
