use crate::config::{LibrarySettings, TrackDisplayField};
use crate::events::TrackSummary;

use super::model::Track;

/// Build the subscriber-facing summary for a track according to the
/// configured display fields and separator.
pub fn summary_for(track: &Track, settings: &LibrarySettings) -> TrackSummary {
    TrackSummary {
        display: display_text(track, &settings.display_fields, &settings.display_separator),
        file_path: track.file_path.clone(),
        duration_ms: track.duration_ms,
    }
}

/// Compose metadata fields (title, artist, album, filename, path) in the
/// configured order, falling back to the title when no parts were produced.
fn display_text(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Title => {
                if !track.title.trim().is_empty() {
                    parts.push(track.title.trim().to_string());
                }
            }
            TrackDisplayField::Artist => {
                if !track.artist.trim().is_empty() {
                    parts.push(track.artist.trim().to_string());
                }
            }
            TrackDisplayField::Album => {
                if !track.album.trim().is_empty() {
                    parts.push(track.album.trim().to_string());
                }
            }
            TrackDisplayField::Filename => {
                if let Some(stem) = track.file_path.file_stem().and_then(|s| s.to_str()) {
                    if !stem.trim().is_empty() {
                        parts.push(stem.to_string());
                    }
                }
            }
            TrackDisplayField::Path => {
                parts.push(track.file_path.display().to_string());
            }
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
