//! Music library and playlist stores with shared JSON persistence.
//!
//! The crate is built around two stores that share one on-disk JSON
//! document: [`LibraryStore`] owns the watched folders and the track
//! cache, [`PlaylistStore`] owns named playlists. Both announce state
//! changes over an [`EventBus`] so a UI (or any other subscriber) can
//! react without the stores knowing about it.

pub mod config;
pub mod document;
pub mod events;
pub mod library;
pub mod playlist;

pub use config::Settings;
pub use document::ConfigDocument;
pub use events::{CancelToken, Event, EventBus, TrackSummary};
pub use library::{LibraryStore, Track};
pub use playlist::{Playlist, PlaylistId, PlaylistStore};
