//! Playlist module: named, ordered, deduplicated track lists.
//!
//! The [`Playlist`] entity lives in `playlist::model`; the
//! [`PlaylistStore`] in `playlist::store` owns the collection and
//! enforces name uniqueness.

mod model;
mod store;

pub use model::{Playlist, PlaylistId};
pub use store::PlaylistStore;

#[cfg(test)]
mod tests;
