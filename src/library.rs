//! Library module: watched folders and the track cache.
//!
//! The [`LibraryStore`] in `library::store` owns the authoritative set of
//! watched folders and known tracks; `library::scan` holds the walkdir +
//! lofty scanning helpers.

mod display;
mod model;
mod scan;
mod store;

pub use model::Track;
pub use store::LibraryStore;
