use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use crate::document::ConfigDocument;
use crate::events::{Event, EventBus};

use super::model::{Playlist, PlaylistId};
use super::store::PlaylistStore;

fn store_at(dir: &Path) -> (PlaylistStore, EventBus) {
    let bus = EventBus::new();
    let doc = ConfigDocument::new(dir.join("library.json"));
    (PlaylistStore::new(doc, bus.clone()), bus)
}

#[test]
fn generated_ids_are_opaque_and_distinct() {
    let a = PlaylistId::generate();
    let b = PlaylistId::generate();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 32);
}

#[test]
fn playlist_add_track_is_idempotent() {
    let mut pl = Playlist::new("Mix");
    let p = Path::new("/m/a.mp3");

    assert!(pl.add_track(p));
    assert!(!pl.add_track(p));
    assert_eq!(pl.track_paths, vec![PathBuf::from("/m/a.mp3")]);
}

#[test]
fn playlist_remove_track_reports_presence() {
    let mut pl = Playlist::new("Mix");
    pl.add_track(Path::new("/m/a.mp3"));

    assert!(pl.remove_track(Path::new("/m/a.mp3")));
    assert!(!pl.remove_track(Path::new("/m/a.mp3")));
    assert!(pl.track_paths.is_empty());
}

#[test]
fn playlist_reorder_accepts_callers_list() {
    let mut pl = Playlist::new("Mix");
    pl.add_track(Path::new("/m/a.mp3"));
    pl.add_track(Path::new("/m/b.mp3"));

    pl.reorder(vec![PathBuf::from("/m/b.mp3"), PathBuf::from("/m/a.mp3")]);
    assert_eq!(
        pl.track_paths,
        vec![PathBuf::from("/m/b.mp3"), PathBuf::from("/m/a.mp3")]
    );

    // Loose by design: a mismatched list is warned about but accepted.
    pl.reorder(vec![PathBuf::from("/m/c.mp3")]);
    assert_eq!(pl.track_paths, vec![PathBuf::from("/m/c.mp3")]);
}

#[test]
fn create_playlist_rejects_blank_names() {
    let dir = tempdir().unwrap();
    let (mut store, _bus) = store_at(dir.path());

    assert!(store.create_playlist("").is_none());
    assert!(store.create_playlist("   ").is_none());
    assert_eq!(store.playlist_count(), 0);
}

#[test]
fn create_playlist_rejects_exact_duplicate_names() {
    let dir = tempdir().unwrap();
    let (mut store, _bus) = store_at(dir.path());

    assert!(store.create_playlist("Favorites").is_some());
    assert!(store.create_playlist("Favorites").is_none());
    assert_eq!(store.playlist_count(), 1);

    // Case-sensitive exact match: a different casing is a new playlist.
    assert!(store.create_playlist("favorites").is_some());
    assert_eq!(store.playlist_count(), 2);
}

#[test]
fn create_and_delete_emit_global_changes() {
    let dir = tempdir().unwrap();
    let (mut store, bus) = store_at(dir.path());
    let rx = bus.subscribe();

    let id = store.create_playlist("Mix").unwrap();
    assert!(matches!(rx.try_recv(), Ok(Event::PlaylistsChanged)));

    assert!(store.delete_playlist(&id));
    assert!(matches!(rx.try_recv(), Ok(Event::PlaylistsChanged)));

    assert!(store.get_playlist_by_id(&id).is_none());
    assert!(store.get_all_playlists().is_empty());
    assert!(!store.delete_playlist(&id));
}

#[test]
fn rename_checks_blankness_and_uniqueness() {
    let dir = tempdir().unwrap();
    let (mut store, _bus) = store_at(dir.path());

    let a = store.create_playlist("A").unwrap();
    let _b = store.create_playlist("B").unwrap();

    assert!(!store.rename_playlist(&a, "  "));
    assert!(!store.rename_playlist(&a, "B"));
    // Renaming to its own current name is allowed.
    assert!(store.rename_playlist(&a, "A"));
    assert!(store.rename_playlist(&a, "C"));
    assert_eq!(store.get_playlist_by_id(&a).unwrap().name, "C");
    assert!(!store.rename_playlist(&PlaylistId::from("missing"), "D"));
}

#[test]
fn get_all_playlists_sorts_by_name_case_insensitive() {
    let dir = tempdir().unwrap();
    let (mut store, _bus) = store_at(dir.path());

    store.create_playlist("banana").unwrap();
    store.create_playlist("Apple").unwrap();
    store.create_playlist("cherry").unwrap();

    let names: Vec<&str> = store
        .get_all_playlists()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["Apple", "banana", "cherry"]);
}

#[test]
fn track_mutations_emit_scoped_events() {
    let dir = tempdir().unwrap();
    let (mut store, bus) = store_at(dir.path());
    let id = store.create_playlist("Mix").unwrap();
    let rx = bus.subscribe();

    assert!(store.add_track_to_playlist(&id, Path::new("/m/a.mp3")));
    match rx.try_recv() {
        Ok(Event::PlaylistTracksChanged(changed)) => assert_eq!(changed, id),
        other => panic!("unexpected event: {other:?}"),
    }

    // A duplicate add changes nothing and stays silent.
    assert!(!store.add_track_to_playlist(&id, Path::new("/m/a.mp3")));
    assert!(rx.try_recv().is_err());
    assert_eq!(store.get_playlist_by_id(&id).unwrap().track_paths.len(), 1);

    assert!(store.remove_track_from_playlist(&id, Path::new("/m/a.mp3")));
    assert!(matches!(rx.try_recv(), Ok(Event::PlaylistTracksChanged(_))));

    assert!(!store.remove_track_from_playlist(&id, Path::new("/m/a.mp3")));
    assert!(!store.add_track_to_playlist(&PlaylistId::from("missing"), Path::new("/m/a.mp3")));
}

#[test]
fn reorder_applies_permutation_exactly() {
    let dir = tempdir().unwrap();
    let (mut store, bus) = store_at(dir.path());
    let id = store.create_playlist("Mix").unwrap();
    for p in ["/m/a.mp3", "/m/b.mp3", "/m/c.mp3"] {
        store.add_track_to_playlist(&id, Path::new(p));
    }

    let rx = bus.subscribe();
    let new_order = vec![
        PathBuf::from("/m/c.mp3"),
        PathBuf::from("/m/a.mp3"),
        PathBuf::from("/m/b.mp3"),
    ];
    assert!(store.reorder_tracks_in_playlist(&id, new_order.clone()));
    assert_eq!(store.get_playlist_by_id(&id).unwrap().track_paths, new_order);
    assert!(matches!(rx.try_recv(), Ok(Event::PlaylistTracksChanged(_))));

    assert!(!store.reorder_tracks_in_playlist(&PlaylistId::from("missing"), Vec::new()));
}

#[test]
fn save_then_load_round_trips_playlists() {
    let dir = tempdir().unwrap();
    let (mut store, _bus) = store_at(dir.path());

    let id = store.create_playlist("Road Trip").unwrap();
    store.add_track_to_playlist(&id, Path::new("/m/a.mp3"));
    store.add_track_to_playlist(&id, Path::new("/m/b.mp3"));
    store.create_playlist("Quiet").unwrap();
    assert!(store.save_to_disk());

    let (mut fresh, bus) = store_at(dir.path());
    let rx = bus.subscribe();
    fresh.load_from_disk();

    assert_eq!(fresh.playlist_count(), 2);
    let loaded = fresh.get_playlist_by_id(&id).unwrap();
    assert_eq!(loaded.name, "Road Trip");
    assert_eq!(
        loaded.track_paths,
        vec![PathBuf::from("/m/a.mp3"), PathBuf::from("/m/b.mp3")]
    );
    assert_eq!(
        rx.try_iter()
            .filter(|e| matches!(e, Event::PlaylistsLoaded))
            .count(),
        1
    );
}

#[test]
fn load_skips_records_missing_id_or_name() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("library.json"),
        r#"{
            "playlists_data": [
                {"id": "ok", "name": "Kept", "track_paths": ["/m/a.mp3"]},
                {"name": "No Id"},
                {"id": "no-name"},
                {"id": "blank", "name": "   "},
                "junk"
            ]
        }"#,
    )
    .unwrap();

    let (mut store, _bus) = store_at(dir.path());
    store.load_from_disk();

    assert_eq!(store.playlist_count(), 1);
    let kept = store.get_playlist_by_id(&PlaylistId::from("ok")).unwrap();
    assert_eq!(kept.name, "Kept");
}

#[test]
fn load_skips_records_with_blank_ids() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("library.json"),
        r#"{
            "playlists_data": [
                {"id": "", "name": "First", "track_paths": []},
                {"id": "", "name": "Second", "track_paths": []},
                {"id": "   ", "name": "Third", "track_paths": []},
                {"id": "ok", "name": "Kept", "track_paths": []}
            ]
        }"#,
    )
    .unwrap();

    let (mut store, _bus) = store_at(dir.path());
    store.load_from_disk();

    // Blank ids must not be admitted at all, or distinct records would
    // silently overwrite each other under the same empty key.
    assert_eq!(store.playlist_count(), 1);
    assert!(store.get_playlist_by_id(&PlaylistId::from("")).is_none());
    assert!(store.get_playlist_by_id(&PlaylistId::from("ok")).is_some());
}

#[test]
fn load_from_corrupt_document_yields_empty_store() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("library.json"), "][ nope").unwrap();

    let (mut store, bus) = store_at(dir.path());
    let rx = bus.subscribe();
    store.load_from_disk();

    assert_eq!(store.playlist_count(), 0);
    assert_eq!(
        rx.try_iter()
            .filter(|e| matches!(e, Event::PlaylistsLoaded))
            .count(),
        1
    );
}

#[test]
fn saving_preserves_the_library_sections() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("library.json"),
        r#"{"library_folders": ["/music"], "tracks_cache": [], "ui_settings": {"volume": 3}}"#,
    )
    .unwrap();

    let (mut store, _bus) = store_at(dir.path());
    store.create_playlist("Mix").unwrap();
    assert!(store.save_to_disk());

    let doc = ConfigDocument::new(dir.path().join("library.json"));
    assert_eq!(
        doc.read_section("library_folders"),
        Some(serde_json::json!(["/music"]))
    );
    assert_eq!(
        doc.read_section("ui_settings"),
        Some(serde_json::json!({"volume": 3}))
    );
}

#[test]
fn dangling_track_references_are_tolerated() {
    let dir = tempdir().unwrap();
    let (mut store, _bus) = store_at(dir.path());
    let id = store.create_playlist("Mix").unwrap();

    // Paths are never validated against the library or the filesystem.
    assert!(store.add_track_to_playlist(&id, Path::new("/definitely/not/there.mp3")));
    assert!(store.save_to_disk());

    let (mut fresh, _bus) = store_at(dir.path());
    fresh.load_from_disk();
    assert_eq!(
        fresh.get_playlist_by_id(&id).unwrap().track_paths,
        vec![PathBuf::from("/definitely/not/there.mp3")]
    );
}
