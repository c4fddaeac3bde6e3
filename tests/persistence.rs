//! Snapshot persistence integration tests.
//!
//! Verifies that the on-disk snapshot and the in-memory collection stay
//! equal after every kind of mutation, that legacy bare-array snapshots
//! load with a recomputed counter, and that corrupt snapshots degrade to
//! an empty store instead of aborting startup.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use stockroom::models::{Item, ItemDraft, ItemPatch, Snapshot};
use stockroom::store::SNAPSHOT_FILE;
use stockroom::InventoryStore;
use tempfile::TempDir;

fn draft(name: &str) -> ItemDraft {
    ItemDraft {
        name: name.to_string(),
        ..ItemDraft::default()
    }
}

/// Reads the snapshot file back and compares it with the live store.
fn assert_disk_matches(store: &InventoryStore) {
    let raw = std::fs::read_to_string(store.snapshot_path()).unwrap();
    let snapshot: Snapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot.items, store.list());
}

#[test]
fn disk_tracks_memory_after_every_mutation() {
    let dir = TempDir::new().unwrap();
    let store = InventoryStore::open(dir.path()).unwrap();

    store.create(draft("Drill")).unwrap();
    assert_disk_matches(&store);

    store.create(draft("Saw")).unwrap();
    assert_disk_matches(&store);

    store
        .update(
            0,
            ItemPatch {
                name: Some("Impact driver".to_string()),
                description: Some("18V".to_string()),
            },
        )
        .unwrap();
    assert_disk_matches(&store);

    store.set_photo(1, Some("abc.jpg".to_string())).unwrap();
    assert_disk_matches(&store);

    store.delete(0).unwrap();
    assert_disk_matches(&store);
}

#[test]
fn reload_replays_to_equal_collection() {
    let dir = TempDir::new().unwrap();
    let before;
    {
        let store = InventoryStore::open(dir.path()).unwrap();
        store.create(draft("Drill")).unwrap();
        store.create(draft("Saw")).unwrap();
        store.set_photo(0, Some("abc.jpg".to_string())).unwrap();
        before = store.list();
    }

    let reopened = InventoryStore::open(dir.path()).unwrap();
    assert_eq!(reopened.list(), before);
}

#[test]
fn legacy_bare_array_loads_and_recomputes_counter() {
    let dir = TempDir::new().unwrap();
    let legacy = vec![
        Item {
            id: 2,
            name: "Drill".to_string(),
            description: "cordless".to_string(),
            photo: None,
        },
        Item {
            id: 5,
            name: "Saw".to_string(),
            description: String::new(),
            photo: Some("abc.jpg".to_string()),
        },
    ];
    std::fs::write(
        dir.path().join(SNAPSHOT_FILE),
        serde_json::to_string(&legacy).unwrap(),
    )
    .unwrap();

    let store = InventoryStore::open(dir.path()).unwrap();
    assert_eq!(store.list(), legacy);

    // max(existing) + 1
    let created = store.create(draft("Hammer")).unwrap();
    assert_eq!(created.id, 6);

    // The next persist upgrades the file to the current format.
    let raw = std::fs::read_to_string(dir.path().join(SNAPSHOT_FILE)).unwrap();
    let snapshot: Snapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot.next_id, 7);
}

#[test]
fn corrupt_snapshot_degrades_to_empty_store() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(SNAPSHOT_FILE), "{\"items\": [oops").unwrap();

    let store = InventoryStore::open(dir.path()).unwrap();
    assert!(store.list().is_empty());

    let item = store.create(draft("Drill")).unwrap();
    assert_eq!(item.id, 0);
}

#[test]
fn empty_store_persists_and_reloads() {
    let dir = TempDir::new().unwrap();
    {
        let store = InventoryStore::open(dir.path()).unwrap();
        store.create(draft("Drill")).unwrap();
        store.delete(0).unwrap();
    }

    let store = InventoryStore::open(dir.path()).unwrap();
    assert!(store.list().is_empty());
    // The counter survives even with no items left.
    assert_eq!(store.create(draft("Saw")).unwrap().id, 1);
}
