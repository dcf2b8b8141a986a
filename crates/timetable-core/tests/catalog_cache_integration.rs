//! On-disk catalog cache and snapshot tests.

use chrono::Utc;
use tempfile::TempDir;
use timetable_core::{
    ingest, CatalogDb, CatalogSource, Offering, Session, SessionSnapshot, SnapshotStore, TimeSlot,
    Weekday,
};

fn catalog() -> Vec<Offering> {
    vec![
        Offering::new(
            "PHY1-A",
            "PHY1",
            "Physics I",
            "Dr. Sen",
            4,
            vec![TimeSlot::new(Weekday::Monday, "9-10"), TimeSlot::new(Weekday::Thursday, "1-3")],
        ),
        Offering::new(
            "MTH1-A",
            "MTH1",
            "Calculus",
            "Prof. Das",
            3,
            vec![TimeSlot::new(Weekday::Tuesday, "10-12")],
        ),
    ]
}

#[test]
fn test_catalog_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timetable.db");

    {
        let mut db = CatalogDb::open_at(&path).unwrap();
        db.replace_all(&catalog(), Utc::now()).unwrap();
    }

    let db = CatalogDb::open_at(&path).unwrap();
    assert_eq!(db.list_all().unwrap(), catalog());
    assert_eq!(db.search("SEN").unwrap().len(), 1);
    assert!(db.fetched_at().unwrap().is_some());
}

#[test]
fn test_catalog_and_snapshot_share_a_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timetable.db");

    let mut db = CatalogDb::open_at(&path).unwrap();
    let report = ingest(catalog());
    db.replace_all(&report.accepted, Utc::now()).unwrap();

    let mut session = Session::new(db.list_all().unwrap());
    assert!(session.add("MTH1-A").is_added());

    let store = SnapshotStore::open_at(&path).unwrap();
    store.save(&session.snapshot()).unwrap();
    drop(store);

    let store = SnapshotStore::open_at(&path).unwrap();
    let restored = Session::from_snapshot(store.load().unwrap());
    assert_eq!(restored.selection().len(), 1);
    assert_eq!(restored.catalog().len(), 2);
    assert_eq!(db.count().unwrap(), 2);
}

#[test]
fn test_fresh_store_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = SnapshotStore::open_at(&dir.path().join("timetable.db")).unwrap();
    assert_eq!(store.load().unwrap(), SessionSnapshot::default());
}

#[test]
fn test_store_catalog_fills_both_stores() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timetable.db");
    let store = SnapshotStore::open_at(&path).unwrap();
    let mut db = CatalogDb::open_at(&path).unwrap();

    let mut session = Session::new(Vec::new());
    let missing = session.store_catalog(catalog(), Utc::now(), &store, &mut db).unwrap();
    assert!(missing.is_empty());

    assert_eq!(store.load().unwrap().catalog, catalog());
    assert_eq!(db.list_all().unwrap(), catalog());
    assert_eq!(store.load().unwrap().fetched_at, db.fetched_at().unwrap());
}

#[test]
fn test_cache_failure_keeps_snapshot_and_previous_cache() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("timetable.db");
    let store = SnapshotStore::open_at(&path).unwrap();
    let mut db = CatalogDb::open_at(&path).unwrap();

    let mut session = Session::new(Vec::new());
    session.store_catalog(catalog()[..1].to_vec(), Utc::now(), &store, &mut db).unwrap();

    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch("DROP TABLE offering_slots;")
        .unwrap();

    let result = session.store_catalog(catalog(), Utc::now(), &store, &mut db);
    assert!(result.is_err());

    // Snapshot is written first, so it already holds the new catalog.
    assert_eq!(store.load().unwrap().catalog, catalog());
    assert_eq!(session.catalog(), catalog().as_slice());
    // The failed cache write rolled back.
    assert_eq!(db.count().unwrap(), 1);
}
