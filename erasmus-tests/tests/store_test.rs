/// Url store integration tests
///
/// Runs the store against a real table file in a temporary directory and
/// checks what ends up on disk.

use erasmus_store::{is_valid_short_id, StoreConfig, UrlStore};
use erasmus_test_utils::{record_aged, TestStore};
use std::collections::HashSet;

#[test]
fn test_store_resolve_not_found() {
    let test_store = TestStore::new();
    let store = &test_store.store;

    let id = store.store("longStateString");
    assert!(is_valid_short_id(&id));
    assert_eq!(store.resolve(&id).as_deref(), Some("longStateString"));
    assert_eq!(store.resolve("xyz000"), None);
}

#[test]
fn test_table_created_on_open() {
    let test_store = TestStore::new();

    assert!(test_store.path.exists());
    assert!(test_store.table_on_disk().urls.is_empty());
}

#[test]
fn test_same_state_single_record() {
    let test_store = TestStore::new();

    let ids: HashSet<String> = (0..5).map(|_| test_store.store.store("dup")).collect();
    assert_eq!(ids.len(), 1);
    assert_eq!(test_store.table_on_disk().urls.len(), 1);
}

#[test]
fn test_distinct_states_distinct_ids() {
    let test_store = TestStore::new();

    let ids: HashSet<String> = (0..200)
        .map(|i| test_store.store.store(&format!("state-{}", i)))
        .collect();
    assert_eq!(ids.len(), 200);
    assert!(ids.iter().all(|id| id.len() == 6 && is_valid_short_id(id)));
}

#[test]
fn test_access_count_persists() {
    let test_store = TestStore::new();
    let id = test_store.store.store("state");

    for _ in 0..4 {
        test_store.store.resolve(&id);
    }

    let reopened = test_store.reopen();
    assert_eq!(reopened.get(&id).unwrap().access_count, 4);
    assert_eq!(test_store.table_on_disk().urls[0].access_count, 4);
}

#[test]
fn test_record_fields_on_disk() {
    let test_store = TestStore::new();
    let before = erasmus_store::now_millis();
    let id = test_store.store.store("state");
    let after = erasmus_store::now_millis();

    let table = test_store.table_on_disk();
    let record = &table.urls[0];
    assert_eq!(record.id, id);
    assert_eq!(record.original_state, "state");
    assert_eq!(record.access_count, 0);
    assert!(record.created_at >= before && record.created_at <= after);
}

#[test]
fn test_cleanup_around_boundary() {
    let test_store = TestStore::new();
    test_store.seed(vec![
        record_aged("young1", "a", 89),
        record_aged("old001", "b", 91),
        record_aged("old002", "c", 400),
    ]);

    assert_eq!(test_store.store.cleanup(90), 2);
    let remaining: Vec<String> = test_store
        .table_on_disk()
        .urls
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(remaining, vec!["young1".to_string()]);
}

#[test]
fn test_cleanup_zero_days_removes_everything() {
    let test_store = TestStore::new();
    test_store.store.store("a");
    test_store.store.store("b");

    assert_eq!(test_store.store.cleanup(0), 2);
    assert!(test_store.table_on_disk().urls.is_empty());
}

#[test]
fn test_cleanup_on_empty_table() {
    let test_store = TestStore::new();
    assert_eq!(test_store.store.cleanup(30), 0);
    assert!(test_store.path.exists());
}

#[test]
fn test_custom_retention() {
    let test_store = TestStore::with_config(|c| c.with_retention_days(7));
    test_store.seed(vec![
        record_aged("week01", "a", 6),
        record_aged("week02", "b", 8),
    ]);

    assert_eq!(test_store.store.cleanup_expired(), 1);
    assert!(test_store.store.get("week01").is_some());
}

#[test]
fn test_corrupt_table_recovers_on_write() {
    let test_store = TestStore::new();
    std::fs::write(&test_store.path, "[[[").unwrap();

    assert!(test_store.store.records().is_empty());
    let id = test_store.store.store("fresh");

    let table = test_store.table_on_disk();
    assert_eq!(table.urls.len(), 1);
    assert_eq!(table.urls[0].id, id);
}

#[test]
fn test_open_in_missing_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("urls.json");

    let store = UrlStore::open(StoreConfig::new(&path)).unwrap();
    assert!(path.exists());
    let id = store.store("state");
    assert_eq!(store.resolve(&id).as_deref(), Some("state"));
}
