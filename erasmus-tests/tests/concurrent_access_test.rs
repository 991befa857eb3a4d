/// Concurrent access tests for the url store
///
/// Many threads share one store; every update must survive the
/// read-modify-write cycles of the others.

use erasmus_store::UrlStore;
use erasmus_test_utils::TestStore;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn shared_store() -> (TestStore, Arc<UrlStore>) {
    let test_store = TestStore::new();
    let store = Arc::new(test_store.reopen());
    (test_store, store)
}

#[test]
fn test_concurrent_stores() {
    let (test_store, store) = shared_store();
    let num_threads = 8;
    let stores_per_thread = 25;

    let mut handles = vec![];
    for thread_id in 0..num_threads {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            (0..stores_per_thread)
                .map(|i| store.store(&format!("thread{}:state{}", thread_id, i)))
                .collect::<Vec<_>>()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.extend(handle.join().unwrap());
    }

    assert_eq!(ids.len(), num_threads * stores_per_thread);
    assert_eq!(test_store.table_on_disk().urls.len(), num_threads * stores_per_thread);
}

#[test]
fn test_concurrent_same_state() {
    let (test_store, store) = shared_store();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.store("popular-state"))
        })
        .collect();

    let ids: HashSet<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(ids.len(), 1);
    assert_eq!(test_store.table_on_disk().urls.len(), 1);
}

#[test]
fn test_concurrent_resolves_counted() {
    let (_test_store, store) = shared_store();
    let id = store.store("state");
    let num_threads = 10;
    let resolves_per_thread = 20;

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let store = Arc::clone(&store);
            let id = id.clone();
            thread::spawn(move || {
                for _ in 0..resolves_per_thread {
                    assert_eq!(store.resolve(&id).as_deref(), Some("state"));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        store.get(&id).unwrap().access_count,
        (num_threads * resolves_per_thread) as u64
    );
}

#[test]
fn test_concurrent_mixed_with_cleanup() {
    let (_test_store, store) = shared_store();
    let id = store.store("keep-me");

    let mut handles = vec![];
    for thread_id in 0..4 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..10 {
                store.store(&format!("mixed{}:{}", thread_id, i));
            }
        }));
    }
    {
        let store = Arc::clone(&store);
        let id = id.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..10 {
                store.resolve(&id);
                // fresh records are never older than a day
                assert_eq!(store.cleanup(1), 0);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.records().len(), 41);
    assert_eq!(store.get(&id).unwrap().access_count, 10);
}
