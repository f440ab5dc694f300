//! Concurrent/Multi-threaded Tests for strata-indexmap
//!
//! These tests share one IndexMap across threads and verify:
//!
//! 1. **Writer Isolation** - concurrent inserts/removes never corrupt indexes
//! 2. **Reader Consistency** - readers always observe primary and secondary
//!    indexes agreeing at operation boundaries
//! 3. **Search Under Load** - searches run alongside writers without panics
//!
//! ## Running These Tests
//!
//! ```bash
//! cargo test --test concurrent_tests
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use strata_indexmap::{IndexMap, PrimaryIndex, SecondaryIndex};

// ============================================================================
// Test Helpers
// ============================================================================

const THREADS: usize = 8;
const PER_THREAD: i64 = 500;

#[derive(Debug, Clone)]
struct Item {
    id: i64,
    shard: i64,
    tags: Vec<String>,
}

fn item(id: i64) -> Item {
    Item {
        id,
        shard: id % 4,
        tags: vec![format!("t{}", id % 3), format!("t{}", id % 5)],
    }
}

fn shared_map() -> Arc<IndexMap<i64, Item>> {
    let map = IndexMap::new(PrimaryIndex::new(|i: &Item| i.id));
    map.add_index("shard", SecondaryIndex::new(|i: &Item| [i.shard]));
    map.add_index("tag", SecondaryIndex::new(|i: &Item| i.tags.clone()));
    Arc::new(map)
}

fn shard_total(map: &IndexMap<i64, Item>) -> usize {
    (0..4).map(|s| map.get_all_by("shard", s as i64).len()).sum()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_concurrent_inserts_are_all_indexed() {
    let map = shared_map();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let map = Arc::clone(&map);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let base = t as i64 * PER_THREAD;
                for id in base..base + PER_THREAD {
                    map.insert(item(id));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total = THREADS * PER_THREAD as usize;
    assert_eq!(map.len(), total);
    assert_eq!(shard_total(&map), total);
    for id in 0..total as i64 {
        let stored = map.get(&id).unwrap();
        assert!(map
            .get_all_by("shard", stored.shard)
            .iter()
            .any(|v| Arc::ptr_eq(v, &stored)));
    }
}

#[test]
fn test_concurrent_insert_and_remove_leave_indexes_consistent() {
    let map = shared_map();
    map.insert_many((0..1000).map(item));

    let barrier = Arc::new(Barrier::new(4));
    let mut handles = Vec::new();

    for t in 0..2i64 {
        let map = Arc::clone(&map);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for id in (t..1000).step_by(2) {
                map.remove(&id);
            }
        }));
    }
    for t in 0..2i64 {
        let map = Arc::clone(&map);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for id in 1000 + t * 500..1000 + (t + 1) * 500 {
                map.insert(item(id));
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(map.len(), 1000);
    assert_eq!(shard_total(&map), 1000);
    for id in 0..1000 {
        assert!(map.get(&id).is_none());
    }
}

#[test]
fn test_readers_observe_consistent_state() {
    let map = shared_map();
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let map = Arc::clone(&map);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for round in 0..200i64 {
                map.insert_many((0..20).map(|i| item(round * 20 + i)));
                map.update(&(round * 20), |old| match old {
                    Some(mut value) => {
                        let moved = Arc::make_mut(&mut value);
                        moved.shard = (moved.shard + 1) % 4;
                        (Some(value), true)
                    }
                    None => (None, false),
                });
                map.remove_by("shard", [round % 4]);
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let map = Arc::clone(&map);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::SeqCst) {
                    map.range(|key, value| {
                        assert_eq!(*key, value.id);
                        true
                    });

                    for shard in 0..4i64 {
                        for value in map.get_all_by("shard", shard) {
                            assert_eq!(value.shard, shard);
                        }
                    }

                    // A value left behind by a move would share its id with
                    // the moved copy
                    let all = map.search().or("shard", [0i64, 1, 2, 3]).execute();
                    let mut ids: Vec<i64> = all.iter().map(|v| v.id).collect();
                    ids.sort_unstable();
                    ids.dedup();
                    assert_eq!(ids.len(), all.len());

                    let found = map
                        .search()
                        .or("tag", ["t0", "t1"])
                        .exclude("shard", [0i64])
                        .execute();
                    for value in &found {
                        assert_ne!(value.shard, 0);
                        assert!(value.tags.iter().any(|t| t == "t0" || t == "t1"));
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    let (_, values) = map.collect();
    for value in &values {
        assert!(map
            .get_all_by("shard", value.shard)
            .iter()
            .any(|v| Arc::ptr_eq(v, value)));
        for tag in &value.tags {
            assert!(map
                .get_all_by("tag", tag.as_str())
                .iter()
                .any(|v| Arc::ptr_eq(v, value)));
        }
    }
    assert_eq!(shard_total(&map), map.len());
}

#[test]
fn test_concurrent_update_by_is_serialized() {
    let map = shared_map();
    map.insert_many((0..100).map(item));

    let handles: Vec<_> = (0..4i64)
        .map(|shard| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                map.update_by("shard", shard, |mut value| {
                    Arc::make_mut(&mut value).tags.push("touched".to_string());
                    (Some(value), true)
                })
            })
        })
        .collect();

    let reinserted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(reinserted, 100);
    assert_eq!(map.get_all_by("tag", "touched").len(), 100);
    assert_eq!(map.len(), 100);
}

#[test]
fn test_index_map_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<IndexMap<i64, Item>>();
}
