//! Concurrent access to a shared store and session layer.

use std::collections::HashSet;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use lapse_session::{ExpiringStore, SessionConfig, StoreError, TokenSessions};

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_concurrent_adds_are_all_retrievable() {
    init_tracing();
    let store = ExpiringStore::with_lifetime(Duration::from_secs(60));
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for t in 0..THREADS {
            let store = store.clone();
            let barrier = &barrier;
            s.spawn(move || {
                barrier.wait();
                for i in 0..PER_THREAD {
                    store.add(format!("t{}-k{}", t, i), t * PER_THREAD + i).unwrap();
                }
            });
        }
    });

    assert_eq!(store.count(), THREADS * PER_THREAD);
    for t in 0..THREADS {
        for i in 0..PER_THREAD {
            assert_eq!(store.get(&format!("t{}-k{}", t, i)).unwrap(), t * PER_THREAD + i);
        }
    }
}

#[test]
fn test_racing_adds_on_one_key_have_a_single_winner() {
    init_tracing();
    let store = ExpiringStore::with_lifetime(Duration::from_secs(60));
    let barrier = Barrier::new(THREADS);

    let results: Vec<Result<(), StoreError>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = store.clone();
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    store.add("contended", t)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == StoreError::DuplicateKey("contended".to_string()))
    );
    assert_eq!(store.count(), 1);
}

#[test]
fn test_readers_and_writers_do_not_lose_updates() {
    init_tracing();
    let store = ExpiringStore::with_lifetime(Duration::from_secs(60));
    store.add("counter", 0u64).unwrap();

    thread::scope(|s| {
        for _ in 0..THREADS {
            let store = store.clone();
            s.spawn(move || {
                for _ in 0..PER_THREAD {
                    let _ = store.get("counter").unwrap();
                    store.count();
                }
            });
        }
    });

    // Each thread owns its key, so every write must land.
    thread::scope(|s| {
        for t in 0..THREADS {
            let store = store.clone();
            s.spawn(move || {
                let key = format!("owned-{}", t);
                store.add(key.clone(), 0).unwrap();
                for i in 1..=PER_THREAD as u64 {
                    store.set(&key, i).unwrap();
                }
            });
        }
    });

    for t in 0..THREADS {
        assert_eq!(store.get(&format!("owned-{}", t)).unwrap(), PER_THREAD as u64);
    }
}

#[test]
fn test_concurrent_sweeps_and_deletes() {
    init_tracing();
    let store = ExpiringStore::with_lifetime(Duration::from_millis(10));
    for i in 0..100 {
        store.add(format!("short-{}", i), i).unwrap();
    }
    for i in 0..100 {
        store
            .add_with_lifetime(format!("long-{}", i), i, Duration::from_secs(60))
            .unwrap();
    }

    thread::sleep(Duration::from_millis(30));

    let deleted: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                s.spawn(move || {
                    let mut deleted = 0usize;
                    for i in (t..100).step_by(4) {
                        assert!(store.delete(&format!("short-{}", i)).is_err());
                        if store.delete(&format!("long-{}", i)).is_ok() {
                            deleted += 1;
                        }
                        store.cleanup_expired();
                    }
                    deleted
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(deleted, 100);
    assert_eq!(store.count(), 0);
}

#[test]
fn test_concurrent_session_tokens_are_unique() {
    init_tracing();
    let sessions: TokenSessions<u32> = TokenSessions::new(
        SessionConfig::new()
            .with_unauthenticated_lifetime(Duration::from_secs(60))
            .with_salt("concurrency"),
    );

    let tokens: Vec<String> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let sessions = sessions.clone();
                s.spawn(move || (0..50).map(|_| sessions.add()).collect::<Vec<_>>())
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: HashSet<&String> = tokens.iter().collect();
    assert_eq!(unique.len(), THREADS * 50);
    assert_eq!(sessions.count(), THREADS * 50);
    for token in &tokens {
        assert_eq!(sessions.get(token).unwrap(), None);
    }
}
