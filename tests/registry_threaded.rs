//! Concurrency behavior: serialized mutation, lock release on every exit
//! path, and bulk critical sections under contention.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use registry_core::{OverwritePolicy, Registry, RegistryError};

#[test]
fn test_disjoint_writers_lose_no_writes() {
    let registry: Arc<Registry<usize>> = Arc::new(Registry::new());

    let handles: Vec<_> = (0..5)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in (worker * 10)..((worker + 1) * 10) {
                    registry.insert(&format!("k{i}"), i).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 50);
    for i in 0..50 {
        let key = format!("k{i}");
        assert!(registry.contains(&key));
        assert_eq!(registry.lookup(&key).unwrap(), i);
    }
}

#[test]
fn test_concurrent_reads_during_writes() {
    let registry: Arc<Registry<usize>> = Arc::new(Registry::new());

    let writers: Vec<_> = (0..5)
        .map(|worker| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in (worker * 10)..((worker + 1) * 10) {
                    registry.insert(&format!("k{i}"), i).unwrap();
                }
            })
        })
        .collect();
    let readers: Vec<_> = (0..5)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let mut observed = Vec::new();
                for i in 0..50 {
                    if let Some(value) = registry.get(&format!("k{i}")) {
                        observed.push((i, value));
                    }
                }
                observed
            })
        })
        .collect();

    for handle in writers {
        handle.join().unwrap();
    }
    for handle in readers {
        // readers only ever observe fully written values
        for (i, value) in handle.join().unwrap() {
            assert_eq!(value, i);
        }
    }
}

#[test]
fn test_concurrent_removal_and_access() {
    let registry: Arc<Registry<usize>> = Arc::new(Registry::new());
    for i in 0..100 {
        registry.insert(&format!("k{i}"), i).unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..5 {
        let registry_remover = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            for i in (0..100).step_by(2) {
                match registry_remover.remove(&format!("k{i}")) {
                    Ok(()) | Err(RegistryError::NotRegistered { .. }) => {}
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
        }));
        let registry_reader = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                let _ = registry_reader.get(&format!("k{i}"));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    for i in (0..100).step_by(2) {
        assert!(!registry.contains(&format!("k{i}")));
    }
    for i in (1..100).step_by(2) {
        assert_eq!(registry.lookup(&format!("k{i}")).unwrap(), i);
    }
}

#[test]
fn test_concurrent_registration_with_distinct_keys() {
    let registry: Arc<Registry<Arc<dyn Fn(i32) -> i32 + Send + Sync>>> =
        Arc::new(Registry::new());

    let handles: Vec<_> = (0..20)
        .map(|n: i32| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry
                    .register_with(&format!("f{n}"), None, || {
                        Arc::new(move |x| x + n) as Arc<dyn Fn(i32) -> i32 + Send + Sync>
                    })
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 20);
    for n in 0..20 {
        assert_eq!(registry.lookup(&format!("f{n}")).unwrap()(100), 100 + n);
    }
}

#[test]
fn test_bulk_excludes_other_writers() {
    let registry: Arc<Registry<i32>> = Arc::new(Registry::new());

    let bulk = registry.bulk();
    bulk.insert("a", 1).unwrap();

    let contender = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            registry.insert("b", 2).unwrap();
        })
    };
    thread::sleep(Duration::from_millis(50));

    // while this thread holds the lock, the contender cannot have written
    assert!(!bulk.contains("b"));
    bulk.insert("c", 3).unwrap();
    drop(bulk);

    contender.join().unwrap();
    assert!(registry.contains("b"));
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_bulk_releases_the_lock_on_panic() {
    let registry: Arc<Registry<i32>> = Arc::new(Registry::new());

    let panicker = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            let bulk = registry.bulk();
            bulk.insert("a", 1).unwrap();
            panic!("forced exit");
        })
    };
    assert!(panicker.join().is_err());

    // the lock was released during unwinding; this must not deadlock
    registry.insert("b", 2).unwrap();
    assert!(registry.contains("a"));
    assert!(registry.contains("b"));
}

#[test]
fn test_overwrite_races_resolve_to_one_winner() {
    let registry: Arc<Registry<usize>> =
        Arc::new(Registry::with_policy(OverwritePolicy::Allow));

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry.insert("contested", n).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // which writer won is unspecified, but the value is one of them
    let value = registry.lookup("contested").unwrap();
    assert!(value < 8);
    assert_eq!(registry.len(), 1);
}
