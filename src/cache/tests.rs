use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;

use super::*;
use crate::hashing::Fingerprint;

const TTL: Duration = Duration::from_secs(1800);

fn cache_with_clock(max_size: usize) -> (ResponseCache<String>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_epoch());
    let cache = ResponseCache::with_clock(max_size, TTL, clock.clone());
    (cache, clock)
}

fn fp(s: &str) -> Fingerprint {
    Fingerprint::from(s)
}

#[test]
fn test_get_missing_is_miss() {
    let (cache, _) = cache_with_clock(10);
    assert!(cache.get(&fp("nope")).unwrap().is_none());
}

#[test]
fn test_set_then_get_returns_same_payload() {
    let (cache, _) = cache_with_clock(10);
    let payload = Arc::new("x = 2".to_string());
    cache.set(fp("f1"), payload.clone()).unwrap();

    let hit = cache.get(&fp("f1")).unwrap().unwrap();
    assert!(Arc::ptr_eq(&hit, &payload));
}

#[test]
fn test_ttl_boundary() {
    let (cache, clock) = cache_with_clock(10);
    cache.set(fp("f1"), "answer".to_string()).unwrap();

    clock.advance(TimeDelta::seconds(1799));
    assert!(cache.get(&fp("f1")).unwrap().is_some());

    clock.advance(TimeDelta::seconds(2));
    assert!(cache.get(&fp("f1")).unwrap().is_none());
    assert_eq!(cache.len().unwrap(), 0);
}

#[test]
fn test_expiry_counts_from_creation_not_access() {
    let (cache, clock) = cache_with_clock(10);
    cache.set(fp("f1"), "answer".to_string()).unwrap();

    for _ in 0..3 {
        clock.advance(TimeDelta::seconds(600));
        let _ = cache.get(&fp("f1")).unwrap();
    }
    clock.advance(TimeDelta::seconds(1));
    assert!(cache.get(&fp("f1")).unwrap().is_none());
}

#[test]
fn test_capacity_evicts_least_recently_used() {
    let (cache, clock) = cache_with_clock(3);
    for key in ["a", "b", "c"] {
        cache.set(fp(key), key.to_string()).unwrap();
        clock.advance(TimeDelta::seconds(1));
    }
    // Touch "a" so "b" becomes the oldest access.
    assert!(cache.get(&fp("a")).unwrap().is_some());
    clock.advance(TimeDelta::seconds(1));

    cache.set(fp("d"), "d".to_string()).unwrap();

    assert_eq!(cache.len().unwrap(), 3);
    assert!(cache.get(&fp("b")).unwrap().is_none());
    for key in ["a", "c", "d"] {
        assert!(cache.get(&fp(key)).unwrap().is_some(), "{key}");
    }
    assert_eq!(cache.stats().unwrap().evictions, 1);
}

#[test]
fn test_eviction_tie_breaks_on_smallest_fingerprint() {
    let (cache, _) = cache_with_clock(2);
    cache.set(fp("b"), "b".to_string()).unwrap();
    cache.set(fp("a"), "a".to_string()).unwrap();
    cache.set(fp("c"), "c".to_string()).unwrap();

    assert!(cache.get(&fp("a")).unwrap().is_none());
    assert!(cache.get(&fp("b")).unwrap().is_some());
    assert!(cache.get(&fp("c")).unwrap().is_some());
}

#[test]
fn test_max_size_one_scenario() {
    let (cache, clock) = cache_with_clock(1);
    cache.set(fp("f1"), "first".to_string()).unwrap();
    clock.advance(TimeDelta::seconds(1));
    cache.set(fp("f2"), "second".to_string()).unwrap();

    assert!(cache.get(&fp("f1")).unwrap().is_none());
    assert_eq!(cache.get(&fp("f2")).unwrap().as_deref(), Some(&"second".to_string()));
    assert_eq!(cache.len().unwrap(), 1);
}

#[test]
fn test_reset_existing_key_does_not_evict() {
    let (cache, _) = cache_with_clock(2);
    cache.set(fp("a"), "1".to_string()).unwrap();
    cache.set(fp("b"), "2".to_string()).unwrap();
    cache.set(fp("a"), "3".to_string()).unwrap();

    assert_eq!(cache.len().unwrap(), 2);
    assert_eq!(cache.get(&fp("a")).unwrap().as_deref(), Some(&"3".to_string()));
    assert!(cache.get(&fp("b")).unwrap().is_some());
    assert_eq!(cache.stats().unwrap().evictions, 0);
}

#[test]
fn test_max_size_plus_one_inserts() {
    let (cache, clock) = cache_with_clock(5);
    for i in 0..6 {
        cache.set(fp(&format!("k{i}")), i.to_string()).unwrap();
        clock.advance(TimeDelta::seconds(1));
    }
    assert_eq!(cache.len().unwrap(), 5);
    assert!(cache.get(&fp("k0")).unwrap().is_none());
}

#[test]
fn test_zero_capacity_stores_nothing() {
    let (cache, _) = cache_with_clock(0);
    cache.set(fp("a"), "a".to_string()).unwrap();
    assert!(cache.is_empty().unwrap());
}

#[test]
fn test_stats_and_clear() {
    let (cache, clock) = cache_with_clock(10);
    let empty = cache.stats().unwrap();
    assert_eq!(empty.size, 0);
    assert_eq!(empty.max_size, 10);
    assert_eq!(empty.ttl_secs, 1800);
    assert!(empty.oldest_access.is_none());

    let start = clock.now();
    cache.set(fp("a"), "a".to_string()).unwrap();
    clock.advance(TimeDelta::seconds(5));
    cache.set(fp("b"), "b".to_string()).unwrap();
    let _ = cache.get(&fp("a")).unwrap();
    let _ = cache.get(&fp("zzz")).unwrap();

    let stats = cache.stats().unwrap();
    assert_eq!(stats.size, 2);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.oldest_access, Some(start + TimeDelta::seconds(5)));

    cache.clear();
    let cleared = cache.stats().unwrap();
    assert_eq!(cleared.size, 0);
    assert_eq!(cleared.hits, 0);
}

#[test]
fn test_poisoned_lock_resets_cache() {
    let (cache, _) = cache_with_clock(10);
    cache.set(fp("a"), "a".to_string()).unwrap();

    cache.poison_for_test();

    assert_eq!(cache.get(&fp("a")), Err(CacheError::Poisoned));
    assert!(cache.get(&fp("a")).unwrap().is_none());
    cache.set(fp("b"), "b".to_string()).unwrap();
    assert_eq!(cache.len().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access_respects_capacity() {
    let cache = Arc::new(ResponseCache::<String>::new(16, TTL));
    let mut handles = Vec::new();
    for task in 0..8 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..100 {
                let key = fp(&format!("k{}", (task * 7 + i) % 40));
                if cache.get(&key).unwrap().is_none() {
                    cache.set(key, format!("{task}-{i}")).unwrap();
                }
                assert!(cache.len().unwrap() <= 16);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    assert!(cache.len().unwrap() <= 16);
}
