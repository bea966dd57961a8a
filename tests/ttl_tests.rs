use std::cell::Cell;
use std::thread;
use std::time::Duration;

use supercache::{
    function_id, Cache, CacheError, Call, EvictionMode, MemoryEngine, Signature, Value,
};

const TTL: Duration = Duration::from_millis(60);
const PAST_TTL: Duration = Duration::from_millis(90);

#[test]
fn test_expired_entry_reports_expired_then_not_found() {
    let cache: Cache<MemoryEngine<i32>> = Cache::new("expiry", MemoryEngine::default());
    cache.put("k", 1, Some(TTL));
    assert_eq!(cache.get("k"), Ok(1));

    thread::sleep(PAST_TTL);
    assert_eq!(cache.get("k"), Err(CacheError::Expired("<expiry>.k".to_string())));
    assert_eq!(cache.get("k"), Err(CacheError::NotFound("<expiry>.k".to_string())));
}

/// Expiry counts as a miss for memoization, so the value is recomputed and
/// re-stored.
#[test]
fn test_memoized_value_recomputed_after_expiry() {
    let cache: Cache<MemoryEngine<u32>> = Cache::new("recompute", MemoryEngine::default());
    let id = function_id!("func");
    let sig = Signature::builder()
        .param_with_default("a", Value::None)
        .build();
    let calls = Cell::new(0);

    let func = || {
        cache
            .get_or_put_with(&id, &sig, &Call::new(), None, None, Some(TTL), || {
                calls.set(calls.get() + 1);
                calls.get()
            })
            .unwrap()
    };

    let first = func();
    assert_eq!(first, func());
    thread::sleep(PAST_TTL);
    assert_ne!(first, func());
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_engine_default_ttl_applies_to_facade_puts() {
    let cache: Cache<MemoryEngine<i32>> = Cache::new(
        "default_ttl",
        MemoryEngine::new(EvictionMode::Lru).with_ttl(TTL),
    );
    cache.put("k", 1, None);
    assert!(cache.exists("k"));
    thread::sleep(PAST_TTL);
    assert!(!cache.exists("k"));
}

/// A zero TTL opts a single entry out of the engine-wide default.
#[test]
fn test_zero_ttl_overrides_default() {
    let cache: Cache<MemoryEngine<i32>> = Cache::new(
        "no_expiry",
        MemoryEngine::new(EvictionMode::Lru).with_ttl(TTL),
    );
    cache.put("pinned", 1, Some(Duration::ZERO));
    cache.put("fleeting", 2, None);
    thread::sleep(PAST_TTL);
    assert!(cache.exists("pinned"));
    assert!(!cache.exists("fleeting"));
}

/// Keys listing drops expired entries as a side effect, and group clearing
/// only counts what was still live.
#[test]
fn test_keys_and_clear_skip_expired() {
    let cache: Cache<MemoryEngine<i32>> = Cache::new("cleanup", MemoryEngine::default());
    cache.put("gone", 1, Some(TTL));
    cache.put("kept", 2, None);
    thread::sleep(PAST_TTL);

    assert_eq!(cache.keys(), vec!["kept".to_string()]);
    assert_eq!(cache.clear(), 1);
    assert!(cache.is_empty());
}
