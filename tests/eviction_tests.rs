use supercache::{Cache, Engine, EvictionMode, MemoryEngine};

/// Recently read entries are preferred over cold ones when the count limit
/// bites. The write that triggers the purge is never its own victim.
#[test]
fn test_lru_prefers_recently_read() {
    let cache: Cache<MemoryEngine<i32>> = Cache::new(
        "lru",
        MemoryEngine::new(EvictionMode::Lru).with_max_count(1),
    );

    cache.put("a", 1, None);
    cache.put("b", 2, None);
    assert_eq!(cache.get("a"), Ok(1));
    cache.put("c", 3, None);

    assert!(cache.exists("a"));
    assert!(!cache.exists("b"));
    assert!(cache.exists("c"));
}

#[test]
fn test_mru_prefers_cold_entries() {
    let cache: Cache<MemoryEngine<i32>> = Cache::new(
        "mru",
        MemoryEngine::new(EvictionMode::Mru).with_max_count(1),
    );

    cache.put("a", 1, None);
    cache.put("b", 2, None);
    assert_eq!(cache.get("b"), Ok(2));
    cache.put("c", 3, None);

    assert!(cache.exists("a"));
    assert!(!cache.exists("b"));
    assert!(cache.exists("c"));
}

#[test]
fn test_fifo_evicts_in_insertion_order() {
    let engine = MemoryEngine::new(EvictionMode::Fifo).with_max_count(2);
    engine.put("a", 1, None);
    engine.put("b", 2, None);
    engine.put("c", 3, None);
    engine.put("d", 4, None);

    assert!(!engine.exists("a"));
    assert!(engine.exists("b"));
    assert!(engine.exists("c"));
    assert!(engine.exists("d"));
}

#[test]
fn test_filo_evicts_in_reverse_insertion_order() {
    let engine = MemoryEngine::new(EvictionMode::Filo).with_max_count(1);
    engine.put("a", 1, None);
    engine.put("b", 2, None);
    engine.put("c", 3, None);

    assert!(engine.exists("a"));
    assert!(!engine.exists("b"));
    assert!(engine.exists("c"));
}

#[test]
fn test_lfu_prefers_frequently_hit() {
    let engine = MemoryEngine::new(EvictionMode::Lfu).with_max_count(2);
    engine.put("hot", 1, None);
    engine.put("warm", 2, None);
    let _ = engine.get("hot");
    let _ = engine.get("hot");
    let _ = engine.get("warm");

    engine.put("cold", 3, None);
    engine.put("colder", 4, None);

    assert!(engine.exists("hot"));
    assert!(engine.exists("warm"));
    assert!(!engine.exists("cold"));
    assert!(engine.exists("colder"));
}

/// Count and size limits together must not trip over entries the count pass
/// already removed.
#[test]
fn test_combined_count_and_size_limits() {
    let engine: MemoryEngine<String> = MemoryEngine::new(EvictionMode::Fifo)
        .with_max_count(2)
        .with_max_size(64);

    for i in 0..6 {
        engine.put(&format!("k{i}"), "x".repeat(32), None);
    }

    assert!(engine.exists("k5"));
    assert!(engine.len() <= 3);
}

/// Explicit purge with no write in flight trims exactly to the limit.
#[test]
fn test_explicit_purge_trims_to_limit() {
    let engine = MemoryEngine::new(EvictionMode::Fifo).with_max_count(2);
    for i in 0..5 {
        engine.put(&format!("k{i}"), i, None);
    }
    engine.purge();
    assert_eq!(engine.len(), 2);
    assert!(engine.exists("k4"));
    assert!(engine.exists("k3"));
}

/// The soft size limit always keeps the most recent write, even when that
/// write alone exceeds the limit.
#[test]
fn test_size_limit_retains_latest_write() {
    let engine: MemoryEngine<String> = MemoryEngine::new(EvictionMode::Lru).with_max_size(0);
    engine.put("first", "payload".to_string(), None);
    assert!(engine.exists("first"));
    engine.put("second", "payload".to_string(), None);
    assert!(!engine.exists("first"));
    assert_eq!(engine.get("second"), Ok("payload".to_string()));
}
