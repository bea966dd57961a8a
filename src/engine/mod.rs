//! Cache engines.
//!
//! An engine is a key/value store with hit/miss bookkeeping, lazy TTL expiry
//! and limit-driven eviction. [`MemoryEngine`] is the in-process
//! implementation; persistent or remote backends implement the same [`Engine`]
//! contract and are otherwise free in their storage schema.

use std::time::Duration;

use crate::error::CacheResult;

mod memory;

pub use memory::MemoryEngine;

/// The portable engine contract the facade routes through.
///
/// Per-key hit and miss counters outlive the entries they describe: after an
/// entry is evicted, expired or deleted, its counters remain queryable, which
/// distinguishes "was never computed" (zero) from "was computed and later
/// dropped". No method suspends; every call is synchronous and treated as
/// blocking and non-cancellable.
///
/// Engines are best-effort under concurrent mutation of the same key. Counter
/// or size bookkeeping may drift slightly in a read-modify-write race; this is
/// accepted in exchange for keeping the hot path free of a global lock.
pub trait Engine {
    /// The stored value type.
    type Value: Clone;

    /// Value for a key. Fails with `NotFound` when absent and `Expired` when
    /// the TTL has lapsed (checked eagerly, independent of any purge), in
    /// which case nothing is incremented. On a hit the per-key hit counter and
    /// access stamp are updated.
    fn get(&self, key: &str) -> CacheResult<Self::Value>;

    /// Stores a value, unconditionally overwriting any previous entry.
    ///
    /// `ttl` of `None` falls back to the engine-wide default; a zero duration
    /// clears the expiry. Triggers a purge pass from which the written key is
    /// exempt, so a write never evicts itself.
    fn put(&self, key: &str, value: Self::Value, ttl: Option<Duration>);

    /// Removes the entry data (value, timestamps, size accounting) while
    /// retaining hit/miss counters. Returns whether anything was removed.
    fn delete(&self, key: &str) -> bool;

    /// True only if the key is present and unexpired. An expired entry found
    /// during the check is lazily deleted.
    fn exists(&self, key: &str) -> bool;

    /// Times the key was served from cache. Survives entry removal.
    fn hits(&self, key: &str) -> u64;

    /// Times the key was (re)computed and stored. Survives entry removal.
    fn misses(&self, key: &str) -> u64;

    /// Runs the expiry and pressure maintenance passes; returns the number of
    /// entries removed.
    fn purge(&self) -> usize;

    /// Currently live keys, after implicitly purging expired entries.
    fn keys(&self) -> Vec<String>;
}
