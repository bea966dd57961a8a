use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::engine::Engine;
use crate::error::{CacheError, CacheResult};
use crate::eviction::EvictionMode;
use crate::size_estimator::SizeEstimator;

/// One stored entry. Sizes are only measured when the engine has a size limit;
/// otherwise they stay zero and the accounting is inert.
struct Entry<V> {
    value: V,
    inserted_at: Instant,
    accessed_at: Instant,
    expires_at: Option<Instant>,
    size: u64,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

/// Entry table plus the aggregates maintained incrementally alongside it.
struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    /// Sum of all entry sizes; adjusted on every put/delete, never recomputed
    /// by scanning.
    total_size: u64,
    /// Minimum expiry over all entries; `None` means nothing can expire. Lets
    /// the purge pass skip the expiry scan entirely until the earliest
    /// possible expiry has actually passed.
    next_expiry: Option<Instant>,
}

/// In-memory cache engine.
///
/// Keys map to values with insert/access timestamps, optional absolute expiry
/// and an optional measured size. Hit and miss counters live outside the entry
/// table and deliberately survive eviction, expiry and deletion.
///
/// The entry table sits behind a `parking_lot::RwLock` so concurrent readers
/// do not serialize; counters use `DashMap` and never contend with the table
/// lock. Concurrent mutation of the same key is best-effort: counters and
/// size accounting may drift slightly in a race, which is accepted to keep a
/// global lock off the hot path.
///
/// With a size limit configured, every `put` walks the value being stored to
/// measure it. That walk is the most expensive operation in the engine, so
/// high-frequency writers should leave `max_size` unset.
///
/// # Examples
///
/// ```
/// use supercache::{Engine, EvictionMode, MemoryEngine};
///
/// let engine: MemoryEngine<String> = MemoryEngine::new(EvictionMode::Lru)
///     .with_max_count(128);
///
/// engine.put("answer", "42".to_string(), None);
/// assert_eq!(engine.get("answer").unwrap(), "42");
/// assert_eq!(engine.hits("answer"), 1);
/// assert_eq!(engine.misses("answer"), 1);
/// ```
pub struct MemoryEngine<V> {
    inner: RwLock<Inner<V>>,
    hit_counts: DashMap<String, u64>,
    miss_counts: DashMap<String, u64>,
    mode: EvictionMode,
    default_ttl: Option<Duration>,
    max_count: Option<usize>,
    max_size: Option<u64>,
}

impl<V: Clone + SizeEstimator> MemoryEngine<V> {
    /// Engine with no TTL and no limits; purge passes are no-ops until limits
    /// or TTLs come into play.
    pub fn new(mode: EvictionMode) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                total_size: 0,
                next_expiry: None,
            }),
            hit_counts: DashMap::new(),
            miss_counts: DashMap::new(),
            mode,
            default_ttl: None,
            max_count: None,
            max_size: None,
        }
    }

    /// Default time-to-live applied when `put` is not given an explicit TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Maximum number of entries, enforced by the purge pressure pass.
    pub fn with_max_count(mut self, count: usize) -> Self {
        self.max_count = Some(count);
        self
    }

    /// Soft size limit in bytes. Memory is allocated first and excess purged
    /// after, so the limit may be transiently exceeded; the latest write is
    /// always retained.
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    pub fn mode(&self) -> EvictionMode {
        self.mode
    }

    /// Number of live entries, expired ones included until the next purge.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Current measured size of all entries. Zero unless a size limit is
    /// configured.
    pub fn total_size(&self) -> u64 {
        self.inner.read().total_size
    }

    /// Stores a value, optionally suppressing the purge pass that normally
    /// follows a write.
    pub fn put_with_purge(&self, key: &str, value: V, ttl: Option<Duration>, purge: bool) {
        let now = Instant::now();
        {
            let mut inner = self.inner.write();

            let size = if self.max_size.is_some() {
                value.estimate_size() as u64
            } else {
                0
            };
            if self.max_size.is_some() {
                let previous = inner.entries.get(key).map(|e| e.size).unwrap_or(0);
                inner.total_size = inner.total_size.saturating_sub(previous) + size;
            }

            // None falls back to the engine default; a zero duration clears
            // the expiry outright.
            let effective_ttl = ttl.or(self.default_ttl).filter(|d| !d.is_zero());
            let expires_at = effective_ttl.map(|d| now + d);
            if let Some(at) = expires_at {
                inner.next_expiry = Some(match inner.next_expiry {
                    Some(watermark) => watermark.min(at),
                    None => at,
                });
            }

            inner.entries.insert(
                key.to_string(),
                Entry {
                    value,
                    inserted_at: now,
                    accessed_at: now,
                    expires_at,
                    size,
                },
            );
        }

        *self.miss_counts.entry(key.to_string()).or_insert(0) += 1;

        if purge {
            self.purge_with_exempt(Some(key));
        }
    }

    /// Maintenance pass, with the given key (the entry just written, if any)
    /// exempt: it is neither evicted nor counted against this pass's limits,
    /// so a write can never evict itself.
    fn purge_with_exempt(&self, exempt: Option<&str>) -> usize {
        let now = Instant::now();
        let mut purged = 0;
        let mut inner = self.inner.write();

        // Expiry pass. Skipped until the earliest recorded expiry has passed;
        // the watermark is recomputed over the survivors.
        if matches!(inner.next_expiry, Some(watermark) if now > watermark) {
            let expired: Vec<String> = inner
                .entries
                .iter()
                .filter(|(_, entry)| entry.is_expired(now))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &expired {
                Self::remove_entry(&mut inner, key);
            }
            inner.next_expiry = inner.entries.values().filter_map(|e| e.expires_at).min();
            if !expired.is_empty() {
                debug!(count = expired.len(), "purged expired cache entries");
            }
            purged += expired.len();
        }

        // Pressure pass.
        let over_count = matches!(self.max_count, Some(limit) if inner.entries.len() > limit);
        let over_size = matches!(self.max_size, Some(limit) if inner.total_size > limit);
        if !over_count && !over_size {
            return purged;
        }

        // Order entries most-retainable first under the configured mode, the
        // exempt key left out entirely. Ties put the oldest insertion at the
        // evict-first end.
        let mut ordered: Vec<(String, Instant, Instant, u64, u64)> = inner
            .entries
            .iter()
            .filter(|(key, _)| Some(key.as_str()) != exempt)
            .map(|(key, entry)| {
                (
                    key.clone(),
                    entry.inserted_at,
                    entry.accessed_at,
                    self.hits(key),
                    entry.size,
                )
            })
            .collect();
        ordered.sort_by(|a, b| {
            let primary = match self.mode {
                EvictionMode::Fifo => b.1.cmp(&a.1),
                EvictionMode::Filo => a.1.cmp(&b.1),
                EvictionMode::Lru => b.2.cmp(&a.2),
                EvictionMode::Mru => a.2.cmp(&b.2),
                EvictionMode::Lfu => b.3.cmp(&a.3),
            };
            primary.then(b.1.cmp(&a.1))
        });

        if let Some(limit) = self.max_count {
            for (key, ..) in ordered.iter().skip(limit) {
                if Self::remove_entry(&mut inner, key) {
                    debug!(%key, mode = %self.mode, "evicted over count limit");
                    purged += 1;
                }
            }
        }

        if let Some(limit) = self.max_size {
            // Keeping the newest under a size cap means walking from the
            // most-retainable end and cutting once the running total spills.
            let mut running = 0u64;
            for (key, .., size) in &ordered {
                if !inner.entries.contains_key(key) {
                    continue;
                }
                running += size;
                if running > limit && Self::remove_entry(&mut inner, key) {
                    debug!(%key, mode = %self.mode, "evicted over size limit");
                    purged += 1;
                }
            }
        }

        purged
    }

    /// Drops the entry and its size contribution. Idempotent; counters stay.
    fn remove_entry(inner: &mut Inner<V>, key: &str) -> bool {
        match inner.entries.remove(key) {
            Some(entry) => {
                inner.total_size = inner.total_size.saturating_sub(entry.size);
                true
            }
            None => false,
        }
    }
}

impl<V: Clone + SizeEstimator> Default for MemoryEngine<V> {
    fn default() -> Self {
        Self::new(EvictionMode::default())
    }
}

impl<V: Clone + SizeEstimator> Engine for MemoryEngine<V> {
    type Value = V;

    fn get(&self, key: &str) -> CacheResult<V> {
        let now = Instant::now();

        enum Probe {
            Missing,
            Expired,
            Live,
        }

        // Read lock only; the write lock is taken just for the paths that
        // actually mutate.
        let probe = {
            let inner = self.inner.read();
            match inner.entries.get(key) {
                None => Probe::Missing,
                Some(entry) if entry.is_expired(now) => Probe::Expired,
                Some(_) => Probe::Live,
            }
        };

        match probe {
            Probe::Missing => Err(CacheError::NotFound(key.to_string())),
            Probe::Expired => {
                let mut inner = self.inner.write();
                Self::remove_entry(&mut inner, key);
                trace!(%key, "dropped expired entry on get");
                Err(CacheError::Expired(key.to_string()))
            }
            Probe::Live => {
                let mut inner = self.inner.write();
                match inner.entries.get_mut(key) {
                    Some(entry) if !entry.is_expired(now) => {
                        entry.accessed_at = now;
                        let value = entry.value.clone();
                        drop(inner);
                        *self.hit_counts.entry(key.to_string()).or_insert(0) += 1;
                        Ok(value)
                    }
                    // Raced away between the probe and the write lock.
                    _ => Err(CacheError::NotFound(key.to_string())),
                }
            }
        }
    }

    fn put(&self, key: &str, value: V, ttl: Option<Duration>) {
        self.put_with_purge(key, value, ttl, true);
    }

    fn delete(&self, key: &str) -> bool {
        let mut inner = self.inner.write();
        Self::remove_entry(&mut inner, key)
    }

    fn exists(&self, key: &str) -> bool {
        let now = Instant::now();
        let expired = {
            let inner = self.inner.read();
            match inner.entries.get(key) {
                None => return false,
                Some(entry) => entry.is_expired(now),
            }
        };
        if expired {
            let mut inner = self.inner.write();
            Self::remove_entry(&mut inner, key);
            trace!(%key, "dropped expired entry on exists");
            return false;
        }
        true
    }

    fn hits(&self, key: &str) -> u64 {
        self.hit_counts.get(key).map(|count| *count).unwrap_or(0)
    }

    fn misses(&self, key: &str) -> u64 {
        self.miss_counts.get(key).map(|count| *count).unwrap_or(0)
    }

    fn purge(&self) -> usize {
        self.purge_with_exempt(None)
    }

    fn keys(&self) -> Vec<String> {
        self.purge();
        self.inner.read().entries.keys().cloned().collect()
    }
}
