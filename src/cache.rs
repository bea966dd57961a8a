use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::engine::Engine;
use crate::error::CacheResult;
use crate::fingerprint::{fingerprint, Fingerprint, Selector};
use crate::signature::{Call, FunctionId, Signature};
use crate::stats::CacheStats;
use crate::stats_registry;

/// Namespaced front-end over an [`Engine`].
///
/// Every key is transparently prefixed with `<group>.` before reaching the
/// engine, so several caches can share one engine without colliding, and
/// group-wide operations (clear, aggregate counts) only ever touch their own
/// entries. The facade also keeps an aggregate hit/miss tally per group,
/// published through [`stats_registry`] under the group name.
///
/// Function-level operations take a [`FunctionId`] or a full [`Fingerprint`]:
/// a fingerprint addresses one exact invocation, while a function identity
/// addresses every stored invocation of that function at once.
///
/// # Examples
///
/// ```
/// use supercache::{Cache, EvictionMode, MemoryEngine};
///
/// let cache = Cache::new("sessions", MemoryEngine::new(EvictionMode::Lru));
/// cache.put("token", 42, None);
/// assert_eq!(cache.get("token").unwrap(), 42);
/// assert_eq!(cache.keys(), vec!["token".to_string()]);
/// ```
pub struct Cache<E: Engine> {
    engine: Arc<E>,
    group: String,
    prefix: String,
    stats: Arc<CacheStats>,
}

impl<E: Engine> Cache<E> {
    /// Facade owning its engine. Registers the group's aggregate stats.
    pub fn new(group: &str, engine: E) -> Self {
        Self::with_shared_engine(group, Arc::new(engine))
    }

    /// Facade over an engine shared with other groups.
    pub fn with_shared_engine(group: &str, engine: Arc<E>) -> Self {
        let stats = Arc::new(CacheStats::new());
        stats_registry::register(group, Arc::clone(&stats));
        Self {
            engine,
            group: group.to_string(),
            prefix: format!("<{group}>."),
            stats,
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Aggregate hit/miss snapshot for this group.
    pub fn stats(&self) -> CacheStats {
        self.stats.as_ref().clone()
    }

    fn qualify(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Live keys belonging to this group, prefix stripped.
    pub fn keys(&self) -> Vec<String> {
        self.engine
            .keys()
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.prefix).map(str::to_string))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Value for a raw key. Records a hit or miss on the group aggregate.
    pub fn get(&self, key: &str) -> CacheResult<E::Value> {
        let result = self.engine.get(&self.qualify(key));
        match &result {
            Ok(_) => self.stats.record_hit(),
            Err(_) => self.stats.record_miss(),
        }
        result
    }

    pub fn put(&self, key: &str, value: E::Value, ttl: Option<Duration>) {
        self.engine.put(&self.qualify(key), value, ttl);
    }

    pub fn delete(&self, key: &str) -> bool {
        self.engine.delete(&self.qualify(key))
    }

    pub fn exists(&self, key: &str) -> bool {
        self.engine.exists(&self.qualify(key))
    }

    pub fn hits(&self, key: &str) -> u64 {
        self.engine.hits(&self.qualify(key))
    }

    pub fn misses(&self, key: &str) -> u64 {
        self.engine.misses(&self.qualify(key))
    }

    /// Removes every entry in the group; returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut removed = 0;
        for key in self.keys() {
            if self.delete(&key) {
                removed += 1;
            }
        }
        debug!(group = %self.group, removed, "cleared cache group");
        removed
    }

    /// Sum of per-key hit counters over the group's live keys.
    pub fn total_hits(&self) -> u64 {
        self.keys().iter().map(|key| self.hits(key)).sum()
    }

    /// Sum of per-key miss counters over the group's live keys.
    pub fn total_misses(&self) -> u64 {
        self.keys().iter().map(|key| self.misses(key)).sum()
    }

    /// Cached result of one exact invocation.
    pub fn get_call(&self, print: &Fingerprint) -> CacheResult<E::Value> {
        self.get(print.as_str())
    }

    pub fn put_call(&self, print: &Fingerprint, value: E::Value, ttl: Option<Duration>) {
        self.put(print.as_str(), value, ttl);
    }

    pub fn delete_call(&self, print: &Fingerprint) -> bool {
        self.delete(print.as_str())
    }

    pub fn exists_call(&self, print: &Fingerprint) -> bool {
        self.exists(print.as_str())
    }

    pub fn hits_call(&self, print: &Fingerprint) -> u64 {
        self.hits(print.as_str())
    }

    pub fn misses_call(&self, print: &Fingerprint) -> u64 {
        self.misses(print.as_str())
    }

    fn keys_of(&self, id: &FunctionId) -> Vec<String> {
        let component = id.component();
        self.keys()
            .into_iter()
            .filter(|key| key.starts_with(&component))
            .collect()
    }

    /// Removes every stored invocation of the function; returns the count.
    pub fn delete_fn(&self, id: &FunctionId) -> usize {
        let mut removed = 0;
        for key in self.keys_of(id) {
            if self.delete(&key) {
                removed += 1;
            }
        }
        debug!(group = %self.group, function = %id, removed, "deleted function results");
        removed
    }

    /// Whether any invocation of the function is currently cached.
    pub fn exists_fn(&self, id: &FunctionId) -> bool {
        !self.keys_of(id).is_empty()
    }

    /// Hits summed over the function's live invocations.
    pub fn hits_fn(&self, id: &FunctionId) -> u64 {
        self.keys_of(id).iter().map(|key| self.hits(key)).sum()
    }

    /// Misses summed over the function's live invocations.
    pub fn misses_fn(&self, id: &FunctionId) -> u64 {
        self.keys_of(id).iter().map(|key| self.misses(key)).sum()
    }

    /// The memoization primitive: serve the cached result of this invocation,
    /// or compute, store and return it.
    ///
    /// The fingerprint is derived from the function identity, its declared
    /// signature and the concrete call, optionally narrowed by `keys` and
    /// `ignore` selectors. Fingerprinting errors (unhashable values, ambiguous
    /// arguments) propagate instead of silently bypassing the cache.
    ///
    /// # Examples
    ///
    /// ```
    /// use supercache::{Cache, Call, MemoryEngine, Signature, function_id};
    ///
    /// let cache: Cache<MemoryEngine<u64>> = Cache::new("math", MemoryEngine::default());
    /// let id = function_id!("double");
    /// let sig = Signature::builder().param("x").build();
    ///
    /// let mut computed = 0;
    /// for _ in 0..3 {
    ///     let value = cache
    ///         .get_or_put_with(&id, &sig, &Call::new().arg(21), None, None, None, || {
    ///             computed += 1;
    ///             42
    ///         })
    ///         .unwrap();
    ///     assert_eq!(value, 42);
    /// }
    /// assert_eq!(computed, 1);
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn get_or_put_with<F>(
        &self,
        id: &FunctionId,
        signature: &Signature,
        call: &Call,
        keys: Option<&[Selector]>,
        ignore: Option<&[Selector]>,
        ttl: Option<Duration>,
        compute: F,
    ) -> CacheResult<E::Value>
    where
        F: FnOnce() -> E::Value,
    {
        let print = fingerprint(id, signature, call, keys, ignore)?;
        match self.get_call(&print) {
            Ok(value) => Ok(value),
            Err(err) if err.is_miss() => {
                let value = compute();
                self.put_call(&print, value.clone(), ttl);
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }
}
