//! Global registry of per-group cache statistics.
//!
//! Every [`Cache`](crate::Cache) facade registers its aggregate counters here
//! under its group name, so monitoring code can query hit rates without holding
//! a reference to any particular cache instance.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::CacheStats;

static REGISTRY: Lazy<RwLock<HashMap<String, Arc<CacheStats>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a group's statistics. Called by the facade on construction;
/// re-registering the same group replaces the previous handle.
pub fn register(group: &str, stats: Arc<CacheStats>) {
    REGISTRY.write().insert(group.to_string(), stats);
}

/// Snapshot of the statistics for a group, if one is registered.
pub fn get(group: &str) -> Option<CacheStats> {
    REGISTRY.read().get(group).map(|stats| (**stats).clone())
}

/// Names of all registered groups, sorted.
pub fn list() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY.read().keys().cloned().collect();
    names.sort();
    names
}

/// Remove a group from the registry. Returns whether it was present.
pub fn unregister(group: &str) -> bool {
    REGISTRY.write().remove(group).is_some()
}
