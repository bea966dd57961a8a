//! # Supercache
//!
//! A transparent result-caching library: a function call and its arguments
//! are reduced to a stable fingerprint, and the result is stored, served and
//! invalidated through a namespaced cache facade.
//!
//! ## Features
//!
//! - **Stable fingerprints**: Function identity plus argument values hashed
//!   into a key that is stable across calls and process restarts
//! - **Selector tuning**: Include or exclude arguments by index, name, range
//!   or regular expression when some parameters don't affect the result
//! - **Eviction policies**: FIFO, FILO, LRU, MRU and LFU, all defined as
//!   orderings over the live entries
//! - **TTL expiry**: Per-entry or engine-default time-to-live with lazy,
//!   watermark-gated cleanup
//! - **Hit/miss accounting**: Per-key counters that survive eviction, plus
//!   per-group aggregates published through a global registry
//! - **Thread-safe**: Engines share freely across threads behind `Arc`
//!
//! ## Quick Start
//!
//! ```rust
//! use supercache::{Cache, Call, MemoryEngine, Signature, function_id};
//!
//! let cache: Cache<MemoryEngine<u64>> = Cache::new("math", MemoryEngine::default());
//! let id = function_id!("square");
//! let sig = Signature::builder().param("n").build();
//!
//! let square = |cache: &Cache<MemoryEngine<u64>>, n: u64| {
//!     cache
//!         .get_or_put_with(&id, &sig, &Call::new().arg(n as i64), None, None, None, || n * n)
//!         .unwrap()
//! };
//!
//! assert_eq!(square(&cache, 12), 144);
//! assert_eq!(square(&cache, 12), 144); // served from cache
//! assert_eq!(cache.stats().hits(), 1);
//! ```
//!
//! ## Module Organization
//!
//! - [`fingerprint`](mod@fingerprint) - Call identity: default keys, selector
//!   resolution and the fingerprint itself
//! - [`engine`] - The [`Engine`] contract and the in-memory implementation
//! - [`Cache`] - Namespaced facade with function-level operations
//! - [`stats_registry`] - Global registry of per-group aggregate counters

mod cache;
mod error;
mod eviction;
mod signature;
mod size_estimator;
mod stats;
mod value;

pub mod engine;
pub mod fingerprint;
pub mod stats_registry;

pub use cache::Cache;
pub use engine::{Engine, MemoryEngine};
pub use error::{CacheError, CacheResult};
pub use eviction::EvictionMode;
pub use fingerprint::{
    default_keys, fingerprint, resolve_selectors, Fingerprint, ResolvedKey, Selector,
};
pub use signature::{Call, FunctionId, Signature, SignatureBuilder};
pub use size_estimator::SizeEstimator;
pub use stats::CacheStats;
pub use value::Value;
