use thiserror::Error;

/// Errors surfaced by the fingerprint generator, the cache engine and the facade.
///
/// `NotFound` and `Expired` are expected, recoverable conditions: they drive the
/// cache-miss code path and let callers tell "never computed" apart from "computed
/// but stale". The remaining variants are genuine caller or configuration errors
/// and are always surfaced, never swallowed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CacheError {
    /// No cache entry exists for the key.
    #[error("no cache found for key '{0}'")]
    NotFound(String),

    /// A cache entry exists but its time-to-live has lapsed.
    #[error("cache expired for key '{0}'")]
    Expired(String),

    /// A selected argument cannot be reduced to a stable content hash.
    ///
    /// Carries the offending value's type name. Silently falling back to an
    /// identity hash would cause false cache hits, so this is always an error.
    #[error("unhashable function input type '{0}'")]
    Unhashable(String),

    /// A value was supplied both positionally and by keyword for the same
    /// parameter, mirroring a duplicate-argument error in a direct call.
    #[error("got multiple values for argument '{0}'")]
    AmbiguousArgument(String),

    /// An eviction mode name could not be parsed. Configuration error, fatal.
    #[error("unknown eviction mode '{0}'")]
    UnknownEvictionMode(String),
}

impl CacheError {
    /// True for the conditions that represent an ordinary cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::NotFound(_) | CacheError::Expired(_))
    }
}

/// Convenience alias used throughout the crate.
pub type CacheResult<T> = Result<T, CacheError>;
