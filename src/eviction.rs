use std::fmt;
use std::str::FromStr;

use crate::error::CacheError;

/// Policy deciding which entries are removed first when the cache is over its
/// count or size limit.
///
/// Every mode is defined purely as an ordering over the live entries; the
/// engine's purge pass sorts by it and evicts from the evict-first end. Ties
/// are broken by insertion order, oldest first.
///
/// | Mode   | Evict-first ordering          |
/// |--------|-------------------------------|
/// | `Fifo` | oldest insertion time first   |
/// | `Filo` | newest insertion time first   |
/// | `Lru`  | oldest access time first      |
/// | `Mru`  | newest access time first      |
/// | `Lfu`  | fewest hits first             |
///
/// # Examples
///
/// ```
/// use supercache::EvictionMode;
///
/// assert_eq!(EvictionMode::default(), EvictionMode::Lru);
/// assert_eq!("fifo".parse::<EvictionMode>().unwrap(), EvictionMode::Fifo);
/// assert!("arc".parse::<EvictionMode>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvictionMode {
    /// First in, first out.
    Fifo,
    /// First in, last out.
    Filo,
    /// Least recently used.
    Lru,
    /// Most recently used.
    Mru,
    /// Least frequently used.
    Lfu,
}

impl Default for EvictionMode {
    fn default() -> Self {
        EvictionMode::Lru
    }
}

impl fmt::Display for EvictionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvictionMode::Fifo => "fifo",
            EvictionMode::Filo => "filo",
            EvictionMode::Lru => "lru",
            EvictionMode::Mru => "mru",
            EvictionMode::Lfu => "lfu",
        };
        f.write_str(name)
    }
}

impl FromStr for EvictionMode {
    type Err = CacheError;

    /// Case-insensitive. Unrecognized names are a configuration error and fail
    /// with [`CacheError::UnknownEvictionMode`] rather than falling back to a
    /// default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(EvictionMode::Fifo),
            "filo" => Ok(EvictionMode::Filo),
            "lru" => Ok(EvictionMode::Lru),
            "mru" => Ok(EvictionMode::Mru),
            "lfu" => Ok(EvictionMode::Lfu),
            other => Err(CacheError::UnknownEvictionMode(other.to_string())),
        }
    }
}
