use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::error::{CacheError, CacheResult};

/// Dynamic argument value used on the call side of a fingerprint.
///
/// Wrapped invocables come in every shape, so the fingerprint generator works on
/// an explicit value model rather than on generics: positional and keyword
/// arguments are carried as `Value`s, and each selected one is reduced to a
/// stable content digest.
///
/// Hashability follows the mutable/immutable split:
///
/// * `None`, `Bool`, `Int`, `Float`, `Str`, `Bytes` and `Tuple` (of hashable
///   elements) are hashable.
/// * `List` and `Map` are mutable containers without a stable hash.
/// * `Lazy` stands for an unmaterialized sequence (a generator-like value whose
///   items have not been produced yet). Hashing one would make distinct streams
///   collide, so it is rejected outright.
///
/// # Examples
///
/// ```
/// use supercache::Value;
///
/// let a = Value::from(42);
/// let b = Value::from(42);
/// assert_eq!(a.digest().unwrap(), b.digest().unwrap());
///
/// // Mutable containers fail loudly instead of degrading to an identity hash.
/// assert!(Value::list(vec![Value::from(1)]).digest().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Lazy(String),
}

impl Value {
    /// Immutable, hashable sequence.
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(items)
    }

    /// Mutable sequence. Not hashable.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items)
    }

    /// Key/value mapping. Not hashable.
    pub fn map(pairs: Vec<(Value, Value)>) -> Self {
        Value::Map(pairs)
    }

    /// Placeholder for an unmaterialized sequence; `type_name` is carried into
    /// the `Unhashable` diagnostic.
    pub fn lazy(type_name: &str) -> Self {
        Value::Lazy(type_name.to_string())
    }

    /// Name reported in `Unhashable` errors.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Lazy(name) => name.as_str(),
        }
    }

    /// Whether the value can participate in a fingerprint.
    pub fn is_hashable(&self) -> bool {
        match self {
            Value::List(_) | Value::Map(_) | Value::Lazy(_) => false,
            Value::Tuple(items) => items.iter().all(Value::is_hashable),
            _ => true,
        }
    }

    /// Canonical textual form fed to the digest. Unambiguous across types:
    /// every variant is tagged, so `Int(5)` and `Str("5")` never collide.
    fn write_canonical(&self, out: &mut String) -> CacheResult<()> {
        match self {
            Value::None => out.push_str("none"),
            Value::Bool(v) => {
                let _ = write!(out, "bool:{v}");
            }
            Value::Int(v) => {
                let _ = write!(out, "int:{v}");
            }
            // Bit pattern rather than decimal formatting, so the representation
            // does not depend on float-printing behavior.
            Value::Float(v) => {
                let _ = write!(out, "float:{:016x}", v.to_bits());
            }
            Value::Str(v) => {
                let _ = write!(out, "str:{}:{v}", v.len());
            }
            Value::Bytes(v) => {
                out.push_str("bytes:");
                for byte in v {
                    let _ = write!(out, "{byte:02x}");
                }
            }
            Value::Tuple(items) => {
                out.push_str("tuple:(");
                for item in items {
                    item.write_canonical(out)?;
                    out.push(',');
                }
                out.push(')');
            }
            Value::List(_) | Value::Map(_) | Value::Lazy(_) => {
                return Err(CacheError::Unhashable(self.type_name().to_string()));
            }
        }
        Ok(())
    }

    /// Stable content digest of the value.
    ///
    /// Uses SHA-256 over the canonical representation so fingerprints are
    /// reproducible across process restarts, unlike `std`'s seeded hashers.
    pub fn digest(&self) -> CacheResult<String> {
        let mut canonical = String::new();
        self.write_canonical(&mut canonical)?;
        Ok(digest_str(&canonical))
    }
}

/// Hex-encoded SHA-256 of a string. Shared by the fingerprint generator for
/// hashing the invocable identity and selector list alongside argument values.
pub fn digest_str(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let output = hasher.finalize();
    let mut hex = String::with_capacity(output.len() * 2);
    for byte in output {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::None,
        }
    }
}
