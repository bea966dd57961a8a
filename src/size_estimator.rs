use std::collections::{BTreeMap, HashMap};

use crate::Value;

/// Trait for estimating the in-memory size of cached values.
///
/// Soft size limits need a byte figure per entry. The default implementation
/// only counts stack-allocated data (`std::mem::size_of_val`); types owning
/// heap data should override `estimate_size` to include their allocations.
///
/// Walking the owned data of a value is the most expensive operation in the
/// engine's write path. Callers with high-frequency writes should leave the
/// size limit unconfigured, in which case `estimate_size` is never called.
///
/// # Examples
///
/// ```
/// use supercache::SizeEstimator;
///
/// #[derive(Clone)]
/// struct Report {
///     title: String,
///     rows: Vec<u64>,
/// }
///
/// impl SizeEstimator for Report {
///     fn estimate_size(&self) -> usize {
///         std::mem::size_of::<Self>()
///             + self.title.capacity()
///             + self.rows.capacity() * std::mem::size_of::<u64>()
///     }
/// }
/// ```
pub trait SizeEstimator {
    /// Estimated total size of the value in bytes, heap allocations included.
    fn estimate_size(&self) -> usize {
        std::mem::size_of_val(self)
    }
}

impl SizeEstimator for i8 {}
impl SizeEstimator for i16 {}
impl SizeEstimator for i32 {}
impl SizeEstimator for i64 {}
impl SizeEstimator for i128 {}
impl SizeEstimator for isize {}

impl SizeEstimator for u8 {}
impl SizeEstimator for u16 {}
impl SizeEstimator for u32 {}
impl SizeEstimator for u64 {}
impl SizeEstimator for u128 {}
impl SizeEstimator for usize {}

impl SizeEstimator for f32 {}
impl SizeEstimator for f64 {}

impl SizeEstimator for bool {}
impl SizeEstimator for char {}

impl SizeEstimator for () {}

impl SizeEstimator for String {
    fn estimate_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.capacity()
    }
}

impl<T: SizeEstimator> SizeEstimator for Vec<T> {
    fn estimate_size(&self) -> usize {
        let elements: usize = self.iter().map(SizeEstimator::estimate_size).sum();
        std::mem::size_of::<Self>() + elements
    }
}

impl<T: SizeEstimator> SizeEstimator for Option<T> {
    fn estimate_size(&self) -> usize {
        match self {
            Some(inner) => std::mem::size_of::<Self>() + inner.estimate_size(),
            None => std::mem::size_of::<Self>(),
        }
    }
}

impl<T: SizeEstimator, E: SizeEstimator> SizeEstimator for Result<T, E> {
    fn estimate_size(&self) -> usize {
        let inner = match self {
            Ok(v) => v.estimate_size(),
            Err(e) => e.estimate_size(),
        };
        std::mem::size_of::<Self>() + inner
    }
}

impl<K: SizeEstimator, V: SizeEstimator> SizeEstimator for HashMap<K, V> {
    fn estimate_size(&self) -> usize {
        let entries: usize = self
            .iter()
            .map(|(k, v)| k.estimate_size() + v.estimate_size())
            .sum();
        std::mem::size_of::<Self>() + entries
    }
}

impl<K: SizeEstimator, V: SizeEstimator> SizeEstimator for BTreeMap<K, V> {
    fn estimate_size(&self) -> usize {
        let entries: usize = self
            .iter()
            .map(|(k, v)| k.estimate_size() + v.estimate_size())
            .sum();
        std::mem::size_of::<Self>() + entries
    }
}

impl<A: SizeEstimator, B: SizeEstimator> SizeEstimator for (A, B) {
    fn estimate_size(&self) -> usize {
        self.0.estimate_size() + self.1.estimate_size()
    }
}

impl SizeEstimator for Value {
    fn estimate_size(&self) -> usize {
        let heap = match self {
            Value::Str(s) => s.capacity(),
            Value::Bytes(b) => b.capacity(),
            Value::Tuple(items) | Value::List(items) => {
                items.iter().map(SizeEstimator::estimate_size).sum()
            }
            Value::Map(pairs) => pairs
                .iter()
                .map(|(k, v)| k.estimate_size() + v.estimate_size())
                .sum(),
            Value::Lazy(name) => name.capacity(),
            _ => 0,
        };
        std::mem::size_of::<Self>() + heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_default() {
        assert_eq!(42i32.estimate_size(), std::mem::size_of::<i32>());
        assert_eq!(true.estimate_size(), std::mem::size_of::<bool>());
    }

    #[test]
    fn test_string_includes_capacity() {
        let s = String::from("hello world");
        assert!(s.estimate_size() >= std::mem::size_of::<String>() + s.len());
    }

    #[test]
    fn test_vec_of_strings() {
        let v = vec![String::from("aa"), String::from("bb")];
        let expected_min = std::mem::size_of::<Vec<String>>() + 2 * std::mem::size_of::<String>();
        assert!(v.estimate_size() > expected_min);
    }

    #[test]
    fn test_option_and_result() {
        let some: Option<i64> = Some(7);
        let none: Option<i64> = None;
        assert!(some.estimate_size() > none.estimate_size());

        let ok: Result<String, String> = Ok("value".to_string());
        assert!(ok.estimate_size() > std::mem::size_of::<Result<String, String>>());
    }

    #[test]
    fn test_value_nested() {
        let flat = Value::from(1);
        let nested = Value::tuple(vec![Value::from(1), Value::from("long string here")]);
        assert!(nested.estimate_size() > flat.estimate_size());
    }
}
