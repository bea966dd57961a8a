//! Fingerprint generation.
//!
//! A fingerprint reduces one concrete invocation (function identity, selected
//! parameters, effective argument values) to a stable, collision-resistant
//! string. Two calls fingerprint identically exactly when they refer to the
//! same invocable, the same selector set, and every selected argument resolves
//! to an equal value, regardless of whether a value arrived positionally, by
//! keyword, or from a declared default.

use std::collections::BTreeSet;
use std::fmt;

use regex::Regex;

use crate::error::{CacheError, CacheResult};
use crate::signature::{Call, FunctionId, Signature};
use crate::value::{digest_str, Value};

/// A selector token addressing one or more arguments for inclusion in (or
/// exclusion from) a fingerprint.
///
/// Mirrors the ways callers think about parameters: by position, by name, as a
/// range over the default ordering, or as a name pattern.
///
/// # Examples
///
/// ```
/// use regex::Regex;
/// use supercache::Selector;
///
/// let by_index: Selector = 0.into();
/// let by_name: Selector = "verbose".into();
/// let by_range: Selector = (1..3).into();
/// let by_pattern: Selector = Regex::new("^debug_").unwrap().into();
/// ```
#[derive(Debug, Clone)]
pub enum Selector {
    /// A positional slot.
    Index(usize),
    /// A parameter or keyword name.
    Name(String),
    /// A slice over the default selector list; `None` bounds are open.
    Range {
        start: Option<usize>,
        stop: Option<usize>,
    },
    /// Matched against passed-keyword names and declared parameter names.
    Pattern(Regex),
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Selector::Index(index)
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Name(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Name(name)
    }
}

impl From<Regex> for Selector {
    fn from(pattern: Regex) -> Self {
        Selector::Pattern(pattern)
    }
}

impl From<std::ops::Range<usize>> for Selector {
    fn from(range: std::ops::Range<usize>) -> Self {
        Selector::Range {
            start: Some(range.start),
            stop: Some(range.end),
        }
    }
}

impl From<std::ops::RangeFrom<usize>> for Selector {
    fn from(range: std::ops::RangeFrom<usize>) -> Self {
        Selector::Range {
            start: Some(range.start),
            stop: None,
        }
    }
}

impl From<std::ops::RangeTo<usize>> for Selector {
    fn from(range: std::ops::RangeTo<usize>) -> Self {
        Selector::Range {
            start: None,
            stop: Some(range.end),
        }
    }
}

impl From<std::ops::RangeFull> for Selector {
    fn from(_: std::ops::RangeFull) -> Self {
        Selector::Range {
            start: None,
            stop: None,
        }
    }
}

/// A selector after resolution against a signature and call: either a concrete
/// positional slot or an extra-keyword name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedKey {
    Pos(usize),
    Kw(String),
}

impl fmt::Display for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedKey::Pos(index) => write!(f, "{index}"),
            ResolvedKey::Kw(name) => write!(f, "'{name}'"),
        }
    }
}

/// The "cache everything that could plausibly differ" default selector list:
/// every positional slot supplied or declared, every keyword-only parameter,
/// and every passed keyword that does not map to a declared positional
/// parameter. Positions ascend; extra keyword names are sorted and always
/// follow the numeric selectors.
pub fn default_keys(signature: &Signature, call: &Call) -> Vec<ResolvedKey> {
    let arg_count = signature.params().len().max(call.args().len());
    let mut keys: Vec<ResolvedKey> = (0..arg_count).map(ResolvedKey::Pos).collect();

    for name in signature.kwonly() {
        keys.push(ResolvedKey::Kw(name.clone()));
    }

    // Call kwargs iterate in sorted order.
    for name in call.kwargs().keys() {
        if signature.kwonly().iter().any(|k| k == name) {
            continue;
        }
        match signature.position_of(name) {
            None => keys.push(ResolvedKey::Kw(name.clone())),
            // A keyword for a declared parameter beyond the supplied slots
            // participates by position, like any other positional value.
            Some(index) if index >= arg_count => keys.push(ResolvedKey::Pos(index)),
            Some(_) => {}
        }
    }

    keys
}

/// Resolves an explicit `keys`/`ignore` list to the normalized form: index
/// selectors first (ascending), then name selectors (lexicographic), with
/// stable deduplication.
pub fn resolve_selectors(
    selectors: &[Selector],
    signature: &Signature,
    call: &Call,
) -> Vec<ResolvedKey> {
    let mut indexes: BTreeSet<usize> = BTreeSet::new();
    let mut names: BTreeSet<String> = BTreeSet::new();

    let add_name = |name: &str, indexes: &mut BTreeSet<usize>, names: &mut BTreeSet<String>| {
        match signature.position_of(name) {
            Some(index) => {
                indexes.insert(index);
            }
            None => {
                names.insert(name.to_string());
            }
        }
    };

    for selector in selectors {
        match selector {
            Selector::Index(index) => {
                indexes.insert(*index);
            }
            // A range slices the default selector list before deduplication.
            Selector::Range { start, stop } => {
                let defaults = default_keys(signature, call);
                let from = start.unwrap_or(0).min(defaults.len());
                let to = stop.unwrap_or(defaults.len()).min(defaults.len());
                for key in &defaults[from..to.max(from)] {
                    match key {
                        ResolvedKey::Pos(index) => {
                            indexes.insert(*index);
                        }
                        ResolvedKey::Kw(name) => {
                            names.insert(name.clone());
                        }
                    }
                }
            }
            // Passed keywords first, then declared parameters not already
            // supplied as keywords.
            Selector::Pattern(pattern) => {
                let mut matched: Vec<String> = Vec::new();
                for name in call.kwargs().keys() {
                    if pattern.is_match(name) {
                        matched.push(name.clone());
                    }
                }
                for param in signature.params() {
                    if call.kwarg_of(param).is_none() && pattern.is_match(param) {
                        matched.push(param.clone());
                    }
                }
                for name in &matched {
                    add_name(name, &mut indexes, &mut names);
                }
            }
            Selector::Name(name) => add_name(name, &mut indexes, &mut names),
        }
    }

    indexes
        .into_iter()
        .map(ResolvedKey::Pos)
        .chain(names.into_iter().map(ResolvedKey::Kw))
        .collect()
}

/// The hashable identity of one invocation: function identity, normalized
/// selector list, and the digest of every selected effective value, joined as
/// an opaque string. Reproducible across process restarts if persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The invocable-identity component (first digest). Equal to
    /// [`FunctionId::component`] of the fingerprinted function, which is how
    /// the facade matches every stored entry of one invocable.
    pub fn function_component(&self) -> &str {
        self.0.split(';').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduces a call to its [`Fingerprint`].
///
/// `keys` selects which arguments participate (default: everything that could
/// plausibly differ); `ignore` subtracts from that, preserving order. Each
/// selected argument resolves to its effective value: explicit positional,
/// then explicit keyword, then declared default, then absent.
///
/// Fails with [`CacheError::AmbiguousArgument`] when a slot is satisfied both
/// positionally and by an identically named keyword, and with
/// [`CacheError::Unhashable`] when a selected value has no stable hash. The
/// latter is never downgraded to an identity hash: that would let distinct
/// inputs share cache entries.
///
/// # Examples
///
/// ```
/// use supercache::{fingerprint, Call, FunctionId, Signature, Value};
///
/// let id = FunctionId::new("demo", "add");
/// let sig = Signature::builder()
///     .param("a")
///     .param_with_default("b", Value::from(2))
///     .build();
///
/// // Positional, keyword and default bindings all produce the same identity.
/// let positional = fingerprint(&id, &sig, &Call::new().arg(1).arg(2), None, None).unwrap();
/// let keyword = fingerprint(&id, &sig, &Call::new().arg(1).kwarg("b", 2), None, None).unwrap();
/// let defaulted = fingerprint(&id, &sig, &Call::new().arg(1), None, None).unwrap();
/// assert_eq!(positional, keyword);
/// assert_eq!(positional, defaulted);
/// ```
pub fn fingerprint(
    id: &FunctionId,
    signature: &Signature,
    call: &Call,
    keys: Option<&[Selector]>,
    ignore: Option<&[Selector]>,
) -> CacheResult<Fingerprint> {
    let mut resolved = match keys {
        None => default_keys(signature, call),
        Some(list) => resolve_selectors(list, signature, call),
    };

    if let Some(list) = ignore {
        let excluded = resolve_selectors(list, signature, call);
        resolved.retain(|key| !excluded.contains(key));
    }

    let mut parts: Vec<String> = Vec::with_capacity(resolved.len() + 2);
    parts.push(id.component());
    parts.push(digest_str(&selector_component(&resolved)));

    for key in &resolved {
        match key {
            ResolvedKey::Pos(index) => {
                let value = effective_positional(signature, call, *index)?;
                parts.push(value.digest()?);
            }
            ResolvedKey::Kw(name) => {
                // Extra tag so a positional value and an identically valued
                // extra keyword can never produce the same hash input.
                parts.push(digest_str(&format!("__{name}__")));
                let value = call
                    .kwarg_of(name)
                    .or_else(|| signature.default_of(name))
                    .cloned()
                    .unwrap_or(Value::None);
                parts.push(value.digest()?);
            }
        }
    }

    Ok(Fingerprint(parts.join(";")))
}

/// Effective value of a positional slot: supplied argument, identically named
/// keyword, declared default, or absent.
fn effective_positional(signature: &Signature, call: &Call, index: usize) -> CacheResult<Value> {
    if index < call.args().len() {
        // Supplying the same slot positionally and by keyword is a caller
        // error, exactly as it would be in a direct call.
        if let Some(param) = signature.params().get(index) {
            if call.kwarg_of(param).is_some() {
                return Err(CacheError::AmbiguousArgument(param.clone()));
            }
        }
        return Ok(call.args()[index].clone());
    }

    match signature.params().get(index) {
        Some(param) => Ok(call
            .kwarg_of(param)
            .or_else(|| signature.default_of(param))
            .cloned()
            .unwrap_or(Value::None)),
        None => Ok(Value::None),
    }
}

fn selector_component(keys: &[ResolvedKey]) -> String {
    let rendered: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
    format!("({})", rendered.join(", "))
}
