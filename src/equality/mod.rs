//! Pluggable equality and hashing strategies.
//!
//! An [Equality] decides whether two values are equal and computes a hash code consistent with
//! that decision. Strategies are plain immutable values and compose by wrapping: a
//! [ListEquality](structural::ListEquality) takes the strategy for its elements, an
//! [EqualityBy] takes the strategy for the projected key, and so on.
//!
//! ```
//! # use strategy_collections::*;
//! let s = ListEquality::new(CaseInsensitiveEquality);
//! let a = vec!["Foo".to_string(), "BAR".to_string()];
//! let b = vec!["foo".to_string(), "bar".to_string()];
//! assert!(s.equals(&a, &b));
//! assert_eq!(s.hash(&a), s.hash(&b));
//! ```
//!
//! Every strategy must be reflexive, symmetric and transitive on the values for which
//! [is_valid_key](Equality::is_valid_key) holds, and `equals(a, b)` must imply
//! `hash(a) == hash(b)`. A strategy that violates this breaks any hash table keyed by it.
use crate::error::{CollectionError, Result};
use crate::value::Value;
use fnv::FnvHasher;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use tracing::debug;

pub mod deep;
pub mod json;
pub mod structural;

pub use deep::DeepCollectionEquality;
pub use json::JsonEquality;
pub use structural::*;

/// An equality and hash strategy for values of type `T`
pub trait Equality<T: ?Sized> {
    /// whether `a` and `b` are equal according to this strategy
    fn equals(&self, a: &T, b: &T) -> bool;

    /// a hash code that is equal for all values this strategy considers equal
    fn hash(&self, value: &T) -> u64;

    /// whether `value` is in the domain of this strategy
    fn is_valid_key(&self, _value: &T) -> bool {
        true
    }

    /// like [equals](Equality::equals), but rejects values outside the domain of the strategy
    fn try_equals(&self, a: &T, b: &T) -> Result<bool> {
        if self.is_valid_key(a) && self.is_valid_key(b) {
            Ok(self.equals(a, b))
        } else {
            Err(CollectionError::invalid_argument(
                "value is not a valid key for this equality",
            ))
        }
    }

    /// like [hash](Equality::hash), but rejects values outside the domain of the strategy
    fn try_hash(&self, value: &T) -> Result<u64> {
        if self.is_valid_key(value) {
            Ok(self.hash(value))
        } else {
            Err(CollectionError::invalid_argument(
                "value is not a valid key for this equality",
            ))
        }
    }
}

impl<'a, T: ?Sized, E: Equality<T> + ?Sized> Equality<T> for &'a E {
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }
    fn hash(&self, value: &T) -> u64 {
        (**self).hash(value)
    }
    fn is_valid_key(&self, value: &T) -> bool {
        (**self).is_valid_key(value)
    }
}

impl<T: ?Sized, E: Equality<T> + ?Sized> Equality<T> for Box<E> {
    fn equals(&self, a: &T, b: &T) -> bool {
        (**self).equals(a, b)
    }
    fn hash(&self, value: &T) -> u64 {
        (**self).hash(value)
    }
    fn is_valid_key(&self, value: &T) -> bool {
        (**self).is_valid_key(value)
    }
}

// incremental step of the Jenkins one-at-a-time hash
pub(crate) fn jenkins_combine(hash: u64, value: u64) -> u64 {
    let hash = hash.wrapping_add(value);
    let hash = hash.wrapping_add(hash << 10);
    hash ^ (hash >> 6)
}

pub(crate) fn jenkins_finish(hash: u64) -> u64 {
    let hash = hash.wrapping_add(hash << 3);
    let hash = hash ^ (hash >> 11);
    hash.wrapping_add(hash << 15)
}

pub(crate) fn fnv_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FnvHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// The intrinsic `PartialEq` and `Hash` of the value type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultEquality;

impl<T: PartialEq + Hash + ?Sized> Equality<T> for DefaultEquality {
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }
    fn hash(&self, value: &T) -> u64 {
        fnv_hash(value)
    }
}

/// Equality by address. Two references are equal iff they point to the same object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityEquality;

pub(crate) fn address_of<T: ?Sized>(value: &T) -> usize {
    (value as *const T).cast::<()>() as usize
}

impl<T: ?Sized> Equality<T> for IdentityEquality {
    fn equals(&self, a: &T, b: &T) -> bool {
        std::ptr::eq(a, b)
    }
    fn hash(&self, value: &T) -> u64 {
        fnv_hash(&address_of(value))
    }
}

/// Compares values by a projected key, using an inner strategy for the keys.
///
/// ```
/// # use strategy_collections::*;
/// let by_len = EqualityBy::new(|s: &&str| s.len());
/// assert!(by_len.equals(&"abc", &"xyz"));
/// assert!(!by_len.equals(&"abc", &"xy"));
/// ```
#[derive(Clone, Copy)]
pub struct EqualityBy<F, E = DefaultEquality> {
    key_of: F,
    inner: E,
}

impl<F> EqualityBy<F> {
    pub fn new(key_of: F) -> Self {
        Self::with_inner(key_of, DefaultEquality)
    }
}

impl<F, E> EqualityBy<F, E> {
    pub fn with_inner(key_of: F, inner: E) -> Self {
        Self { key_of, inner }
    }
}

impl<F, E: Debug> Debug for EqualityBy<F, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EqualityBy")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<T: ?Sized, K, F: Fn(&T) -> K, E: Equality<K>> Equality<T> for EqualityBy<F, E> {
    fn equals(&self, a: &T, b: &T) -> bool {
        self.inner.equals(&(self.key_of)(a), &(self.key_of)(b))
    }
    fn hash(&self, value: &T) -> u64 {
        self.inner.hash(&(self.key_of)(value))
    }
    fn is_valid_key(&self, value: &T) -> bool {
        self.inner.is_valid_key(&(self.key_of)(value))
    }
}

/// Tries a list of strategies in order. The first strategy for which the left value is a valid
/// key decides.
///
/// The strategies should have disjoint domains. If they overlap the result can be asymmetric,
/// which is the caller's responsibility and not detected.
pub struct MultiEquality<T: ?Sized> {
    strategies: Vec<Box<dyn Equality<T>>>,
}

impl<T: ?Sized> MultiEquality<T> {
    pub fn new(strategies: Vec<Box<dyn Equality<T>>>) -> Self {
        Self { strategies }
    }

    /// appends a strategy with lower precedence than the existing ones
    pub fn with(mut self, strategy: impl Equality<T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    fn strategy_for(&self, value: &T) -> Option<&dyn Equality<T>> {
        let res = self
            .strategies
            .iter()
            .map(|s| &**s)
            .find(|s| s.is_valid_key(value));
        if res.is_none() {
            debug!(
                strategies = self.strategies.len(),
                "no strategy accepts value"
            );
        }
        res
    }
}

impl<T: ?Sized> Default for MultiEquality<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: ?Sized> Debug for MultiEquality<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiEquality")
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

impl<T: ?Sized> Equality<T> for MultiEquality<T> {
    fn equals(&self, a: &T, b: &T) -> bool {
        match self.strategy_for(a) {
            Some(s) => s.is_valid_key(b) && s.equals(a, b),
            None => false,
        }
    }
    fn hash(&self, value: &T) -> u64 {
        self.strategy_for(value).map(|s| s.hash(value)).unwrap_or(0)
    }
    fn is_valid_key(&self, value: &T) -> bool {
        self.strategies.iter().any(|s| s.is_valid_key(value))
    }
}

/// ASCII case insensitive string equality. Non-ASCII characters are compared as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseInsensitiveEquality;

impl CaseInsensitiveEquality {
    fn hash_str(text: &str) -> u64 {
        let hash = text
            .bytes()
            .fold(0, |hash, b| jenkins_combine(hash, b.to_ascii_lowercase() as u64));
        jenkins_finish(hash)
    }
}

impl Equality<str> for CaseInsensitiveEquality {
    fn equals(&self, a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
    }
    fn hash(&self, value: &str) -> u64 {
        Self::hash_str(value)
    }
}

impl Equality<String> for CaseInsensitiveEquality {
    fn equals(&self, a: &String, b: &String) -> bool {
        a.eq_ignore_ascii_case(b)
    }
    fn hash(&self, value: &String) -> u64 {
        Self::hash_str(value)
    }
}

impl Equality<Value> for CaseInsensitiveEquality {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        match (a.as_str(), b.as_str()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
    fn hash(&self, value: &Value) -> u64 {
        value.as_str().map(Self::hash_str).unwrap_or(0)
    }
    fn is_valid_key(&self, value: &Value) -> bool {
        value.as_str().is_some()
    }
}

/// Makes a strategy usable as the key of a std hash table.
///
/// ```
/// # use strategy_collections::*;
/// # use std::collections::HashSet;
/// let words = ["Apple", "APPLE", "pear"];
/// let unique: HashSet<_> = words
///     .iter()
///     .map(|w| EqualityKey::new(*w, &CaseInsensitiveEquality))
///     .collect();
/// assert_eq!(unique.len(), 2);
/// ```
pub struct EqualityKey<'a, T: ?Sized, E: ?Sized> {
    value: &'a T,
    strategy: &'a E,
}

impl<'a, T: ?Sized, E: ?Sized> EqualityKey<'a, T, E> {
    pub fn new(value: &'a T, strategy: &'a E) -> Self {
        Self { value, strategy }
    }

    pub fn value(&self) -> &'a T {
        self.value
    }
}

impl<'a, T: ?Sized, E: ?Sized> Clone for EqualityKey<'a, T, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: ?Sized, E: ?Sized> Copy for EqualityKey<'a, T, E> {}

impl<'a, T: Debug + ?Sized, E: ?Sized> Debug for EqualityKey<'a, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(f)
    }
}

impl<'a, T: ?Sized, E: Equality<T> + ?Sized> Hash for EqualityKey<'a, T, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.strategy.hash(self.value))
    }
}

impl<'a, T: ?Sized, E: Equality<T> + ?Sized> PartialEq for EqualityKey<'a, T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.strategy.equals(self.value, other.value)
    }
}

impl<'a, T: ?Sized, E: Equality<T> + ?Sized> Eq for EqualityKey<'a, T, E> {}
