//! Recursive equality over nested [Value] containers.
//!
//! # Container kinds
//!
//! A list is only ever equal to a list, a sequence to a sequence, a set to a set and a map to a
//! map. Everything that is not a container is compared with the base strategy.
//!
//! # Ordered and unordered mode
//!
//! In ordered mode lists and sequences are compared element by element. In unordered mode they
//! are compared as multisets. Sets and maps are order independent in both modes, and use their
//! own native lookup to pair up elements and keys, see [SetEquality](super::SetEquality).
//!
//! # Memoization
//!
//! Unordered comparison builds a hash multiset per container, which hashes and compares every
//! nested container again at every level. Without memoization this is exponential in the nesting
//! depth. Therefore the unordered mode remembers, for the duration of one top level `equals` or
//! `hash` call, the result of every pair comparison and every hash, keyed by the address of the
//! values involved. The memo lives on the stack of the top level call and is passed down by
//! reference. It is dropped when the top level call returns, so separate calls never see each
//! other's entries and one strategy instance can be shared between threads.
//!
//! Ordered mode has no combinatorial blowup and does not build a memo.
use super::structural::{
    IterableEquality, ListEquality, MapEquality, SetEquality, UnorderedIterableEquality,
};
use super::{address_of, DefaultEquality, Equality};
use crate::value::Value;
use fnv::FnvHashMap;
use std::cell::RefCell;
use tracing::trace;

/// Deep structural equality of [Value] trees.
///
/// ```
/// # use strategy_collections::*;
/// let a = list![map! {"x" => list![1, 2, 3]}];
/// let b = list![map! {"x" => list![3, 2, 1]}];
/// assert!(!DeepCollectionEquality::new().equals(&a, &b));
/// assert!(DeepCollectionEquality::unordered().equals(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepCollectionEquality<E = DefaultEquality> {
    base: E,
    unordered: bool,
}

impl DeepCollectionEquality {
    /// ordered deep equality with the native equality for leaves
    pub fn new() -> Self {
        Self::with_base(DefaultEquality)
    }

    /// unordered deep equality with the native equality for leaves
    pub fn unordered() -> Self {
        Self::unordered_with_base(DefaultEquality)
    }
}

impl<E> DeepCollectionEquality<E> {
    pub fn with_base(base: E) -> Self {
        Self {
            base,
            unordered: false,
        }
    }

    pub fn unordered_with_base(base: E) -> Self {
        Self {
            base,
            unordered: true,
        }
    }

    pub fn is_unordered(&self) -> bool {
        self.unordered
    }

    pub fn base(&self) -> &E {
        &self.base
    }

    fn scope<'a>(&'a self, cache: Option<&'a RecursionCache>) -> Scope<'a, E> {
        Scope {
            engine: self,
            cache,
        }
    }
}

impl<E: Equality<Value>> Equality<Value> for DeepCollectionEquality<E> {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        if self.unordered {
            let cache = RecursionCache::new();
            self.scope(Some(&cache)).equals(a, b)
        } else {
            self.scope(None).equals(a, b)
        }
    }

    fn hash(&self, value: &Value) -> u64 {
        if self.unordered {
            let cache = RecursionCache::new();
            self.scope(Some(&cache)).hash(value)
        } else {
            self.scope(None).hash(value)
        }
    }

    fn is_valid_key(&self, value: &Value) -> bool {
        value.is_container() || self.base.is_valid_key(value)
    }
}

/// Memo of one top level call, keyed by the addresses of the values
struct RecursionCache {
    equals: RefCell<FnvHashMap<usize, FnvHashMap<usize, bool>>>,
    hashes: RefCell<FnvHashMap<usize, u64>>,
}

impl RecursionCache {
    fn new() -> Self {
        trace!("deep equality cache created");
        Self {
            equals: RefCell::new(FnvHashMap::default()),
            hashes: RefCell::new(FnvHashMap::default()),
        }
    }

    fn get_equals(&self, a: &Value, b: &Value) -> Option<bool> {
        let equals = self.equals.borrow();
        equals
            .get(&address_of(a))
            .and_then(|row| row.get(&address_of(b)))
            .copied()
    }

    fn put_equals(&self, a: &Value, b: &Value, result: bool) {
        self.equals
            .borrow_mut()
            .entry(address_of(a))
            .or_default()
            .insert(address_of(b), result);
    }

    fn get_hash(&self, value: &Value) -> Option<u64> {
        self.hashes.borrow().get(&address_of(value)).copied()
    }

    fn put_hash(&self, value: &Value, hash: u64) {
        self.hashes.borrow_mut().insert(address_of(value), hash);
    }
}

impl Drop for RecursionCache {
    fn drop(&mut self) {
        let pairs: usize = self.equals.get_mut().values().map(|row| row.len()).sum();
        trace!(
            pairs,
            hashes = self.hashes.get_mut().len(),
            "deep equality cache torn down"
        );
    }
}

/// The engine as seen from inside one top level call
struct Scope<'a, E> {
    engine: &'a DeepCollectionEquality<E>,
    cache: Option<&'a RecursionCache>,
}

impl<'a, E> Clone for Scope<'a, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, E> Copy for Scope<'a, E> {}

impl<'a, E: Equality<Value>> Scope<'a, E> {
    fn equals_uncached(self, a: &Value, b: &Value) -> bool {
        let unordered = self.engine.unordered;
        match (a, b) {
            (Value::Set(a), Value::Set(b)) => SetEquality::new(self).equals(a, b),
            (Value::Map(a), Value::Map(b)) => MapEquality::new(self, self).equals(a, b),
            (Value::List(a), Value::List(b)) if unordered => {
                UnorderedIterableEquality::new(self).equals(a, b)
            }
            (Value::List(a), Value::List(b)) => ListEquality::new(self).equals(a, b),
            (Value::Seq(a), Value::Seq(b)) if unordered => {
                UnorderedIterableEquality::new(self).equals(a, b)
            }
            (Value::Seq(a), Value::Seq(b)) => IterableEquality::new(self).equals(a, b),
            _ if a.is_container() || b.is_container() => false,
            _ => self.engine.base.equals(a, b),
        }
    }

    fn hash_uncached(self, value: &Value) -> u64 {
        let unordered = self.engine.unordered;
        match value {
            Value::Set(xs) => SetEquality::new(self).hash(xs),
            Value::Map(m) => MapEquality::new(self, self).hash(m),
            Value::List(xs) if unordered => UnorderedIterableEquality::new(self).hash(xs),
            Value::List(xs) => ListEquality::new(self).hash(xs),
            Value::Seq(xs) if unordered => UnorderedIterableEquality::new(self).hash(xs),
            Value::Seq(xs) => IterableEquality::new(self).hash(xs),
            _ => self.engine.base.hash(value),
        }
    }
}

impl<'a, E: Equality<Value>> Equality<Value> for Scope<'a, E> {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        match self.cache {
            Some(cache) => {
                if let Some(result) = cache.get_equals(a, b) {
                    return result;
                }
                let result = self.equals_uncached(a, b);
                cache.put_equals(a, b, result);
                result
            }
            None => self.equals_uncached(a, b),
        }
    }

    fn hash(&self, value: &Value) -> u64 {
        match self.cache {
            Some(cache) => {
                if let Some(hash) = cache.get_hash(value) {
                    return hash;
                }
                let hash = self.hash_uncached(value);
                cache.put_hash(value, hash);
                hash
            }
            None => self.hash_uncached(value),
        }
    }

    fn is_valid_key(&self, value: &Value) -> bool {
        self.engine.is_valid_key(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equality::CaseInsensitiveEquality;
    use std::cell::Cell;

    #[test]
    fn container_kinds_never_cross_compare() {
        let list = list![1, 2];
        let set = set![1, 2];
        let seq = seq![1, 2];
        for eq in &[DeepCollectionEquality::new(), DeepCollectionEquality::unordered()] {
            assert!(!eq.equals(&list, &set));
            assert!(!eq.equals(&set, &list));
            assert!(!eq.equals(&list, &seq));
            assert!(!eq.equals(&seq, &list));
            assert!(!eq.equals(&list, &Value::from(1)));
            assert!(eq.equals(&list, &list![1, 2]));
            assert!(eq.equals(&seq, &seq![1, 2]));
        }
    }

    #[test]
    fn nested_ordered_vs_unordered() {
        let a = list![map! {"x" => list![1, 2, 3]}];
        let b = list![map! {"x" => list![3, 2, 1]}];
        let ordered = DeepCollectionEquality::new();
        let unordered = DeepCollectionEquality::unordered();
        assert!(!ordered.equals(&a, &b));
        assert!(unordered.equals(&a, &b));
        assert_eq!(unordered.hash(&a), unordered.hash(&b));
    }

    #[test]
    fn unordered_respects_multiplicity() {
        let eq = DeepCollectionEquality::unordered();
        assert!(eq.equals(&list![1, 1, 2], &list![2, 1, 1]));
        assert!(!eq.equals(&list![1, 1, 2], &list![2, 2, 1]));
        assert!(eq.equals(&seq![list![1, 2], list![3]], &seq![list![3], list![2, 1]]));
    }

    #[test]
    fn maps_recurse_into_values() {
        let eq = DeepCollectionEquality::new();
        let a = map! {"a" => list![1, list![2]], "b" => Value::Null};
        let b = map! {"b" => Value::Null, "a" => list![1, list![2]]};
        let c = map! {"a" => list![1, list![3]], "b" => Value::Null};
        assert!(eq.equals(&a, &b));
        assert_eq!(eq.hash(&a), eq.hash(&b));
        assert!(!eq.equals(&a, &c));
    }

    #[test]
    fn base_strategy_for_leaves() {
        let eq = DeepCollectionEquality::with_base(CaseInsensitiveEquality);
        let a = list!["Foo", map! {"k" => "BAR"}];
        let b = list!["fOO", map! {"k" => "bar"}];
        assert!(eq.equals(&a, &b));
        assert_eq!(eq.hash(&a), eq.hash(&b));
        // map keys are paired by the map's own lookup, so they must match natively
        assert!(!eq.equals(&map! {"K" => 1}, &map! {"k" => 1}));
        // numbers are outside the domain of the base
        assert!(!eq.is_valid_key(&Value::from(1)));
        assert!(eq.is_valid_key(&list![1]));
    }

    #[test]
    fn set_elements_use_native_lookup() {
        // [1, 2] and [2, 1] are equal in unordered mode, but the set lookup does not find them
        let eq = DeepCollectionEquality::unordered();
        assert!(eq.equals(&list![1, 2], &list![2, 1]));
        assert!(!eq.equals(&set![list![1, 2]], &set![list![2, 1]]));
        assert!(eq.equals(&set![list![1, 2], 3], &set![3, list![1, 2]]));
    }

    struct CountingEquality<'a> {
        hashes: &'a Cell<usize>,
    }

    impl<'a> Equality<Value> for CountingEquality<'a> {
        fn equals(&self, a: &Value, b: &Value) -> bool {
            a == b
        }
        fn hash(&self, value: &Value) -> u64 {
            self.hashes.set(self.hashes.get() + 1);
            DefaultEquality.hash(value)
        }
    }

    #[test]
    fn unordered_memoizes_within_one_call() {
        let hashes = Cell::new(0);
        let eq = DeepCollectionEquality::unordered_with_base(CountingEquality { hashes: &hashes });
        let a = list![list![list![1, 2], list![3, 4]], list![list![5, 6], list![7, 8]]];
        let b = list![list![list![8, 7], list![6, 5]], list![list![4, 3], list![2, 1]]];
        assert!(eq.equals(&a, &b));
        // every leaf object is hashed at most once
        let first = hashes.get();
        assert!(first > 0 && first <= 16, "{} leaf hashes", first);
        // the memo is gone after the call, so a second call does the same work again
        assert!(eq.equals(&a, &b));
        assert_eq!(hashes.get(), 2 * first);
    }

    #[test]
    fn ordered_mode_does_not_memoize() {
        let hashes = Cell::new(0);
        let eq = DeepCollectionEquality::with_base(CountingEquality { hashes: &hashes });
        let a = list![1, 2, 3];
        eq.hash(&a);
        eq.hash(&a);
        assert_eq!(hashes.get(), 6);
    }

    mod laws_ordered {
        use super::*;
        equality_laws!(DeepCollectionEquality::new(), Value);
    }

    mod laws_unordered {
        use super::*;
        equality_laws!(DeepCollectionEquality::unordered(), Value);

        #[quickcheck]
        fn reversed_lists_are_equal(xs: Vec<Value>) -> bool {
            let eq = DeepCollectionEquality::unordered();
            let a = Value::List(xs.clone());
            let b = Value::List(xs.into_iter().rev().collect());
            eq.equals(&a, &b) && eq.hash(&a) == eq.hash(&b)
        }
    }
}
