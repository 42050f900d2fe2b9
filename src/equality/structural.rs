//! Equality strategies for sequences, sets and maps, parameterized by the strategy of their parts.
use super::{jenkins_combine, jenkins_finish, DefaultEquality, Equality, EqualityKey};
use fnv::FnvHashMap;
use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

pub(crate) fn ordered_hash(hashes: impl Iterator<Item = u64>) -> u64 {
    jenkins_finish(hashes.fold(0, jenkins_combine))
}

pub(crate) fn unordered_hash(hashes: impl Iterator<Item = u64>) -> u64 {
    jenkins_finish(hashes.fold(0, u64::wrapping_add))
}

/// Equality of sequences that are traversed in parallel.
///
/// The length is never queried up front, so this works for any iterator. Two sequences are equal
/// if they end at the same time and all pairs of elements are equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct IterableEquality<E = DefaultEquality> {
    element: E,
}

impl<E> IterableEquality<E> {
    pub fn new(element: E) -> Self {
        Self { element }
    }

    pub fn equals_iter<'a, T: 'a, I, J>(&self, a: I, b: J) -> bool
    where
        E: Equality<T>,
        I: IntoIterator<Item = &'a T>,
        J: IntoIterator<Item = &'a T>,
    {
        let mut a = a.into_iter();
        let mut b = b.into_iter();
        loop {
            match (a.next(), b.next()) {
                (Some(x), Some(y)) => {
                    if !self.element.equals(x, y) {
                        return false;
                    }
                }
                (None, None) => return true,
                _ => return false,
            }
        }
    }

    pub fn hash_iter<'a, T: 'a, I>(&self, elements: I) -> u64
    where
        E: Equality<T>,
        I: IntoIterator<Item = &'a T>,
    {
        ordered_hash(elements.into_iter().map(|x| self.element.hash(x)))
    }
}

impl<T, E: Equality<T>> Equality<[T]> for IterableEquality<E> {
    fn equals(&self, a: &[T], b: &[T]) -> bool {
        std::ptr::eq(a, b) || self.equals_iter(a, b)
    }
    fn hash(&self, value: &[T]) -> u64 {
        self.hash_iter(value)
    }
}

impl<T, E: Equality<T>> Equality<Vec<T>> for IterableEquality<E> {
    fn equals(&self, a: &Vec<T>, b: &Vec<T>) -> bool {
        Equality::<[T]>::equals(self, a, b)
    }
    fn hash(&self, value: &Vec<T>) -> u64 {
        self.hash_iter(value)
    }
}

impl<T, E: Equality<T>> Equality<VecDeque<T>> for IterableEquality<E> {
    fn equals(&self, a: &VecDeque<T>, b: &VecDeque<T>) -> bool {
        std::ptr::eq(a, b) || self.equals_iter(a, b)
    }
    fn hash(&self, value: &VecDeque<T>) -> u64 {
        self.hash_iter(value)
    }
}

/// Equality of lists, element by element in order.
///
/// Gives the same results and hashes as [IterableEquality], but compares lengths first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListEquality<E = DefaultEquality> {
    element: E,
}

impl<E> ListEquality<E> {
    pub fn new(element: E) -> Self {
        Self { element }
    }
}

impl<T, E: Equality<T>> Equality<[T]> for ListEquality<E> {
    fn equals(&self, a: &[T], b: &[T]) -> bool {
        if std::ptr::eq(a, b) {
            return true;
        }
        a.len() == b.len()
            && a
                .iter()
                .zip(b.iter())
                .all(|(x, y)| self.element.equals(x, y))
    }
    fn hash(&self, value: &[T]) -> u64 {
        ordered_hash(value.iter().map(|x| self.element.hash(x)))
    }
}

impl<T, E: Equality<T>> Equality<Vec<T>> for ListEquality<E> {
    fn equals(&self, a: &Vec<T>, b: &Vec<T>) -> bool {
        Equality::<[T]>::equals(self, a, b)
    }
    fn hash(&self, value: &Vec<T>) -> u64 {
        Equality::<[T]>::hash(self, value)
    }
}

/// Equality of sequences as multisets: the order of elements is ignored, but their number is not.
///
/// Occurrences of the first sequence are tallied in a hash table keyed by the element strategy,
/// then counted down while scanning the second.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnorderedIterableEquality<E = DefaultEquality> {
    element: E,
}

impl<E> UnorderedIterableEquality<E> {
    pub fn new(element: E) -> Self {
        Self { element }
    }

    pub fn equals_iter<'a, T: 'a, I, J>(&'a self, a: I, b: J) -> bool
    where
        E: Equality<T>,
        I: IntoIterator<Item = &'a T>,
        J: IntoIterator<Item = &'a T>,
    {
        let mut counts: FnvHashMap<EqualityKey<'a, T, E>, usize> = FnvHashMap::default();
        let mut remaining = 0usize;
        for x in a {
            *counts.entry(EqualityKey::new(x, &self.element)).or_insert(0) += 1;
            remaining += 1;
        }
        for y in b {
            match counts.get_mut(&EqualityKey::new(y, &self.element)) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    remaining -= 1;
                }
                _ => return false,
            }
        }
        remaining == 0
    }

    pub fn hash_iter<'a, T: 'a, I>(&self, elements: I) -> u64
    where
        E: Equality<T>,
        I: IntoIterator<Item = &'a T>,
    {
        unordered_hash(elements.into_iter().map(|x| self.element.hash(x)))
    }
}

impl<T, E: Equality<T>> Equality<[T]> for UnorderedIterableEquality<E> {
    fn equals(&self, a: &[T], b: &[T]) -> bool {
        std::ptr::eq(a, b) || (a.len() == b.len() && self.equals_iter(a, b))
    }
    fn hash(&self, value: &[T]) -> u64 {
        self.hash_iter(value)
    }
}

impl<T, E: Equality<T>> Equality<Vec<T>> for UnorderedIterableEquality<E> {
    fn equals(&self, a: &Vec<T>, b: &Vec<T>) -> bool {
        Equality::<[T]>::equals(self, a, b)
    }
    fn hash(&self, value: &Vec<T>) -> u64 {
        self.hash_iter(value)
    }
}

impl<T, E: Equality<T>> Equality<VecDeque<T>> for UnorderedIterableEquality<E> {
    fn equals(&self, a: &VecDeque<T>, b: &VecDeque<T>) -> bool {
        std::ptr::eq(a, b) || (a.len() == b.len() && self.equals_iter(a, b))
    }
    fn hash(&self, value: &VecDeque<T>) -> u64 {
        self.hash_iter(value)
    }
}

/// A set that can look up its own stored element for a probe value
pub trait SetLike {
    type Item;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn elements(&self) -> Box<dyn Iterator<Item = &Self::Item> + '_>;
    /// the stored element that this set considers equal to `value`
    fn get(&self, value: &Self::Item) -> Option<&Self::Item>;
}

impl<T: Eq + Hash, S: BuildHasher> SetLike for HashSet<T, S> {
    type Item = T;
    fn len(&self) -> usize {
        HashSet::len(self)
    }
    fn elements(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }
    fn get(&self, value: &T) -> Option<&T> {
        HashSet::get(self, value)
    }
}

impl<T: Ord> SetLike for BTreeSet<T> {
    type Item = T;
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }
    fn elements(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }
    fn get(&self, value: &T) -> Option<&T> {
        BTreeSet::get(self, value)
    }
}

impl<T: Eq + Hash, S: BuildHasher> SetLike for IndexSet<T, S> {
    type Item = T;
    fn len(&self) -> usize {
        IndexSet::len(self)
    }
    fn elements(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.iter())
    }
    fn get(&self, value: &T) -> Option<&T> {
        IndexSet::get(self, value)
    }
}

/// Equality of sets.
///
/// Two sets are equal if they have the same size and, for every element `x` of the first set,
/// the second set's own lookup finds an element `y` with `element.equals(x, y)`.
///
/// The lookup uses the set's native equality, not the element strategy. If the two disagree the
/// result can be asymmetric. That is a caller error and is not detected:
///
/// ```
/// # use strategy_collections::*;
/// # use std::collections::BTreeSet;
/// let a: BTreeSet<String> = ["A".to_string()].iter().cloned().collect();
/// let b: BTreeSet<String> = ["a".to_string()].iter().cloned().collect();
/// // the lookup of "A" in b fails before the case insensitive strategy is consulted
/// assert!(!SetEquality::new(CaseInsensitiveEquality).equals(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SetEquality<E = DefaultEquality> {
    element: E,
}

impl<E> SetEquality<E> {
    pub fn new(element: E) -> Self {
        Self { element }
    }
}

impl<S: SetLike, E: Equality<S::Item>> Equality<S> for SetEquality<E> {
    fn equals(&self, a: &S, b: &S) -> bool {
        if std::ptr::eq(a, b) {
            return true;
        }
        a.len() == b.len()
            && a.elements().all(|x| match b.get(x) {
                Some(y) => self.element.equals(x, y),
                None => false,
            })
    }
    fn hash(&self, value: &S) -> u64 {
        unordered_hash(value.elements().map(|x| self.element.hash(x)))
    }
}

/// A map that can look up its own stored entry for a probe key
pub trait MapLike {
    type Key;
    type Value;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn entries(&self) -> Box<dyn Iterator<Item = (&Self::Key, &Self::Value)> + '_>;
    fn get_key_value(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)>;
}

impl<K: Eq + Hash, V, S: BuildHasher> MapLike for HashMap<K, V, S> {
    type Key = K;
    type Value = V;
    fn len(&self) -> usize {
        HashMap::len(self)
    }
    fn entries(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
    fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        HashMap::get_key_value(self, key)
    }
}

impl<K: Ord, V> MapLike for BTreeMap<K, V> {
    type Key = K;
    type Value = V;
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
    fn entries(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
    fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        BTreeMap::get_key_value(self, key)
    }
}

impl<K: Eq + Hash, V, S: BuildHasher> MapLike for IndexMap<K, V, S> {
    type Key = K;
    type Value = V;
    fn len(&self) -> usize {
        IndexMap::len(self)
    }
    fn entries(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
    fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        IndexMap::get_key_value(self, key)
    }
}

/// Equality of maps.
///
/// Two maps are equal if they have the same number of entries and every key of the first map is
/// found by the second map's own lookup, with keys and values equal under the respective strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapEquality<K = DefaultEquality, V = DefaultEquality> {
    keys: K,
    values: V,
}

impl<K, V> MapEquality<K, V> {
    pub fn new(keys: K, values: V) -> Self {
        Self { keys, values }
    }
}

impl<M, K, V> Equality<M> for MapEquality<K, V>
where
    M: MapLike,
    K: Equality<M::Key>,
    V: Equality<M::Value>,
{
    fn equals(&self, a: &M, b: &M) -> bool {
        if std::ptr::eq(a, b) {
            return true;
        }
        a.len() == b.len()
            && a.entries().all(|(ak, av)| match b.get_key_value(ak) {
                Some((bk, bv)) => self.keys.equals(ak, bk) && self.values.equals(av, bv),
                None => false,
            })
    }
    fn hash(&self, value: &M) -> u64 {
        unordered_hash(value.entries().map(|(k, v)| {
            self.keys
                .hash(k)
                .wrapping_mul(3)
                .wrapping_add(self.values.hash(v).wrapping_mul(7))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equality::{CaseInsensitiveEquality, IdentityEquality};
    use std::collections::{BTreeMap, HashMap, HashSet};

    #[test]
    fn list_vs_unordered() {
        let a = vec![1, 2, 3];
        let b = vec![3, 1, 2];
        assert!(UnorderedIterableEquality::<DefaultEquality>::default().equals(&a, &b));
        assert!(!ListEquality::<DefaultEquality>::default().equals(&a, &b));
        assert!(!IterableEquality::<DefaultEquality>::default().equals(&a, &b));
    }

    #[test]
    fn unordered_counts_occurrences() {
        let s = UnorderedIterableEquality::new(DefaultEquality);
        assert!(s.equals(&vec![1, 1, 2], &vec![1, 2, 1]));
        assert!(!s.equals(&vec![1, 1, 2], &vec![1, 2, 2]));
        assert!(!s.equals(&vec![1, 2], &vec![1, 2, 2]));
        assert!(!s.equals(&vec![1, 2, 2], &vec![1, 2]));
        assert_eq!(s.hash(&vec![1, 2, 3]), s.hash(&vec![3, 2, 1]));
    }

    #[test]
    fn iterable_detects_length_by_traversal() {
        let s = IterableEquality::new(DefaultEquality);
        assert!(s.equals_iter(&[1, 2, 3], (1..=3).collect::<Vec<_>>().iter()));
        assert!(!s.equals_iter([1, 2].iter(), [1, 2, 3].iter()));
        assert!(!s.equals_iter([1, 2, 3].iter(), [1, 2].iter()));
        let a: VecDeque<i32> = (0..5).collect();
        let b: VecDeque<i32> = (0..5).collect();
        assert!(s.equals(&a, &b));
        assert_eq!(s.hash(&a), s.hash(&b));
    }

    #[test]
    fn list_and_iterable_agree() {
        let l = ListEquality::new(DefaultEquality);
        let i = IterableEquality::new(DefaultEquality);
        let a = vec![5, 6, 7];
        assert_eq!(l.hash(&a), i.hash(&a));
        assert_ne!(l.hash(&a), l.hash(&vec![7, 6, 5]));
    }

    #[test]
    fn element_strategy_is_used() {
        let s = ListEquality::new(CaseInsensitiveEquality);
        let a = vec!["Foo".to_string()];
        let b = vec!["fOO".to_string()];
        assert!(s.equals(&a, &b));
        assert_eq!(s.hash(&a), s.hash(&b));

        let u = UnorderedIterableEquality::new(CaseInsensitiveEquality);
        let c = vec!["A".to_string(), "b".to_string(), "a".to_string()];
        let d = vec!["B".to_string(), "a".to_string(), "A".to_string()];
        assert!(u.equals(&c, &d));
    }

    #[test]
    fn identity_elements() {
        let xs = vec![String::from("x"), String::from("x")];
        let a: Vec<&String> = vec![&xs[0], &xs[1]];
        let b: Vec<&String> = vec![&xs[1], &xs[0]];
        // compare the referenced objects by address
        let s = UnorderedIterableEquality::new(EqualityByRef);
        assert!(s.equals(&a, &b));
        assert!(!s.equals(&a, &vec![&xs[0], &xs[0]]));
    }

    // identity of the referent, not of the reference slot
    struct EqualityByRef;

    impl<'a> Equality<&'a String> for EqualityByRef {
        fn equals(&self, a: &&'a String, b: &&'a String) -> bool {
            IdentityEquality.equals(*a, *b)
        }
        fn hash(&self, value: &&'a String) -> u64 {
            IdentityEquality.hash(*value)
        }
    }

    #[test]
    fn sets() {
        let s = SetEquality::new(DefaultEquality);
        let a: HashSet<i32> = hashset! {1, 2, 3};
        let b: HashSet<i32> = hashset! {3, 2, 1};
        let c: HashSet<i32> = hashset! {1, 2};
        assert!(s.equals(&a, &b));
        assert!(!s.equals(&a, &c));
        assert_eq!(s.hash(&a), s.hash(&b));
        let d: BTreeSet<i32> = btreeset! {1, 2, 3};
        let e: BTreeSet<i32> = btreeset! {1, 2, 4};
        assert!(!s.equals(&d, &e));
        // same elements give the same hash regardless of the set implementation
        assert_eq!(s.hash(&a), s.hash(&d));
    }

    #[test]
    fn set_lookup_uses_native_equality() {
        // "a" and "A" are distinct for the sets, "x" is shared
        let s = SetEquality::new(CaseInsensitiveEquality);
        let a: BTreeSet<String> = btreeset! {"a".to_string(), "x".to_string()};
        let b: BTreeSet<String> = btreeset! {"A".to_string(), "x".to_string()};
        assert!(!s.equals(&a, &b));
        assert!(!s.equals(&b, &a));
        // the multiset view of the same elements consults the strategy only
        let u = UnorderedIterableEquality::new(CaseInsensitiveEquality);
        let av: Vec<String> = a.iter().cloned().collect();
        let bv: Vec<String> = b.iter().cloned().collect();
        assert!(u.equals(&av, &bv));
        let same: BTreeSet<String> = btreeset! {"x".to_string(), "a".to_string()};
        assert!(s.equals(&a, &same));
    }

    #[test]
    fn maps() {
        let s = MapEquality::new(DefaultEquality, DefaultEquality);
        let a: HashMap<&str, i32> = hashmap! {"a" => 1, "b" => 2};
        let b: HashMap<&str, i32> = hashmap! {"b" => 2, "a" => 1};
        let c: HashMap<&str, i32> = hashmap! {"a" => 1, "b" => 3};
        let d: HashMap<&str, i32> = hashmap! {"a" => 1, "c" => 2};
        assert!(s.equals(&a, &b));
        assert!(!s.equals(&a, &c));
        assert!(!s.equals(&a, &d));
        assert_eq!(s.hash(&a), s.hash(&b));
        // swapping keys and values must not collide
        let e: BTreeMap<i32, i32> = btreemap! {1 => 2};
        let f: BTreeMap<i32, i32> = btreemap! {2 => 1};
        assert_ne!(s.hash(&e), s.hash(&f));
    }

    #[test]
    fn map_value_strategy() {
        let s = MapEquality::new(DefaultEquality, CaseInsensitiveEquality);
        let a: BTreeMap<i32, String> = btreemap! {1 => "X".to_string()};
        let b: BTreeMap<i32, String> = btreemap! {1 => "x".to_string()};
        assert!(s.equals(&a, &b));
        assert_eq!(s.hash(&a), s.hash(&b));
    }

    mod laws_list {
        use super::*;
        equality_laws!(ListEquality::new(DefaultEquality), Vec<u8>);
    }

    mod laws_unordered {
        use super::*;
        equality_laws!(UnorderedIterableEquality::new(DefaultEquality), Vec<u8>);

        #[quickcheck]
        fn permutation_is_equal(a: Vec<u8>, seed: u64) -> bool {
            use rand::{seq::SliceRandom, SeedableRng};
            let mut b = a.clone();
            b.shuffle(&mut rand::rngs::StdRng::seed_from_u64(seed));
            let s = UnorderedIterableEquality::new(DefaultEquality);
            s.equals(&a, &b) && s.hash(&a) == s.hash(&b)
        }
    }

    mod laws_map {
        use super::*;
        equality_laws!(
            MapEquality::new(DefaultEquality, DefaultEquality),
            BTreeMap<u8, u8>
        );
    }
}
