//! Ordering functions shared by the priority queue and the sort/search routines.
//!
//! A [Comparator] is anything that can put two values of the same type in order. Plain closures
//! `Fn(&T, &T) -> Ordering` are comparators, so most call sites never name a type from this module.
use std::cmp::Ordering;
use std::fmt::Debug;

/// A total preorder over `T`.
///
/// `Less` means the first argument comes first. Two values that compare `Equal` are considered
/// the same element by the priority queue's `remove` and `contains`.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F: Fn(&T, &T) -> Ordering> Comparator<T> for F {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// The natural order given by `Ord`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another comparator, e.g. to turn the min-queue into a max-queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverseOrder<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for ReverseOrder<C> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Orders values by the natural order of a projected key
#[derive(Clone, Copy)]
pub struct CompareByKey<F>(F);

impl<F> CompareByKey<F> {
    pub fn new(key_of: F) -> Self {
        Self(key_of)
    }
}

impl<F> Debug for CompareByKey<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CompareByKey")
    }
}

impl<T: ?Sized, K: Ord, F: Fn(&T) -> K> Comparator<T> for CompareByKey<F> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}
