//! # About
//!
//! A priority queue backed by a binary heap in a growable array.
//!
//! ```
//! # use strategy_collections::*;
//! let mut queue = PriorityQueue::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
//! queue.add_all(vec!["ccc", "a", "bb"]);
//! assert_eq!(queue.first(), Ok(&"a"));
//! assert!(queue.remove(&"xx"));
//! assert_eq!(queue.to_list(), vec!["a", "ccc"]);
//! ```
//!
//! The order of elements is given by a [Comparator]. The first element is the one that compares
//! least, so with the natural order this is a min-queue. Use [ReverseOrder] for a max-queue.
//!
//! The queue is a multiset. Elements that compare equal are all kept. The comparator is also the
//! only notion of identity the queue has: `remove` and `contains` look for an element that
//! compares `Equal`, not for one that is `==`.
//!
//! Elements with equal priority come out in an unspecified order. In particular the order is not
//! stable with respect to insertion.
//!
//! # Complexity
//!
//! |operation         | complexity | remark
//! |------------------|------------|--------
//! |add               | O(log(N))  | sift up
//! |add_all           | O(M log(N+M)) or O(N+M) | heapify when the batch is larger than the queue
//! |first             | 1          |
//! |remove_first      | O(log(N))  | sift down
//! |remove            | O(N)       | linear scan, then sift up or down
//! |contains          | O(N)       | linear scan
//! |remove_all        | O(N)       | unordered
//! |to_list           | O(N log(N))| drains a copy of the heap
//!
//! # Panics
//!
//! A comparator that panics in the middle of a sift leaves the heap in an unspecified, but memory
//! safe, state. Such a queue should be discarded.
use crate::comparator::{Comparator, NaturalOrder};
use crate::error::{CollectionError, Result};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::iter::FromIterator;
use tracing::trace;

#[cfg(test)]
use crate::comparator::ReverseOrder;

type Heap<T> = SmallVec<[T; 4]>;

#[derive(Clone)]
pub struct PriorityQueue<T, C = NaturalOrder> {
    heap: Heap<T>,
    comparator: C,
}

fn sift_up<T, C: Comparator<T>>(heap: &mut [T], mut i: usize, comparator: &C) -> usize {
    while i > 0 {
        let parent = (i - 1) / 2;
        if comparator.compare(&heap[i], &heap[parent]) == Ordering::Less {
            heap.swap(i, parent);
            i = parent;
        } else {
            break;
        }
    }
    i
}

fn sift_down<T, C: Comparator<T>>(heap: &mut [T], mut i: usize, comparator: &C) {
    let len = heap.len();
    loop {
        let left = 2 * i + 1;
        if left >= len {
            break;
        }
        let right = left + 1;
        // the child with the higher priority
        let child = if right < len && comparator.compare(&heap[right], &heap[left]) == Ordering::Less
        {
            right
        } else {
            left
        };
        if comparator.compare(&heap[child], &heap[i]) == Ordering::Less {
            heap.swap(i, child);
            i = child;
        } else {
            break;
        }
    }
}

fn heapify<T, C: Comparator<T>>(heap: &mut [T], comparator: &C) {
    for i in (0..heap.len() / 2).rev() {
        sift_down(heap, i, comparator);
    }
}

fn pop_first<T, C: Comparator<T>>(heap: &mut Heap<T>, comparator: &C) -> Option<T> {
    if heap.is_empty() {
        return None;
    }
    let first = heap.swap_remove(0);
    sift_down(heap, 0, comparator);
    Some(first)
}

impl<T: Ord> PriorityQueue<T> {
    /// an empty queue in natural order
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, C> PriorityQueue<T, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            heap: SmallVec::new(),
            comparator,
        }
    }

    pub fn with_capacity_and_comparator(capacity: usize, comparator: C) -> Self {
        Self {
            heap: SmallVec::with_capacity(capacity),
            comparator,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// An iterator over the elements in unspecified order
    pub fn iter(&self) -> std::slice::Iter<T> {
        self.heap.iter()
    }

    /// Removes all elements and returns them in unspecified order
    pub fn remove_all(&mut self) -> Vec<T> {
        std::mem::take(&mut self.heap).into_vec()
    }

    pub fn clear(&mut self) {
        self.heap.clear()
    }
}

impl<T: Clone, C> PriorityQueue<T, C> {
    /// The elements in unspecified order
    pub fn to_unordered_list(&self) -> Vec<T> {
        self.heap.to_vec()
    }
}

impl<T, C: Comparator<T>> PriorityQueue<T, C> {
    pub fn add(&mut self, element: T) {
        self.heap.push(element);
        let last = self.heap.len() - 1;
        sift_up(&mut self.heap, last, &self.comparator);
    }

    /// Adds all elements.
    ///
    /// When the batch is larger than the current content the whole heap is rebuilt bottom up,
    /// which is linear, otherwise the new elements are sifted up one by one.
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, elements: I) {
        let before = self.heap.len();
        self.heap.extend(elements);
        let added = self.heap.len() - before;
        if added > before {
            trace!(before, added, "rebuilding heap");
            heapify(&mut self.heap, &self.comparator);
        } else {
            for i in before..self.heap.len() {
                sift_up(&mut self.heap, i, &self.comparator);
            }
        }
    }

    /// The element with the highest priority
    pub fn first(&self) -> Result<&T> {
        self.heap.first().ok_or(CollectionError::EmptyCollection)
    }

    /// Removes and returns the element with the highest priority
    pub fn remove_first(&mut self) -> Result<T> {
        pop_first(&mut self.heap, &self.comparator).ok_or(CollectionError::EmptyCollection)
    }

    fn position(&self, element: &T) -> Option<usize> {
        self.heap
            .iter()
            .position(|x| self.comparator.compare(x, element) == Ordering::Equal)
    }

    /// Removes one element that compares equal to `element`, if there is one.
    ///
    /// This is a linear scan.
    pub fn remove(&mut self, element: &T) -> bool {
        match self.position(element) {
            Some(i) => {
                // the last element takes the vacated slot and may be out of place in either direction
                self.heap.swap_remove(i);
                if i < self.heap.len() && sift_up(&mut self.heap, i, &self.comparator) == i {
                    sift_down(&mut self.heap, i, &self.comparator);
                }
                true
            }
            None => false,
        }
    }

    /// Whether there is an element that compares equal to `element`. This is a linear scan.
    pub fn contains(&self, element: &T) -> bool {
        self.position(element).is_some()
    }

    /// The elements in priority order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut res = Vec::with_capacity(self.heap.len());
        while let Some(first) = pop_first(&mut self.heap, &self.comparator) {
            res.push(first);
        }
        res
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        (1..self.heap.len()).all(|i| {
            self.comparator.compare(&self.heap[(i - 1) / 2], &self.heap[i]) != Ordering::Greater
        })
    }
}

impl<T: Clone, C: Comparator<T>> PriorityQueue<T, C> {
    /// The elements in priority order. The queue itself is not changed.
    pub fn to_list(&self) -> Vec<T> {
        let mut heap = self.heap.clone();
        let mut res = Vec::with_capacity(heap.len());
        while let Some(first) = pop_first(&mut heap, &self.comparator) {
            res.push(first);
        }
        res
    }
}

impl<T, C: Default> Default for PriorityQueue<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Debug, C> Debug for PriorityQueue<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.heap.iter()).finish()
    }
}

impl<T, C: Comparator<T>> Extend<T> for PriorityQueue<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter)
    }
}

impl<T, C: Comparator<T> + Default> FromIterator<T> for PriorityQueue<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut res = Self::default();
        res.add_all(iter);
        res
    }
}

impl<'a, T, C> IntoIterator for &'a PriorityQueue<T, C> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.heap.iter()
    }
}

impl<T, C> IntoIterator for PriorityQueue<T, C> {
    type Item = T;
    type IntoIter = smallvec::IntoIter<[T; 4]>;
    /// consumes the queue, yielding the elements in unspecified order
    fn into_iter(self) -> Self::IntoIter {
        self.heap.into_iter()
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize, C> serde::Serialize for PriorityQueue<T, C> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.heap.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::Deserialize<'de> for PriorityQueue<T, C>
where
    T: serde::Deserialize<'de>,
    C: Comparator<T> + Default,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let elements: Vec<T> = serde::Deserialize::deserialize(deserializer)?;
        Ok(elements.into_iter().collect())
    }
}
