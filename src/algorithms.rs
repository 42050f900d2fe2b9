//! Searching and sorting slices with a [Comparator].
//!
//! All sorts here are stable: elements that compare `Equal` keep their relative order.
use crate::comparator::Comparator;
use crate::error::{CollectionError, Result};
use std::cmp::Ordering;
use std::ops::Range;

/// below this length merge_sort falls back to insertion sort
const INSERTION_SORT_THRESHOLD: usize = 32;

/// Finds `key` in a slice that is sorted according to `c`.
///
/// Returns `Ok(index)` of some matching element, or `Err(index)` where it would have to be
/// inserted, just like [slice::binary_search].
pub fn binary_search<T, C: Comparator<T>>(
    elements: &[T],
    key: &T,
    c: &C,
) -> std::result::Result<usize, usize> {
    elements.binary_search_by(|x| c.compare(x, key))
}

/// The index of the first element that does not compare `Less` than `key`
pub fn lower_bound<T, C: Comparator<T>>(elements: &[T], key: &T, c: &C) -> usize {
    let mut lo = 0;
    let mut hi = elements.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if c.compare(&elements[mid], key) == Ordering::Less {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

pub fn insertion_sort<T, C: Comparator<T>>(elements: &mut [T], c: &C) {
    for i in 1..elements.len() {
        let mut j = i;
        // strictly greater, so equal elements are not moved past each other
        while j > 0 && c.compare(&elements[j - 1], &elements[j]) == Ordering::Greater {
            elements.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Merges the sorted runs `elements[..mid]` and `elements[mid..]`, using `scratch` as buffer
fn merge<T: Clone, C: Comparator<T>>(elements: &mut [T], mid: usize, scratch: &mut Vec<T>, c: &C) {
    // already in order
    if c.compare(&elements[mid - 1], &elements[mid]) != Ordering::Greater {
        return;
    }
    scratch.clear();
    scratch.extend_from_slice(&elements[..mid]);
    let mut a = 0;
    let mut b = mid;
    let mut target = 0;
    while a < scratch.len() && b < elements.len() {
        // take from the left on ties
        if c.compare(&elements[b], &scratch[a]) == Ordering::Less {
            elements[target] = elements[b].clone();
            b += 1;
        } else {
            elements[target] = scratch[a].clone();
            a += 1;
        }
        target += 1;
    }
    while a < scratch.len() {
        elements[target] = scratch[a].clone();
        a += 1;
        target += 1;
    }
}

fn merge_sort_rec<T: Clone, C: Comparator<T>>(elements: &mut [T], scratch: &mut Vec<T>, c: &C) {
    if elements.len() <= INSERTION_SORT_THRESHOLD {
        insertion_sort(elements, c);
        return;
    }
    let mid = elements.len() / 2;
    merge_sort_rec(&mut elements[..mid], scratch, c);
    merge_sort_rec(&mut elements[mid..], scratch, c);
    merge(elements, mid, scratch, c);
}

/// Stable merge sort. Short slices are sorted by insertion sort.
pub fn merge_sort<T: Clone, C: Comparator<T>>(elements: &mut [T], c: &C) {
    let mut scratch = Vec::with_capacity(elements.len() / 2 + 1);
    merge_sort_rec(elements, &mut scratch, c);
}

/// Sorts `elements[range]` in place, leaving the rest of the slice alone.
///
/// Fails with [InvalidArgument](crate::CollectionError::InvalidArgument) if the range is
/// decreasing or extends past the end of the slice.
pub fn sort_range<T: Clone, C: Comparator<T>>(
    elements: &mut [T],
    range: Range<usize>,
    c: &C,
) -> Result<()> {
    if range.start > range.end {
        return Err(CollectionError::invalid_argument(format!(
            "range start {} is after its end {}",
            range.start, range.end
        )));
    }
    if range.end > elements.len() {
        return Err(CollectionError::invalid_argument(format!(
            "range end {} is out of bounds for length {}",
            range.end,
            elements.len()
        )));
    }
    merge_sort(&mut elements[range], c);
    Ok(())
}
