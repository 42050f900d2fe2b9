//! Collections and equality strategies parameterized by pluggable comparison logic.
//!
//! - [PriorityQueue], a binary heap ordered by a [Comparator]
//! - [Equality] strategies that decide equality and hashing independently of `PartialEq` and
//!   `Hash`, from identity and case insensitive string matching up to
//!   [DeepCollectionEquality] over nested [Value] trees
//! - stable sorting and binary search over slices with a comparator, in [algorithms]
#[cfg(test)]
extern crate quickcheck;

#[cfg(test)]
#[macro_use]
extern crate maplit;

#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

#[cfg(test)]
#[macro_use]
mod test_macros;

#[macro_use]
mod macros;

mod comparator;
mod error;
mod equality;
mod priority_queue;
mod value;

pub mod algorithms;

pub use comparator::*;
pub use equality::*;
pub use error::*;
pub use priority_queue::*;
pub use value::*;
