//! Array-backed growable sequences.
//!
//! [ArrayStore] is a contiguous buffer with a logical length, amortized growth, and in-place
//! mutation primitives (bulk insertion, stable compaction, trimming). On top of it, a set of
//! sequential algorithms (select, reject, partition, collect, fold, distinct, group by, ...)
//! walk the live range directly by index on the calling thread.
//!
//! # Example
//!
//! ```
//! use fastseq_array::ArrayStore;
//!
//! let mut store = ArrayStore::from([1, 2, 3, 4, 5, 6]);
//! store.insert_at(2, 99).unwrap();
//! assert_eq!(store.as_slice(), &[1, 2, 99, 3, 4, 5, 6]);
//!
//! store.compact_keeping(|x| x % 2 == 1);
//! assert_eq!(store.as_slice(), &[1, 99, 3, 5]);
//!
//! let partition = store.partition(|x| *x > 4);
//! assert_eq!(partition.selected().as_slice(), &[99, 5]);
//! assert_eq!(partition.rejected().as_slice(), &[1, 3]);
//! ```
//!
//! For batched and parallel evaluation over a store, see the `fastseq-parallel` crate.

mod error;
mod iterate;
mod store;

pub use error::Error;
pub use iterate::Partition;
pub use store::ArrayStore;
