//! Lazy batch pipelines over array-backed sequences with sequential or parallel evaluation.
//!
//! This crate provides the [`Strategy`] trait, which abstracts over sequential and parallel
//! evaluation of [`Pipeline`]s. This allows algorithms to be written once and executed either
//! sequentially or in parallel depending on the chosen strategy.
//!
//! # Overview
//!
//! A [`Pipeline`] borrows a source (usually an [`ArrayStore`]) and describes a chain of
//! [`filter`](Pipeline::filter) and [`map`](Pipeline::map) stages. Nothing is evaluated until a
//! terminal operation runs. Pipelines are split into contiguous [`Batch`]es of source indices,
//! and every terminal operation is expressed as a per-batch task plus a combination step.
//!
//! **Core Operation:**
//! - [`run`](Strategy::run): Runs a task on every batch and returns the per-batch results in
//!   ascending batch order
//!
//! **Terminal Operations:**
//! - [`for_each`](Strategy::for_each), [`any_satisfy`](Strategy::any_satisfy),
//!   [`all_satisfy`](Strategy::all_satisfy), [`detect`](Strategy::detect),
//!   [`count`](Strategy::count)
//! - [`select`](Strategy::select) and [`collect`](Strategy::collect): Ordered concatenation
//!   into an [`ArrayStore`]
//! - [`fold`](Strategy::fold), [`distinct`](Strategy::distinct),
//!   [`group_by`](Strategy::group_by)
//!
//! Two implementations are provided:
//!
//! - [`Sequential`]: Evaluates the whole pipeline as one batch on the current thread
//! - [`Parallel`]: Evaluates one batch per task on a caller-owned rayon thread pool
//!
//! Both produce identical results for every terminal operation. [`Parallel`] additionally
//! surfaces a panicking batch as [`Error::ExecutionFailure`].
//!
//! # Example
//!
//! ```
//! use fastseq_array::ArrayStore;
//! use fastseq_parallel::{Pipeline, Sequential, Strategy};
//!
//! fn sum_of_even_squares<S: Strategy>(strategy: &S, store: &ArrayStore<i64>) -> i64 {
//!     let pipeline = Pipeline::from(store).filter(|x| **x % 2 == 0).map(|x| x * x);
//!     strategy
//!         .fold(&pipeline, || 0i64, |acc, x| acc + x, |a, b| a + b)
//!         .unwrap()
//! }
//!
//! let store = ArrayStore::from([1, 2, 3, 4, 5]);
//! assert_eq!(sum_of_even_squares(&Sequential, &store), 20); // 4 + 16
//! ```

use core::{fmt, hash::Hash};
use fastseq_array::ArrayStore;
use std::collections::{HashMap, HashSet};

mod batch;
mod error;
mod executor;
mod pipeline;
mod utils;

pub use batch::Batch;
pub use error::Error;
pub use executor::{Config, Parallel};
pub use pipeline::{Filter, Map, Pipeline, Root, Stage, StageKind};
pub use utils::{create_pool, ThreadPool};

/// A strategy for evaluating terminal operations over a [Pipeline].
///
/// Implementors only provide [run](Self::run). Every terminal operation is derived from it and
/// combines per-batch results in ascending batch order, so the outcome does not depend on the
/// strategy (or, for [Parallel], on the batch size).
pub trait Strategy: Clone + Send + Sync + fmt::Debug + 'static {
    /// Runs `task` on every batch of `pipeline` and returns the per-batch results in ascending
    /// batch order.
    ///
    /// An empty source may yield no batches at all, so callers must handle an empty result.
    ///
    /// # Examples
    ///
    /// ```
    /// use fastseq_parallel::{Pipeline, Sequential, Strategy};
    ///
    /// let data = [1, 2, 3, 4, 5];
    /// let pipeline = Pipeline::new(&data);
    /// let lens = Sequential.run(&pipeline, |batch| batch.len()).unwrap();
    /// assert_eq!(lens, vec![5]);
    /// ```
    fn run<S, R, F>(&self, pipeline: &Pipeline<S>, task: F) -> Result<Vec<R>, Error>
    where
        S: Stage + Sync,
        R: Send,
        F: Fn(Batch<&S>) -> R + Send + Sync;

    /// Runs `procedure` on every element for its side effects.
    ///
    /// Elements of the same batch are visited in ascending order; no order is guaranteed
    /// across batches.
    fn for_each<S, F>(&self, pipeline: &Pipeline<S>, procedure: F) -> Result<(), Error>
    where
        S: Stage + Sync,
        F: Fn(S::Item) + Send + Sync,
    {
        self.run(pipeline, |batch| batch.for_each(&procedure))?;
        Ok(())
    }

    /// Returns `true` if any element satisfies `predicate`.
    ///
    /// Each batch stops at its first match, but batches that are already running are not
    /// stopped by a match in another batch.
    fn any_satisfy<S, P>(&self, pipeline: &Pipeline<S>, predicate: P) -> Result<bool, Error>
    where
        S: Stage + Sync,
        P: Fn(&S::Item) -> bool + Send + Sync,
    {
        let results = self.run(pipeline, |batch| batch.any_satisfy(&predicate))?;
        Ok(results.into_iter().any(|found| found))
    }

    /// Returns `true` if every element satisfies `predicate` (vacuously true when empty).
    fn all_satisfy<S, P>(&self, pipeline: &Pipeline<S>, predicate: P) -> Result<bool, Error>
    where
        S: Stage + Sync,
        P: Fn(&S::Item) -> bool + Send + Sync,
    {
        let results = self.run(pipeline, |batch| batch.all_satisfy(&predicate))?;
        Ok(results.into_iter().all(|satisfied| satisfied))
    }

    /// Returns the first element satisfying `predicate`.
    ///
    /// When several batches find a match, the one from the lowest-starting batch wins,
    /// regardless of completion order.
    fn detect<S, P>(&self, pipeline: &Pipeline<S>, predicate: P) -> Result<Option<S::Item>, Error>
    where
        S: Stage + Sync,
        S::Item: Send,
        P: Fn(&S::Item) -> bool + Send + Sync,
    {
        let results = self.run(pipeline, |batch| batch.detect(&predicate))?;
        Ok(results.into_iter().flatten().next())
    }

    /// Returns the elements satisfying `predicate`, in source order.
    fn select<S, P>(&self, pipeline: &Pipeline<S>, predicate: P) -> Result<ArrayStore<S::Item>, Error>
    where
        S: Stage + Sync,
        S::Item: Send,
        P: Fn(&S::Item) -> bool + Send + Sync,
    {
        let results = self.run(pipeline, |batch| batch.select(&predicate).to_vec())?;
        Ok(concatenate(results))
    }

    /// Returns `function` applied to every element, in source order.
    fn collect<S, F, V>(&self, pipeline: &Pipeline<S>, function: F) -> Result<ArrayStore<V>, Error>
    where
        S: Stage + Sync,
        F: Fn(S::Item) -> V + Send + Sync,
        V: Send,
    {
        let results = self.run(pipeline, |batch| batch.collect(&function).to_vec())?;
        Ok(concatenate(results))
    }

    /// Returns the number of elements satisfying `predicate`.
    fn count<S, P>(&self, pipeline: &Pipeline<S>, predicate: P) -> Result<usize, Error>
    where
        S: Stage + Sync,
        P: Fn(&S::Item) -> bool + Send + Sync,
    {
        let results = self.run(pipeline, |batch| batch.count(&predicate))?;
        Ok(results.into_iter().sum())
    }

    /// Reduces the pipeline to a single value using fold and reduce operations.
    ///
    /// Every batch folds its elements into a fresh `identity()`, and the per-batch results are
    /// combined with `reduce_op` in ascending batch order. An empty source returns `identity()`.
    ///
    /// # Arguments
    ///
    /// - `pipeline`: The pipeline to fold over
    /// - `identity`: A closure that produces the identity value for the fold
    /// - `fold_op`: Combines an accumulator with a single item: `(acc, item) -> acc`
    /// - `reduce_op`: Combines two accumulators: `(acc1, acc2) -> acc`
    fn fold<S, R, ID, F, RD>(
        &self,
        pipeline: &Pipeline<S>,
        identity: ID,
        fold_op: F,
        reduce_op: RD,
    ) -> Result<R, Error>
    where
        S: Stage + Sync,
        R: Send,
        ID: Fn() -> R + Send + Sync,
        F: Fn(R, S::Item) -> R + Send + Sync,
        RD: Fn(R, R) -> R + Send + Sync,
    {
        let results = self.run(pipeline, |batch| batch.fold(identity(), &fold_op))?;
        Ok(results
            .into_iter()
            .reduce(reduce_op)
            .unwrap_or_else(identity))
    }

    /// Returns the elements without duplicates, keeping the first occurrence of each.
    fn distinct<S>(&self, pipeline: &Pipeline<S>) -> Result<ArrayStore<S::Item>, Error>
    where
        S: Stage + Sync,
        S::Item: Eq + Hash + Clone + Send,
    {
        let results = self.run(pipeline, |batch| {
            let mut seen = HashSet::new();
            batch.fold(Vec::new(), |mut out, item| {
                if seen.insert(item.clone()) {
                    out.push(item);
                }
                out
            })
        })?;

        // Batch-local duplicates are gone; drop the ones repeated across batches.
        let mut seen = HashSet::new();
        let mut distinct = ArrayStore::new();
        for item in results.into_iter().flatten() {
            if seen.insert(item.clone()) {
                distinct.append(item);
            }
        }
        Ok(distinct)
    }

    /// Groups the elements by `key`. Each group keeps its elements in source order.
    fn group_by<S, K, F>(
        &self,
        pipeline: &Pipeline<S>,
        key: F,
    ) -> Result<HashMap<K, ArrayStore<S::Item>>, Error>
    where
        S: Stage + Sync,
        S::Item: Send,
        K: Eq + Hash + Send,
        F: Fn(&S::Item) -> K + Send + Sync,
    {
        let results = self.run(pipeline, |batch| {
            batch.fold(HashMap::new(), |mut groups: HashMap<K, Vec<S::Item>>, item| {
                groups.entry(key(&item)).or_default().push(item);
                groups
            })
        })?;

        let mut groups: HashMap<K, ArrayStore<S::Item>> = HashMap::new();
        for batch_groups in results {
            for (group, items) in batch_groups {
                groups.entry(group).or_default().append_all(items);
            }
        }
        Ok(groups)
    }
}

/// Concatenate per-batch outputs (already in ascending batch order) into one store.
fn concatenate<T>(parts: Vec<Vec<T>>) -> ArrayStore<T> {
    let total = parts.iter().map(Vec::len).sum();
    let mut out = ArrayStore::with_capacity(total);
    for part in parts {
        out.append_all(part);
    }
    out
}

/// A sequential execution strategy.
///
/// This strategy evaluates the whole pipeline as a single batch on the current thread. Panics
/// raised by user closures propagate to the caller unchanged. It is useful for:
///
/// - Debugging and testing (deterministic execution)
/// - Small workloads where parallelism overhead exceeds benefits
/// - Comparing sequential vs parallel performance
///
/// # Examples
///
/// ```
/// use fastseq_parallel::{Pipeline, Sequential, Strategy};
///
/// let data = vec![1, 2, 3, 4, 5];
/// let pipeline = Pipeline::new(&data);
/// let sum = Sequential.fold(&pipeline, || 0, |a, b| a + b, |a, b| a + b).unwrap();
/// assert_eq!(sum, 15);
/// ```
#[derive(Default, Debug, Clone)]
pub struct Sequential;

impl Strategy for Sequential {
    fn run<S, R, F>(&self, pipeline: &Pipeline<S>, task: F) -> Result<Vec<R>, Error>
    where
        S: Stage + Sync,
        R: Send,
        F: Fn(Batch<&S>) -> R + Send + Sync,
    {
        Ok(vec![task(pipeline.whole())])
    }
}
