//! Parallel evaluation of pipelines on a caller-owned thread pool.

use crate::{
    batch::Batch,
    pipeline::{Pipeline, Stage},
    utils::{extract_panic_message, ThreadPool},
    Error, Strategy,
};
use core::num::NonZeroUsize;
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error};

/// Configuration for [Parallel].
#[derive(Clone, Debug)]
pub struct Config {
    /// The number of source elements assigned to each batch (must be at least 1).
    pub batch_size: usize,

    /// The pool batches are executed on. The caller owns the pool; it is never shut down here.
    pub thread_pool: Option<ThreadPool>,
}

/// A parallel execution strategy that submits one task per batch to a rayon thread pool.
///
/// Every terminal operation splits the pipeline into contiguous batches of `batch_size`
/// source elements, evaluates each batch as its own task, waits for all of them, and then
/// combines the per-batch results in ascending batch order. Ordered outputs (`select`,
/// `collect`, `detect`, ...) are therefore identical to [crate::Sequential] for any batch size.
///
/// If any task panics, the remaining tasks still run to completion (they are never cancelled)
/// and the panic of the lowest-starting batch is returned as [Error::ExecutionFailure]. Partial
/// results are discarded.
///
/// The source must not be mutated while an operation is outstanding. Because pipelines borrow
/// their source, this is enforced by the borrow checker.
///
/// # Examples
///
/// ```
/// use fastseq_array::ArrayStore;
/// use fastseq_parallel::{create_pool, Config, Parallel, Pipeline, Strategy};
///
/// let strategy = Parallel::new(Config {
///     batch_size: 3,
///     thread_pool: Some(create_pool(2).unwrap()),
/// })
/// .unwrap();
///
/// let store: ArrayStore<u64> = (1..=7).collect();
/// let doubled = strategy.collect(&Pipeline::from(&store), |x| x * 2).unwrap();
/// assert_eq!(doubled.as_slice(), &[2, 4, 6, 8, 10, 12, 14]);
/// ```
#[derive(Clone, Debug)]
pub struct Parallel {
    thread_pool: ThreadPool,
    batch_size: NonZeroUsize,
}

impl Parallel {
    /// Creates a new [Parallel] strategy from `cfg`.
    ///
    /// Fails with [Error::InvalidArgument] if the batch size is zero or no thread pool is
    /// provided.
    pub fn new(cfg: Config) -> Result<Self, Error> {
        let batch_size = NonZeroUsize::new(cfg.batch_size)
            .ok_or(Error::InvalidArgument("batch size must be at least 1"))?;
        let thread_pool = cfg
            .thread_pool
            .ok_or(Error::InvalidArgument("thread pool is required"))?;
        Ok(Self {
            thread_pool,
            batch_size,
        })
    }

    /// Returns the number of source elements assigned to each batch.
    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Returns the pool batches are executed on.
    pub fn thread_pool(&self) -> &ThreadPool {
        &self.thread_pool
    }
}

impl Strategy for Parallel {
    fn run<S, R, F>(&self, pipeline: &Pipeline<S>, task: F) -> Result<Vec<R>, Error>
    where
        S: Stage + Sync,
        R: Send,
        F: Fn(Batch<&S>) -> R + Send + Sync,
    {
        let batches = pipeline.split(self.batch_size);
        debug!(
            batches = batches.len(),
            batch_size = self.batch_size.get(),
            source_len = pipeline.source_len(),
            kinds = ?pipeline.kinds(),
            "dispatching batches"
        );

        // Collecting an indexed iterator keeps outcomes in ascending batch order, regardless of
        // the order in which tasks complete.
        let outcomes: Vec<Result<R, String>> = self.thread_pool.install(|| {
            batches
                .into_par_iter()
                .with_max_len(1)
                .map(|batch| {
                    let start = batch.start();
                    let end = batch.end();
                    catch_unwind(AssertUnwindSafe(|| task(batch))).map_err(|err| {
                        let message = extract_panic_message(&*err);
                        error!(start, end, panic = %message, "batch panicked");
                        message
                    })
                })
                .collect()
        });

        // Every task has completed here, so the first failure is the lowest-starting batch's.
        outcomes
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::ExecutionFailure)
    }
}
