//! Lazy chains of stages over a borrowed source.
//!
//! A [Pipeline] starts at a [Root] (a borrowed slice, usually the live range of an
//! [ArrayStore]) and grows by wrapping its last stage in a [Filter] or a [Map]. Building a
//! pipeline does no work: stages are evaluated element by element, in ascending index order,
//! only when a terminal operation drives a range of the source through them.
//!
//! Each stage shape is its own type, so a pipeline such as `root.filter(p).map(f)` compiles to a
//! single specialized loop per shape instead of dispatching on the stage kind at runtime.

use crate::batch::Batch;
use core::{fmt, num::NonZeroUsize, ops::ControlFlow, ops::Range};
use fastseq_array::ArrayStore;

/// The shape of a stage, used when describing a pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    Root,
    Filter,
    Map,
}

/// One link of a pipeline.
pub trait Stage {
    /// The type of element this stage produces.
    type Item;

    /// Returns the number of elements in the underlying source.
    fn source_len(&self) -> usize;

    /// Returns the shape of every stage from the root up to (and including) this one.
    fn kinds(&self) -> Vec<StageKind>;

    /// Feeds the elements this stage produces for the source indices in `range` into `f`, in
    /// ascending index order, stopping as soon as `f` breaks.
    fn try_fold_range<A, F>(&self, range: Range<usize>, init: A, f: &mut F) -> ControlFlow<A, A>
    where
        F: FnMut(A, Self::Item) -> ControlFlow<A, A>;
}

impl<S: Stage + ?Sized> Stage for &S {
    type Item = S::Item;

    fn source_len(&self) -> usize {
        (**self).source_len()
    }

    fn kinds(&self) -> Vec<StageKind> {
        (**self).kinds()
    }

    fn try_fold_range<A, F>(&self, range: Range<usize>, init: A, f: &mut F) -> ControlFlow<A, A>
    where
        F: FnMut(A, Self::Item) -> ControlFlow<A, A>,
    {
        (**self).try_fold_range(range, init, f)
    }
}

/// The source of a pipeline: a borrowed slice.
pub struct Root<'a, T> {
    items: &'a [T],
}

impl<T> Clone for Root<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Root<'_, T> {}

impl<'a, T> Stage for Root<'a, T> {
    type Item = &'a T;

    fn source_len(&self) -> usize {
        self.items.len()
    }

    fn kinds(&self) -> Vec<StageKind> {
        vec![StageKind::Root]
    }

    fn try_fold_range<A, F>(&self, range: Range<usize>, init: A, f: &mut F) -> ControlFlow<A, A>
    where
        F: FnMut(A, Self::Item) -> ControlFlow<A, A>,
    {
        let items = self.items;
        let mut acc = init;
        for index in range {
            match f(acc, &items[index]) {
                ControlFlow::Continue(next) => acc = next,
                ControlFlow::Break(done) => return ControlFlow::Break(done),
            }
        }
        ControlFlow::Continue(acc)
    }
}

/// Passes through the elements of `parent` that satisfy `predicate`.
#[derive(Clone)]
pub struct Filter<S, P> {
    parent: S,
    predicate: P,
}

impl<S, P> Stage for Filter<S, P>
where
    S: Stage,
    P: Fn(&S::Item) -> bool,
{
    type Item = S::Item;

    fn source_len(&self) -> usize {
        self.parent.source_len()
    }

    fn kinds(&self) -> Vec<StageKind> {
        let mut kinds = self.parent.kinds();
        kinds.push(StageKind::Filter);
        kinds
    }

    fn try_fold_range<A, F>(&self, range: Range<usize>, init: A, f: &mut F) -> ControlFlow<A, A>
    where
        F: FnMut(A, Self::Item) -> ControlFlow<A, A>,
    {
        let predicate = &self.predicate;
        self.parent.try_fold_range(range, init, &mut |acc, item| {
            if predicate(&item) {
                f(acc, item)
            } else {
                ControlFlow::Continue(acc)
            }
        })
    }
}

/// Applies `transform` to every element of `parent`.
#[derive(Clone)]
pub struct Map<S, F> {
    parent: S,
    transform: F,
}

impl<S, M, V> Stage for Map<S, M>
where
    S: Stage,
    M: Fn(S::Item) -> V,
{
    type Item = V;

    fn source_len(&self) -> usize {
        self.parent.source_len()
    }

    fn kinds(&self) -> Vec<StageKind> {
        let mut kinds = self.parent.kinds();
        kinds.push(StageKind::Map);
        kinds
    }

    fn try_fold_range<A, F>(&self, range: Range<usize>, init: A, f: &mut F) -> ControlFlow<A, A>
    where
        F: FnMut(A, Self::Item) -> ControlFlow<A, A>,
    {
        let transform = &self.transform;
        self.parent
            .try_fold_range(range, init, &mut |acc, item| f(acc, transform(item)))
    }
}

/// Wrap `parent` in a [Filter].
pub(crate) fn filter<S, P>(parent: S, predicate: P) -> Filter<S, P> {
    Filter { parent, predicate }
}

/// Wrap `parent` in a [Map].
pub(crate) fn map<S, F>(parent: S, transform: F) -> Map<S, F> {
    Map { parent, transform }
}

/// An immutable, lazily evaluated chain of stages.
///
/// Terminal operations are provided by a [crate::Strategy].
#[derive(Clone)]
pub struct Pipeline<S> {
    stage: S,
}

impl<'a, T> Pipeline<Root<'a, T>> {
    /// Create a pipeline over `items`.
    pub fn new(items: &'a [T]) -> Self {
        Self {
            stage: Root { items },
        }
    }
}

impl<'a, T> From<&'a [T]> for Pipeline<Root<'a, T>> {
    fn from(items: &'a [T]) -> Self {
        Self::new(items)
    }
}

impl<'a, T> From<&'a ArrayStore<T>> for Pipeline<Root<'a, T>> {
    fn from(store: &'a ArrayStore<T>) -> Self {
        Self::new(store.as_slice())
    }
}

impl<S: Stage> Pipeline<S> {
    /// Returns a pipeline that only passes elements satisfying `predicate`.
    pub fn filter<P>(self, predicate: P) -> Pipeline<Filter<S, P>>
    where
        P: Fn(&S::Item) -> bool,
    {
        Pipeline {
            stage: filter(self.stage, predicate),
        }
    }

    /// Returns a pipeline that applies `transform` to every element.
    pub fn map<F, V>(self, transform: F) -> Pipeline<Map<S, F>>
    where
        F: Fn(S::Item) -> V,
    {
        Pipeline {
            stage: map(self.stage, transform),
        }
    }

    /// Returns the last stage of the pipeline.
    pub fn stage(&self) -> &S {
        &self.stage
    }

    /// Returns the number of elements in the source.
    pub fn source_len(&self) -> usize {
        self.stage.source_len()
    }

    /// Returns the shape of every stage, root first.
    pub fn kinds(&self) -> Vec<StageKind> {
        self.stage.kinds()
    }

    /// Returns the number of batches reported for `batch_size`: `max(1, len / batch_size)`.
    pub fn batch_count(&self, batch_size: NonZeroUsize) -> usize {
        (self.source_len() / batch_size.get()).max(1)
    }

    /// Splits the source into contiguous batches of `batch_size` elements (the last may be
    /// shorter). An empty source yields no batches.
    ///
    /// Batch bounds are taken once, here.
    pub fn split(&self, batch_size: NonZeroUsize) -> Vec<Batch<&S>> {
        let len = self.source_len();
        let batch_size = batch_size.get();
        let mut batches = Vec::with_capacity(len.div_ceil(batch_size));
        let mut start = 0;
        while start < len {
            let end = start.saturating_add(batch_size).min(len);
            batches.push(Batch::new(&self.stage, start, end));
            start = end;
        }
        batches
    }

    /// Returns a single batch spanning the whole source.
    pub fn whole(&self) -> Batch<&S> {
        Batch::new(&self.stage, 0, self.source_len())
    }
}

impl<S: Stage> fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("kinds", &self.kinds())
            .field("source_len", &self.source_len())
            .finish()
    }
}
