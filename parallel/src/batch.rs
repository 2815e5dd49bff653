//! Contiguous index-range views over a pipeline.

use crate::pipeline::{filter, map, Filter, Map, Stage};
use core::{fmt, ops::ControlFlow};

/// An immutable view over the source indices `[start, end)` as seen through a stage.
///
/// A batch holds only its bounds and a handle to the stage, never a copy of the elements.
/// Operations visit the batch's elements in ascending index order, and the short-circuiting ones
/// ([Batch::any_satisfy], [Batch::all_satisfy], [Batch::detect]) stop at the first decisive
/// element of this batch only.
#[derive(Clone)]
pub struct Batch<S> {
    stage: S,
    start: usize,
    end: usize,
}

impl<S: Stage> Batch<S> {
    pub(crate) fn new(stage: S, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= stage.source_len());
        Self { stage, start, end }
    }

    /// Returns the first source index covered by this batch.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the source index one past the last covered by this batch.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the number of source indices covered (before any filtering).
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the batch covers no source indices.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn try_fold<A, F>(&self, init: A, mut f: F) -> ControlFlow<A, A>
    where
        F: FnMut(A, S::Item) -> ControlFlow<A, A>,
    {
        self.stage.try_fold_range(self.start..self.end, init, &mut f)
    }

    /// Run `procedure` on every element.
    pub fn for_each<F: FnMut(S::Item)>(&self, mut procedure: F) {
        let _ = self.try_fold((), |(), item| {
            procedure(item);
            ControlFlow::Continue(())
        });
    }

    /// Returns `true` if any element satisfies `predicate`.
    pub fn any_satisfy<P: FnMut(&S::Item) -> bool>(&self, mut predicate: P) -> bool {
        self.try_fold(false, |_, item| {
            if predicate(&item) {
                ControlFlow::Break(true)
            } else {
                ControlFlow::Continue(false)
            }
        })
        .is_break()
    }

    /// Returns `true` if every element satisfies `predicate` (vacuously true when empty).
    pub fn all_satisfy<P: FnMut(&S::Item) -> bool>(&self, mut predicate: P) -> bool {
        self.try_fold(true, |_, item| {
            if predicate(&item) {
                ControlFlow::Continue(true)
            } else {
                ControlFlow::Break(false)
            }
        })
        .is_continue()
    }

    /// Returns the first element satisfying `predicate`.
    pub fn detect<P: FnMut(&S::Item) -> bool>(&self, mut predicate: P) -> Option<S::Item> {
        match self.try_fold(None, |_, item| {
            if predicate(&item) {
                ControlFlow::Break(Some(item))
            } else {
                ControlFlow::Continue(None)
            }
        }) {
            ControlFlow::Break(found) => found,
            ControlFlow::Continue(_) => None,
        }
    }

    /// Returns the number of elements satisfying `predicate`.
    pub fn count<P: FnMut(&S::Item) -> bool>(&self, mut predicate: P) -> usize {
        self.fold(0, |count, item| {
            if predicate(&item) {
                count + 1
            } else {
                count
            }
        })
    }

    /// Combine every element into `init` with `function`.
    pub fn fold<A, F: FnMut(A, S::Item) -> A>(&self, init: A, mut function: F) -> A {
        match self.try_fold(init, |acc, item| ControlFlow::Continue(function(acc, item))) {
            ControlFlow::Continue(acc) | ControlFlow::Break(acc) => acc,
        }
    }

    /// Materialize the elements of this batch.
    pub fn to_vec(&self) -> Vec<S::Item> {
        self.fold(Vec::new(), |mut out, item| {
            out.push(item);
            out
        })
    }

    /// Returns a batch over the same range that only yields elements satisfying `predicate`.
    pub fn select<P>(self, predicate: P) -> Batch<Filter<S, P>>
    where
        P: Fn(&S::Item) -> bool,
    {
        Batch {
            stage: filter(self.stage, predicate),
            start: self.start,
            end: self.end,
        }
    }

    /// Returns a batch over the same range that yields `function` applied to each element.
    pub fn collect<F, V>(self, function: F) -> Batch<Map<S, F>>
    where
        F: Fn(S::Item) -> V,
    {
        Batch {
            stage: map(self.stage, function),
            start: self.start,
            end: self.end,
        }
    }
}

impl<S: Stage> fmt::Debug for Batch<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("kinds", &self.stage.kinds())
            .finish()
    }
}
