//! A contiguous, growable buffer with a logical length.
//!
//! [ArrayStore] owns a single contiguous buffer of capacity `C` holding `L` live elements
//! (`L <= C`). Slots past `L` never hold live values: every operation that shortens the store
//! drops the values it removes. A store created with [ArrayStore::new] does not allocate (it
//! references the shared zero-length buffer) until the first element is appended.
//!
//! # Growth
//!
//! When an append finds the buffer full, the buffer is replaced with one of capacity
//! `max(L + L/2 + 1, required)`. This keeps appends amortized `O(1)` and bounds the number of
//! reallocations across `n` appends from empty to `O(log n)`.

use crate::Error;
use core::{
    fmt,
    hash::{Hash, Hasher},
    mem,
    ops::Index,
};
use tracing::trace;

/// Capacity to grow to from `capacity`, saturating at `usize::MAX`.
const fn grown(capacity: usize) -> usize {
    capacity.saturating_add(capacity >> 1).saturating_add(1)
}

/// An array-backed sequence with amortized growth and in-place mutation.
pub struct ArrayStore<T> {
    pub(crate) items: Vec<T>,
    reallocations: usize,
}

impl<T> ArrayStore<T> {
    /// Create an empty store that does not allocate until the first append.
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            reallocations: 0,
        }
    }

    /// Create an empty store with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            reallocations: 0,
        }
    }

    /// Create a store of `n` elements, each produced by calling `factory`.
    pub fn new_with_n_values(n: usize, mut factory: impl FnMut() -> T) -> Self {
        let mut store = Self::with_capacity(n);
        for _ in 0..n {
            store.items.push(factory());
        }
        store
    }

    /// Returns the number of live elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of slots in the current buffer.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Returns how many times the buffer has been replaced (grown or trimmed).
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Returns the live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns an iterator over the live elements.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Consumes the store, returning its elements.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Result<&T, Error> {
        let len = self.items.len();
        self.items
            .get(index)
            .ok_or(Error::IndexOutOfRange(index, len))
    }

    /// Returns a mutable reference to the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange(index, len))
    }

    /// Replaces the element at `index`, returning the previous value.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, Error> {
        let slot = self.get_mut(index)?;
        Ok(mem::replace(slot, value))
    }

    /// Returns the first element, if any.
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Returns the last element, if any.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Appends `value` to the end of the store.
    pub fn append(&mut self, value: T) {
        let len = self.items.len();
        if len == self.items.capacity() {
            self.reallocate(grown(len));
        }
        self.items.push(value);
    }

    /// Appends every element of `source`, reserving room for its lower size bound up front.
    pub fn append_all<I: IntoIterator<Item = T>>(&mut self, source: I) {
        let source = source.into_iter();
        let (lower, _) = source.size_hint();
        self.ensure_capacity(self.items.len().saturating_add(lower));
        for value in source {
            self.append(value);
        }
    }

    /// Inserts `value` at `index`, shifting `[index, len)` right by one.
    ///
    /// Inserting at `len` is an append.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), Error> {
        let len = self.items.len();
        if index > len {
            return Err(Error::IndexOutOfRange(index, len));
        }
        if index == len {
            self.append(value);
            return Ok(());
        }
        if len == self.items.capacity() {
            self.reallocate(grown(len));
        }
        self.items.insert(index, value);
        Ok(())
    }

    /// Inserts every element of `source` at `index`, preserving their order.
    ///
    /// The tail `[index, len)` is shifted once by the size of `source`.
    pub fn insert_range<I>(&mut self, index: usize, source: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let len = self.items.len();
        if index > len {
            return Err(Error::IndexOutOfRange(index, len));
        }
        let source = source.into_iter();
        let count = source.len();
        if count == 0 {
            return Ok(());
        }
        self.ensure_capacity(len.saturating_add(count));
        self.items.splice(index..index, source);
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting the tail left by one.
    pub fn remove_at(&mut self, index: usize) -> Result<T, Error> {
        let len = self.items.len();
        if index >= len {
            return Err(Error::IndexOutOfRange(index, len));
        }
        Ok(self.items.remove(index))
    }

    /// Removes the first element equal to `value`, returning whether one was found.
    pub fn remove_item(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.index_of(value) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Keeps only the elements satisfying `predicate`, in their original relative order.
    pub fn compact_keeping(&mut self, predicate: impl FnMut(&T) -> bool) {
        self.items.retain(predicate);
    }

    /// Removes every element satisfying `predicate`, preserving the order of the rest.
    pub fn remove_if(&mut self, mut predicate: impl FnMut(&T) -> bool) {
        self.items.retain(|item| !predicate(item));
    }

    /// Like [Self::compact_keeping], but stops at the first error returned by `predicate`.
    ///
    /// On error the store is left partially compacted: every original element is still present
    /// exactly once, but elements may have been reordered. Callers should treat the store's order
    /// as unspecified after an error.
    pub fn try_compact_keeping<E>(
        &mut self,
        mut predicate: impl FnMut(&T) -> Result<bool, E>,
    ) -> Result<(), E> {
        let mut kept = 0;
        for index in 0..self.items.len() {
            if predicate(&self.items[index])? {
                if kept != index {
                    self.items.swap(kept, index);
                }
                kept += 1;
            }
        }
        self.items.truncate(kept);
        Ok(())
    }

    /// Grows the buffer so it can hold at least `min` elements without reallocating.
    pub fn ensure_capacity(&mut self, min: usize) {
        let capacity = self.items.capacity();
        if min > capacity {
            self.reallocate(grown(capacity).max(min));
        }
    }

    /// Shrinks the buffer to the number of live elements.
    pub fn trim(&mut self) {
        let old = self.items.capacity();
        if self.items.len() < old {
            self.items.shrink_to_fit();
            self.reallocations += 1;
            trace!(old, new = self.items.capacity(), "trimmed buffer");
        }
    }

    /// Trims the buffer if its unused fraction exceeds `load_factor` (in `[0, 1]`).
    ///
    /// Returns whether the buffer was trimmed.
    pub fn trim_if_greater_than_percent(&mut self, load_factor: f64) -> Result<bool, Error> {
        if !(0.0..=1.0).contains(&load_factor) {
            return Err(Error::InvalidArgument("load factor must be within [0, 1]"));
        }
        let capacity = self.items.capacity();
        if capacity == 0 {
            return Ok(false);
        }
        let excess = 1.0 - self.items.len() as f64 / capacity as f64;
        if excess > load_factor {
            self.trim();
            return Ok(true);
        }
        Ok(false)
    }

    /// Removes every element, keeping the buffer.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the index of the first element equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|item| item == value)
    }

    /// Returns the index of the last element equal to `value`.
    pub fn last_index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().rposition(|item| item == value)
    }

    /// Returns `true` if some element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(value)
    }

    /// Sorts the store in place. The sort is stable.
    pub fn sort_this(&mut self) -> &mut Self
    where
        T: Ord,
    {
        self.items.sort();
        self
    }

    /// Sorts the store in place with `compare`. The sort is stable.
    pub fn sort_this_by(&mut self, compare: impl FnMut(&T, &T) -> core::cmp::Ordering) -> &mut Self {
        self.items.sort_by(compare);
        self
    }

    /// Sorts the store in place by the key extracted with `key`. The sort is stable.
    pub fn sort_this_by_key<K: Ord>(&mut self, key: impl FnMut(&T) -> K) -> &mut Self {
        self.items.sort_by_key(key);
        self
    }

    /// Reverses the store in place.
    pub fn reverse_this(&mut self) -> &mut Self {
        self.items.reverse();
        self
    }

    /// Calls `procedure` on each element in `from..to`.
    pub fn for_each_in_range(
        &self,
        from: usize,
        to: usize,
        mut procedure: impl FnMut(&T),
    ) -> Result<(), Error> {
        if from > to {
            return Err(Error::InvalidArgument("range start exceeds range end"));
        }
        let len = self.items.len();
        if to > len {
            return Err(Error::IndexOutOfRange(to, len));
        }
        for index in from..to {
            procedure(&self.items[index]);
        }
        Ok(())
    }

    /// Calls `procedure` with each element and its index.
    pub fn for_each_with_index(&self, mut procedure: impl FnMut(usize, &T)) {
        for index in 0..self.items.len() {
            procedure(index, &self.items[index]);
        }
    }

    /// Returns the number of sections the store reports for `batch_size`: `max(1, len / batch_size)`.
    pub fn batch_count(&self, batch_size: usize) -> Result<usize, Error> {
        if batch_size == 0 {
            return Err(Error::InvalidArgument("batch size must be at least 1"));
        }
        Ok((self.items.len() / batch_size).max(1))
    }

    /// Calls `procedure` on each element of section `section_index` out of `section_count`
    /// equally sized sections.
    ///
    /// Sections have `len / section_count` elements, except the last, which also absorbs the
    /// remainder.
    pub fn batch_for_each(
        &self,
        section_index: usize,
        section_count: usize,
        mut procedure: impl FnMut(&T),
    ) -> Result<(), Error> {
        if section_count == 0 {
            return Err(Error::InvalidArgument("section count must be at least 1"));
        }
        if section_index >= section_count {
            return Err(Error::InvalidArgument("section index must be below section count"));
        }
        let len = self.items.len();
        let section_size = len / section_count;
        let start = section_size * section_index;
        let end = if section_index == section_count - 1 {
            len
        } else {
            start + section_size
        };
        for index in start..end {
            procedure(&self.items[index]);
        }
        Ok(())
    }

    /// Replaces the buffer with one of `new_capacity` slots (`new_capacity >= len`).
    fn reallocate(&mut self, new_capacity: usize) {
        let old = self.items.capacity();
        let len = self.items.len();
        self.items.reserve_exact(new_capacity - len);
        self.reallocations += 1;
        trace!(old, new = self.items.capacity(), len, "grew buffer");
    }
}

impl<T> Default for ArrayStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for ArrayStore<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            reallocations: 0,
        }
    }
}

impl<T: PartialEq> PartialEq for ArrayStore<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.items.len() != other.items.len() {
            return false;
        }
        self.items.iter().zip(other.items.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for ArrayStore<T> {}

impl<T: Hash> Hash for ArrayStore<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for ArrayStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}

impl<T> Index<usize> for ArrayStore<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T> AsRef<[T]> for ArrayStore<T> {
    fn as_ref(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<Vec<T>> for ArrayStore<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            reallocations: 0,
        }
    }
}

impl<T: Clone> From<&[T]> for ArrayStore<T> {
    fn from(items: &[T]) -> Self {
        let mut store = Self::with_capacity(items.len());
        store.items.extend_from_slice(items);
        store
    }
}

impl<T, const N: usize> From<[T; N]> for ArrayStore<T> {
    fn from(items: [T; N]) -> Self {
        Vec::from(items).into()
    }
}

impl<T> From<ArrayStore<T>> for Vec<T> {
    fn from(store: ArrayStore<T>) -> Self {
        store.items
    }
}

impl<T> FromIterator<T> for ArrayStore<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut store = Self::new();
        store.append_all(iter);
        store
    }
}

impl<T> Extend<T> for ArrayStore<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_all(iter);
    }
}

impl<T> IntoIterator for ArrayStore<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ArrayStore<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
