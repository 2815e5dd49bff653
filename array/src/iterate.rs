//! Sequential iteration algorithms over an [ArrayStore].
//!
//! Every algorithm walks the live range `[0, len)` by index on the calling thread and produces
//! its result in a single pass. Derived stores preserve the relative order of the elements they
//! were built from.

use crate::{ArrayStore, Error};
use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
    iter::Sum,
};

/// The result of splitting a store in two with a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    selected: ArrayStore<T>,
    rejected: ArrayStore<T>,
}

impl<T> Partition<T> {
    /// Elements that satisfied the predicate.
    pub fn selected(&self) -> &ArrayStore<T> {
        &self.selected
    }

    /// Elements that did not satisfy the predicate.
    pub fn rejected(&self) -> &ArrayStore<T> {
        &self.rejected
    }

    /// Consumes the partition, returning `(selected, rejected)`.
    pub fn into_parts(self) -> (ArrayStore<T>, ArrayStore<T>) {
        (self.selected, self.rejected)
    }
}

impl<T> ArrayStore<T> {
    /// Returns a new store with the elements satisfying `predicate`.
    pub fn select(&self, mut predicate: impl FnMut(&T) -> bool) -> ArrayStore<T>
    where
        T: Clone,
    {
        let mut result = ArrayStore::new();
        for index in 0..self.items.len() {
            let item = &self.items[index];
            if predicate(item) {
                result.append(item.clone());
            }
        }
        result
    }

    /// Returns a new store with the elements not satisfying `predicate`.
    pub fn reject(&self, mut predicate: impl FnMut(&T) -> bool) -> ArrayStore<T>
    where
        T: Clone,
    {
        self.select(|item| !predicate(item))
    }

    /// Splits the store into selected and rejected elements in one pass.
    pub fn partition(&self, mut predicate: impl FnMut(&T) -> bool) -> Partition<T>
    where
        T: Clone,
    {
        let mut selected = ArrayStore::new();
        let mut rejected = ArrayStore::new();
        for index in 0..self.items.len() {
            let item = &self.items[index];
            if predicate(item) {
                selected.append(item.clone());
            } else {
                rejected.append(item.clone());
            }
        }
        Partition { selected, rejected }
    }

    /// Returns a new store with `function` applied to every element.
    pub fn collect<V>(&self, mut function: impl FnMut(&T) -> V) -> ArrayStore<V> {
        let mut result = ArrayStore::with_capacity(self.items.len());
        for index in 0..self.items.len() {
            result.append(function(&self.items[index]));
        }
        result
    }

    /// Returns a new store with the concatenation of every iterable produced by `function`.
    pub fn flat_collect<V, I>(&self, mut function: impl FnMut(&T) -> I) -> ArrayStore<V>
    where
        I: IntoIterator<Item = V>,
    {
        let mut result = ArrayStore::new();
        for index in 0..self.items.len() {
            result.append_all(function(&self.items[index]));
        }
        result
    }

    /// Returns a new store with `function` applied to the elements satisfying `predicate`.
    pub fn collect_if<V>(
        &self,
        mut predicate: impl FnMut(&T) -> bool,
        mut function: impl FnMut(&T) -> V,
    ) -> ArrayStore<V> {
        let mut result = ArrayStore::new();
        for index in 0..self.items.len() {
            let item = &self.items[index];
            if predicate(item) {
                result.append(function(item));
            }
        }
        result
    }

    /// Returns the first element satisfying `predicate`.
    pub fn detect(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.detect_index(&mut predicate).map(|index| &self.items[index])
    }

    /// Returns the index of the first element satisfying `predicate`.
    pub fn detect_index(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        (0..self.items.len()).find(|&index| predicate(&self.items[index]))
    }

    /// Returns `true` if any element satisfies `predicate`.
    pub fn any_satisfy(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.detect_index(predicate).is_some()
    }

    /// Returns `true` if every element satisfies `predicate` (vacuously true when empty).
    pub fn all_satisfy(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.detect_index(|item| !predicate(item)).is_none()
    }

    /// Returns `true` if no element satisfies `predicate`.
    pub fn none_satisfy(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        !self.any_satisfy(predicate)
    }

    /// Returns the number of elements satisfying `predicate`.
    pub fn count(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let mut count = 0;
        for index in 0..self.items.len() {
            if predicate(&self.items[index]) {
                count += 1;
            }
        }
        count
    }

    /// Folds every element into `initial` with `function`, in index order.
    pub fn inject_into<A>(&self, initial: A, mut function: impl FnMut(A, &T) -> A) -> A {
        let mut result = initial;
        for index in 0..self.items.len() {
            result = function(result, &self.items[index]);
        }
        result
    }

    /// Sums the values `function` extracts from every element.
    pub fn sum_of<V: Sum<V>>(&self, mut function: impl FnMut(&T) -> V) -> V {
        (0..self.items.len())
            .map(|index| function(&self.items[index]))
            .sum()
    }

    /// Returns the element with the smallest key (the first one on ties).
    pub fn min_by_key<K: Ord>(&self, mut key: impl FnMut(&T) -> K) -> Option<&T> {
        let mut best: Option<(K, usize)> = None;
        for index in 0..self.items.len() {
            let candidate = key(&self.items[index]);
            let replace = match &best {
                Some((current, _)) => candidate < *current,
                None => true,
            };
            if replace {
                best = Some((candidate, index));
            }
        }
        best.map(|(_, index)| &self.items[index])
    }

    /// Returns the element with the largest key (the first one on ties).
    pub fn max_by_key<K: Ord>(&self, mut key: impl FnMut(&T) -> K) -> Option<&T> {
        let mut best: Option<(K, usize)> = None;
        for index in 0..self.items.len() {
            let candidate = key(&self.items[index]);
            let replace = match &best {
                Some((current, _)) => candidate > *current,
                None => true,
            };
            if replace {
                best = Some((candidate, index));
            }
        }
        best.map(|(_, index)| &self.items[index])
    }

    /// Returns a new store with duplicates removed, keeping first occurrences in order.
    pub fn distinct(&self) -> ArrayStore<T>
    where
        T: Eq + Hash + Clone,
    {
        let mut seen = HashSet::with_capacity(self.items.len());
        let mut result = ArrayStore::new();
        for index in 0..self.items.len() {
            let item = &self.items[index];
            if seen.insert(item) {
                result.append(item.clone());
            }
        }
        result
    }

    /// Returns a sorted copy of the store. The sort is stable.
    pub fn to_sorted(&self) -> ArrayStore<T>
    where
        T: Ord + Clone,
    {
        let mut result = self.clone();
        result.sort_this();
        result
    }

    /// Returns a copy of the store sorted with `compare`. The sort is stable.
    pub fn to_sorted_by(&self, compare: impl FnMut(&T, &T) -> core::cmp::Ordering) -> ArrayStore<T>
    where
        T: Clone,
    {
        let mut result = self.clone();
        result.sort_this_by(compare);
        result
    }

    /// Returns the longest prefix whose elements all satisfy `predicate`.
    pub fn take_while(&self, mut predicate: impl FnMut(&T) -> bool) -> ArrayStore<T>
    where
        T: Clone,
    {
        let end = self.detect_index(|item| !predicate(item)).unwrap_or(self.items.len());
        ArrayStore::from(&self.items[..end])
    }

    /// Returns the elements after the longest prefix satisfying `predicate`.
    pub fn drop_while(&self, mut predicate: impl FnMut(&T) -> bool) -> ArrayStore<T>
    where
        T: Clone,
    {
        let start = self.detect_index(|item| !predicate(item)).unwrap_or(self.items.len());
        ArrayStore::from(&self.items[start..])
    }

    /// Splits the store at the first element not satisfying `predicate`.
    pub fn partition_while(&self, mut predicate: impl FnMut(&T) -> bool) -> Partition<T>
    where
        T: Clone,
    {
        let split = self.detect_index(|item| !predicate(item)).unwrap_or(self.items.len());
        Partition {
            selected: ArrayStore::from(&self.items[..split]),
            rejected: ArrayStore::from(&self.items[split..]),
        }
    }

    /// Groups elements by the key `function` extracts. Each group preserves first-seen order.
    pub fn group_by<K>(&self, mut function: impl FnMut(&T) -> K) -> HashMap<K, ArrayStore<T>>
    where
        K: Eq + Hash,
        T: Clone,
    {
        let mut groups: HashMap<K, ArrayStore<T>> = HashMap::new();
        for index in 0..self.items.len() {
            let item = &self.items[index];
            groups.entry(function(item)).or_default().append(item.clone());
        }
        groups
    }

    /// Splits the store into consecutive stores of `size` elements (the last may be shorter).
    pub fn chunk(&self, size: usize) -> Result<ArrayStore<ArrayStore<T>>, Error>
    where
        T: Clone,
    {
        if size == 0 {
            return Err(Error::InvalidArgument("chunk size must be at least 1"));
        }
        let mut result = ArrayStore::with_capacity(self.items.len().div_ceil(size));
        for chunk in self.items.chunks(size) {
            result.append(ArrayStore::from(chunk));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_select_reject_partition() {
        let store: ArrayStore<u32> = (1..=10).collect();
        let evens = store.select(|x| x % 2 == 0);
        let odds = store.reject(|x| x % 2 == 0);
        assert_eq!(evens.as_slice(), &[2, 4, 6, 8, 10]);
        assert_eq!(odds.as_slice(), &[1, 3, 5, 7, 9]);

        let partition = store.partition(|x| *x > 7);
        assert_eq!(partition.selected().as_slice(), &[8, 9, 10]);
        assert_eq!(partition.rejected().as_slice(), &[1, 2, 3, 4, 5, 6, 7]);
        let (selected, rejected) = partition.into_parts();
        assert_eq!(selected.len() + rejected.len(), store.len());
    }

    #[test]
    fn test_collect_variants() {
        let store = ArrayStore::from([1, 2, 3]);
        assert_eq!(store.collect(|x| x * 10).as_slice(), &[10, 20, 30]);
        assert_eq!(
            store.flat_collect(|x| vec![*x; *x as usize]).as_slice(),
            &[1, 2, 2, 3, 3, 3]
        );
        assert_eq!(
            store.collect_if(|x| *x != 2, |x| x.to_string()).as_slice(),
            &["1".to_string(), "3".to_string()]
        );
    }

    #[test]
    fn test_detect_and_satisfy() {
        let store = ArrayStore::from([3, 8, 5, 10]);
        assert_eq!(store.detect(|x| x % 2 == 0), Some(&8));
        assert_eq!(store.detect_index(|x| *x > 8), Some(3));
        assert!(store.any_satisfy(|x| *x == 5));
        assert!(!store.all_satisfy(|x| *x > 3));
        assert!(store.none_satisfy(|x| *x > 10));
        assert_eq!(store.count(|x| *x >= 5), 3);
    }

    #[test]
    fn test_empty_store_never_invokes_predicate() {
        let store: ArrayStore<u8> = ArrayStore::new();
        let mut calls = 0;
        assert_eq!(
            store.detect(|_| {
                calls += 1;
                true
            }),
            None
        );
        assert!(store.all_satisfy(|_| {
            calls += 1;
            false
        }));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_folds() {
        let store = ArrayStore::from([1u64, 2, 3, 4]);
        assert_eq!(store.inject_into(0, |acc, x| acc + x), 10);
        assert_eq!(
            store.inject_into(String::new(), |mut acc, x| {
                acc.push_str(&x.to_string());
                acc
            }),
            "1234"
        );
        assert_eq!(store.sum_of(|x| *x as f64 / 2.0), 5.0);
    }

    #[test]
    fn test_min_max_prefer_first() {
        let store = ArrayStore::from([("a", 2), ("b", 1), ("c", 3), ("d", 1), ("e", 3)]);
        assert_eq!(store.min_by_key(|(_, v)| *v), Some(&("b", 1)));
        assert_eq!(store.max_by_key(|(_, v)| *v), Some(&("c", 3)));
        assert_eq!(ArrayStore::<u8>::new().min_by_key(|x| *x), None);
    }

    #[test]
    fn test_distinct_first_occurrence() {
        let store = ArrayStore::from([3, 1, 3, 2, 1, 4]);
        assert_eq!(store.distinct().as_slice(), &[3, 1, 2, 4]);
    }

    #[test]
    fn test_sorted_copies() {
        let store = ArrayStore::from([3, 1, 2]);
        assert_eq!(store.to_sorted().as_slice(), &[1, 2, 3]);
        assert_eq!(store.to_sorted_by(|a, b| b.cmp(a)).as_slice(), &[3, 2, 1]);
        assert_eq!(store.as_slice(), &[3, 1, 2]);
    }

    #[test]
    fn test_while_variants() {
        let store = ArrayStore::from([1, 2, 3, 10, 4, 5]);
        assert_eq!(store.take_while(|x| *x < 5).as_slice(), &[1, 2, 3]);
        assert_eq!(store.drop_while(|x| *x < 5).as_slice(), &[10, 4, 5]);
        let partition = store.partition_while(|x| *x < 3);
        assert_eq!(partition.selected().as_slice(), &[1, 2]);
        assert_eq!(partition.rejected().as_slice(), &[3, 10, 4, 5]);
        assert_eq!(store.take_while(|_| true).len(), 6);
        assert!(store.drop_while(|_| true).is_empty());
    }

    #[test]
    fn test_group_by_preserves_order() {
        let store = ArrayStore::from(["apple", "avocado", "banana", "apricot", "blueberry"]);
        let groups = store.group_by(|s| s.as_bytes()[0]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&b'a'].as_slice(), &["apple", "avocado", "apricot"]);
        assert_eq!(groups[&b'b'].as_slice(), &["banana", "blueberry"]);
    }

    #[test]
    fn test_chunk() {
        let store: ArrayStore<u8> = (0..7).collect();
        let chunks = store.chunk(3).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].as_slice(), &[0, 1, 2]);
        assert_eq!(chunks[2].as_slice(), &[6]);
        assert_eq!(
            store.chunk(0),
            Err(Error::InvalidArgument("chunk size must be at least 1"))
        );
    }

    proptest! {
        #[test]
        fn compact_keeping_matches_select(data in prop::collection::vec(any::<i32>(), 0..300)) {
            let store = ArrayStore::from(data.clone());
            let expected = store.select(|x| x % 3 != 0);

            let mut compacted = store.clone();
            compacted.compact_keeping(|x| x % 3 != 0);
            prop_assert_eq!(compacted.len(), store.count(|x| x % 3 != 0));
            prop_assert_eq!(compacted, expected);
        }

        #[test]
        fn select_and_reject_cover_everything(data in prop::collection::vec(any::<i16>(), 0..300)) {
            let store = ArrayStore::from(data);
            let partition = store.partition(|x| *x > 0);
            prop_assert_eq!(partition.selected(), &store.select(|x| *x > 0));
            prop_assert_eq!(partition.rejected(), &store.reject(|x| *x > 0));
            prop_assert_eq!(partition.selected().len() + partition.rejected().len(), store.len());
        }

        #[test]
        fn insert_then_remove_restores(
            data in prop::collection::vec(any::<u8>(), 0..100),
            value in any::<u8>(),
            seed in any::<usize>(),
        ) {
            let mut store = ArrayStore::from(data.clone());
            let index = seed % (data.len() + 1);
            store.insert_at(index, value).unwrap();
            prop_assert_eq!(store.get(index), Ok(&value));
            prop_assert_eq!(store.remove_at(index), Ok(value));
            prop_assert_eq!(store.into_vec(), data);
        }
    }
}
