#![allow(missing_docs)]

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::slice;

mod error;

pub use error::{HeapError, Result};

/// A single `(key, value)` entry of an [`IndexedMinHeap`].
///
/// Nodes are ordered by `value` first and by `key` second, so two entries
/// sharing a value leave the heap in ascending key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapNode<K, V> {
    pub key: K,
    pub value: V,
}

impl<K: Ord, V: Ord> PartialOrd for HeapNode<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V: Ord> Ord for HeapNode<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl<K: Copy, V: Copy> Copy for HeapNode<K, V> {}

/// A fixed-capacity min-heap of `(key, value)` pairs that can be addressed by key.
///
/// Next to the binary heap itself the structure keeps a map from every key to
/// its current slot in the heap, so the value of an already queued key can be
/// changed in *O*(log(*n*)). This is the decrease-key operation that Dijkstra's
/// algorithm and discrete event simulations rely on.
///
/// The smallest value is popped first. Entries with equal values are popped in
/// ascending key order.
///
/// The capacity is fixed when the heap is created. Inserting a new key into a
/// full heap fails with [`HeapError::CapacityExceeded`]; updating a key that is
/// already present always succeeds.
///
/// # Examples
///
/// ```
/// use indexed_min_heap::{HeapError, IndexedMinHeap};
///
/// let mut heap = IndexedMinHeap::with_capacity(3);
///
/// heap.insert_or_update("a", 5).unwrap();
/// heap.insert_or_update("b", 3).unwrap();
/// heap.insert_or_update("c", 8).unwrap();
/// assert_eq!(heap.peek_min(), Ok(&"b"));
///
/// // The heap is full, new keys are refused...
/// assert_eq!(
///     heap.insert_or_update("d", 0),
///     Err(HeapError::CapacityExceeded { capacity: 3 })
/// );
///
/// // ...but known keys can still be moved around.
/// heap.insert_or_update("c", 1).unwrap();
///
/// assert_eq!(heap.pop_min().map(|e| e.key), Ok("c"));
/// assert_eq!(heap.pop_min().map(|e| e.key), Ok("b"));
/// assert_eq!(heap.pop_min().map(|e| e.key), Ok("a"));
/// assert_eq!(heap.pop_min(), Err(HeapError::EmptyQueue));
/// ```
///
/// # Time complexity
///
/// | [insert\_or\_update] | [pop\_min]    | [peek\_min] | [from\_sorted\_keys] |
/// |----------------------|---------------|-------------|----------------------|
/// | *O*(log(*n*))        | *O*(log(*n*)) | *O*(1)      | *O*(*n*)             |
///
/// [insert\_or\_update]: IndexedMinHeap::insert_or_update
/// [pop\_min]: IndexedMinHeap::pop_min
/// [peek\_min]: IndexedMinHeap::peek_min
/// [from\_sorted\_keys]: IndexedMinHeap::from_sorted_keys
pub struct IndexedMinHeap<K, V, S = RandomState> {
    data: Vec<HeapNode<K, V>>,
    /// Slot of every queued key in `data`.
    positions: HashMap<K, usize, S>,
    capacity: usize,
}

impl<K: Clone, V: Clone, S: Clone> Clone for IndexedMinHeap<K, V, S> {
    fn clone(&self) -> Self {
        IndexedMinHeap {
            data: self.data.clone(),
            positions: self.positions.clone(),
            capacity: self.capacity,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.data.clone_from(&source.data);
        self.positions.clone_from(&source.positions);
        self.capacity = source.capacity;
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for IndexedMinHeap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<K, V> IndexedMinHeap<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Ord,
{
    /// Creates an empty heap that holds at most `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_min_heap::IndexedMinHeap;
    ///
    /// let mut heap = IndexedMinHeap::with_capacity(10);
    /// heap.insert_or_update(4, "Eve").unwrap();
    /// assert_eq!(heap.capacity(), 10);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// Creates a full heap from keys given in ascending order, all sharing
    /// `initial_value`. The capacity is the number of keys.
    ///
    /// Since all values are equal and the keys already ascend, the keys are
    /// laid out in the given order without any sifting.
    ///
    /// Keys that do not ascend are tolerated at the cost of an *O*(*n*)
    /// heapify. A key that repeats is skipped after its first occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_min_heap::IndexedMinHeap;
    ///
    /// // Every vertex starts out "infinitely" far away...
    /// let mut dist = IndexedMinHeap::from_sorted_keys(0..4, u32::MAX);
    /// assert_eq!(dist.len(), 4);
    /// assert!(dist.is_full());
    ///
    /// // ...until the source is reached.
    /// dist.insert_or_update(2, 0).unwrap();
    /// assert_eq!(dist.peek_min(), Ok(&2));
    /// ```
    #[must_use]
    pub fn from_sorted_keys<I>(keys: I, initial_value: V) -> Self
    where
        I: IntoIterator<Item = K>,
        V: Clone,
    {
        Self::from_sorted_keys_with_hasher(keys, initial_value, RandomState::new())
    }
}

impl<K, V, S> IndexedMinHeap<K, V, S>
where
    K: Hash + Eq + Ord + Clone,
    V: Ord,
    S: BuildHasher,
{
    /// Creates an empty heap with the given `capacity` that uses `hasher` for
    /// its key index.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_min_heap::IndexedMinHeap;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let mut heap = IndexedMinHeap::with_capacity_and_hasher(2, RandomState::new());
    /// heap.insert_or_update("x", 1).unwrap();
    /// assert_eq!(heap.len(), 1);
    /// ```
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        IndexedMinHeap {
            data: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity_and_hasher(capacity, hasher),
            capacity,
        }
    }

    /// Same as [`from_sorted_keys`](IndexedMinHeap::from_sorted_keys), using
    /// `hasher` for the key index.
    #[must_use]
    pub fn from_sorted_keys_with_hasher<I>(keys: I, initial_value: V, hasher: S) -> Self
    where
        I: IntoIterator<Item = K>,
        V: Clone,
    {
        let keys = keys.into_iter();
        let (lower, _) = keys.size_hint();

        let mut data: Vec<HeapNode<K, V>> = Vec::with_capacity(lower);
        let mut positions: HashMap<K, usize, S> =
            HashMap::with_capacity_and_hasher(lower, hasher);
        let mut ascending = true;

        for key in keys {
            if positions.contains_key(&key) {
                log::debug!("bulk fill skipped a repeated key");
                continue;
            }
            if let Some(last) = data.last() {
                ascending &= last.key < key;
            }
            positions.insert(key.clone(), data.len());
            data.push(HeapNode {
                key,
                value: initial_value.clone(),
            });
        }

        let capacity = data.len();
        let mut heap = IndexedMinHeap {
            data,
            positions,
            capacity,
        };

        if !ascending {
            log::debug!("bulk fill keys are not ascending, rebuilding {capacity} entries");
            heap.rebuild();
        }
        log::trace!("bulk filled heap with {capacity} keys");

        heap
    }

    /// Inserts `key` with `value`, or moves an already queued `key` to its new
    /// `value`.
    ///
    /// Returns the previous value of `key` if it was queued.
    ///
    /// # Errors
    ///
    /// Fails with [`HeapError::CapacityExceeded`] if `key` is new and the heap
    /// is full. The heap is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_min_heap::IndexedMinHeap;
    ///
    /// let mut heap = IndexedMinHeap::with_capacity(3);
    /// assert_eq!(heap.insert_or_update("x", 10), Ok(None));
    /// assert_eq!(heap.insert_or_update("x", 1), Ok(Some(10)));
    ///
    /// assert_eq!(heap.len(), 1);
    /// assert_eq!(heap.get("x"), Some(&1));
    /// ```
    ///
    /// # Time complexity
    ///
    /// *O*(log(*n*)) in both the insert and the update case.
    pub fn insert_or_update(&mut self, key: K, value: V) -> Result<Option<V>> {
        let previous = match self.positions.get(&key) {
            Some(&pos) => {
                if self.data[pos].value == value {
                    return Ok(Some(value));
                }
                log::trace!("moving key out of slot {pos} for reinsertion");
                Some(self.remove_at(pos).value)
            }
            None => {
                if self.is_full() {
                    log::debug!("rejected new key, heap is at capacity {}", self.capacity);
                    return Err(HeapError::CapacityExceeded {
                        capacity: self.capacity,
                    });
                }
                None
            }
        };

        let pos = self.data.len();
        self.positions.insert(key.clone(), pos);
        self.data.push(HeapNode { key, value });
        self.sift_up(pos);

        Ok(previous)
    }

    /// Returns the key with the smallest value.
    ///
    /// # Errors
    ///
    /// Fails with [`HeapError::EmptyQueue`] if the heap is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_min_heap::{HeapError, IndexedMinHeap};
    ///
    /// let mut heap = IndexedMinHeap::with_capacity(2);
    /// assert_eq!(heap.peek_min(), Err(HeapError::EmptyQueue));
    ///
    /// heap.insert_or_update("a", 5).unwrap();
    /// heap.insert_or_update("b", 5).unwrap();
    /// assert_eq!(heap.peek_min(), Ok(&"a"));
    /// ```
    pub fn peek_min(&self) -> Result<&K> {
        self.peek().map(|node| &node.key).ok_or(HeapError::EmptyQueue)
    }

    /// Removes the entry with the smallest value and returns it.
    ///
    /// # Errors
    ///
    /// Fails with [`HeapError::EmptyQueue`] if the heap is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_min_heap::{HeapError, HeapNode, IndexedMinHeap};
    ///
    /// let mut heap = IndexedMinHeap::from_sorted_keys([1, 3], 0);
    ///
    /// assert_eq!(heap.pop_min(), Ok(HeapNode { key: 1, value: 0 }));
    /// assert_eq!(heap.pop_min(), Ok(HeapNode { key: 3, value: 0 }));
    /// assert_eq!(heap.pop_min(), Err(HeapError::EmptyQueue));
    /// ```
    ///
    /// # Time complexity
    ///
    /// The worst case cost of `pop_min` on a heap containing *n* elements is *O*(log(*n*)).
    pub fn pop_min(&mut self) -> Result<HeapNode<K, V>> {
        if self.data.is_empty() {
            return Err(HeapError::EmptyQueue);
        }
        Ok(self.remove_at(0))
    }

    /// Returns `true` if `key` is queued.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    /// Returns the current value of `key`, or `None` if it is not queued.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.get(key).map(|&pos| &self.data[pos].value)
    }

    /// Drops every entry. The capacity stays the same.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_min_heap::IndexedMinHeap;
    /// let mut heap = IndexedMinHeap::from_sorted_keys([1, 3], ());
    ///
    /// heap.clear();
    ///
    /// assert!(heap.is_empty());
    /// assert_eq!(heap.capacity(), 2);
    /// ```
    pub fn clear(&mut self) {
        self.data.clear();
        self.positions.clear();
    }

    /// Checks heap order, the key index and the capacity bound.
    ///
    /// Every public operation keeps these intact, so this only returns `false`
    /// if a key or value changed its ordering while queued.
    pub fn check_integrity(&self) -> bool {
        if self.data.len() > self.capacity || self.positions.len() != self.data.len() {
            return false;
        }

        for (pos, node) in self.data.iter().enumerate() {
            if self.positions.get(&node.key) != Some(&pos) {
                return false;
            }
            if pos > 0 && *node < self.data[(pos - 1) / 2] {
                return false;
            }
        }
        true
    }

    /// Returns an iterator which pops entries in ascending order.
    /// This method consumes the heap.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_min_heap::IndexedMinHeap;
    ///
    /// let mut heap = IndexedMinHeap::from_sorted_keys(["a", "b", "c"], 1);
    /// heap.insert_or_update("c", 0).unwrap();
    ///
    /// let keys: Vec<_> = heap.into_iter_sorted().map(|e| e.key).collect();
    /// assert_eq!(keys, ["c", "a", "b"]);
    /// ```
    pub fn into_iter_sorted(self) -> IntoIterSorted<K, V, S> {
        IntoIterSorted { inner: self }
    }

    /// Consumes the heap and returns its entries in pop order.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_sorted_vec(self) -> Vec<HeapNode<K, V>> {
        self.into_iter_sorted().collect()
    }

    /// Takes the entry at `pos` out of the heap.
    ///
    /// The last entry fills the vacated slot and is sifted whichever way
    /// restores heap order.
    fn remove_at(&mut self, pos: usize) -> HeapNode<K, V> {
        let last = self.data.len() - 1;
        if pos != last {
            self.swap_nodes(pos, last);
        }

        let node = self.data.swap_remove(last);
        self.positions.remove(&node.key);

        if pos < last {
            let pos = self.sift_up(pos);
            self.sift_down(pos);
        }
        node
    }

    /// Moves the entry at `pos` towards the root while it is smaller than its
    /// parent. Returns its final slot.
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.data[pos] >= self.data[parent] {
                break;
            }
            self.swap_nodes(pos, parent);
            pos = parent;
        }
        pos
    }

    /// Moves the entry at `pos` towards the leaves while one of its children
    /// is smaller.
    fn sift_down(&mut self, mut pos: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break; // No children
            }
            let right = left + 1;

            let mut smallest = pos;
            if self.data[left] < self.data[smallest] {
                smallest = left;
            }
            if right < len && self.data[right] < self.data[smallest] {
                smallest = right;
            }
            if smallest == pos {
                break;
            }

            self.swap_nodes(pos, smallest);
            pos = smallest;
        }
    }

    /// Swaps two slots and points both keys at their new slots.
    ///
    /// Every reordering goes through here so `data` and `positions` never
    /// disagree.
    #[inline]
    fn swap_nodes(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
        for pos in [a, b] {
            if let Some(slot) = self.positions.get_mut(&self.data[pos].key) {
                *slot = pos;
            }
        }
    }

    fn rebuild(&mut self) {
        let mut n = self.len() / 2;
        while n > 0 {
            n -= 1;
            self.sift_down(n);
        }
    }
}

impl<K, V, S> IndexedMinHeap<K, V, S> {
    /// Returns an iterator visiting all entries in arbitrary order.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_min_heap::IndexedMinHeap;
    /// let heap = IndexedMinHeap::from_sorted_keys([1, 2, 3, 4], "idle");
    ///
    /// // Print 1, 2, 3, 4 in arbitrary order
    /// for (key, value) in heap.iter() {
    ///     println!("{key}: {value}");
    /// }
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            iter: self.data.iter(),
        }
    }

    /// Returns the entry with the smallest value, or `None` if the heap is empty.
    ///
    /// # Time complexity
    ///
    /// Cost is *O*(1) in the worst case.
    #[must_use]
    pub fn peek(&self) -> Option<&HeapNode<K, V>> {
        self.data.first()
    }

    /// Returns the number of entries the heap can hold. Fixed at construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the heap is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_min_heap::IndexedMinHeap;
    /// let mut heap = IndexedMinHeap::with_capacity(3);
    ///
    /// assert!(heap.is_empty());
    ///
    /// heap.insert_or_update("Bob", 3).unwrap();
    ///
    /// assert!(!heap.is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if another new key would exceed the capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }
}

impl<K: PartialEq, V: PartialEq, S> PartialEq for IndexedMinHeap<K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity && self.data == other.data
    }
}

impl<K: Eq, V: Eq, S> Eq for IndexedMinHeap<K, V, S> {}

/// An iterator over the entries of an `IndexedMinHeap`.
///
/// This `struct` is created by [`IndexedMinHeap::iter()`]. See its
/// documentation for more.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K: 'a, V: 'a> {
    iter: slice::Iter<'a, HeapNode<K, V>>,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.iter.as_slice()).finish()
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            iter: self.iter.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|node| (&node.key, &node.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(|node| (&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An owning iterator popping the entries of an `IndexedMinHeap` in
/// ascending order.
///
/// This `struct` is created by [`IndexedMinHeap::into_iter_sorted()`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoIterSorted<K, V, S = RandomState> {
    inner: IndexedMinHeap<K, V, S>,
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for IntoIterSorted<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIterSorted").field(&self.inner).finish()
    }
}

impl<K, V, S> Iterator for IntoIterSorted<K, V, S>
where
    K: Hash + Eq + Ord + Clone,
    V: Ord,
    S: BuildHasher,
{
    type Item = HeapNode<K, V>;

    #[inline]
    fn next(&mut self) -> Option<HeapNode<K, V>> {
        self.inner.pop_min().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let exact = self.inner.len();
        (exact, Some(exact))
    }
}

impl<K, V, S> ExactSizeIterator for IntoIterSorted<K, V, S>
where
    K: Hash + Eq + Ord + Clone,
    V: Ord,
    S: BuildHasher,
{
}

impl<K, V, S> FusedIterator for IntoIterSorted<K, V, S>
where
    K: Hash + Eq + Ord + Clone,
    V: Ord,
    S: BuildHasher,
{
}

impl<'a, K, V, S> IntoIterator for &'a IndexedMinHeap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
