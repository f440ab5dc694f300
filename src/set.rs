//! Minimal unordered set
//!
//! `Set<T>` backs every secondary index bucket and the search accumulator.
//! All mutating operations are idempotent: inserting a present element or
//! removing an absent one is a no-op.

use rustc_hash::FxHashSet;
use std::fmt;
use std::hash::Hash;

/// Unordered collection of unique elements
pub struct Set<T> {
    inner: FxHashSet<T>,
}

impl<T: Eq + Hash> Set<T> {
    /// Create a new empty Set
    pub fn new() -> Self {
        Self {
            inner: FxHashSet::default(),
        }
    }

    /// Create an empty Set with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Check whether a single element is present
    pub fn contains(&self, elem: &T) -> bool {
        self.inner.contains(elem)
    }

    /// Check whether every given element is present
    ///
    /// Vacuously true for an empty input.
    pub fn contains_all<'a, I>(&self, elems: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        elems.into_iter().all(|elem| self.inner.contains(elem))
    }

    /// Insert an element, returning true if it was not already present
    pub fn insert(&mut self, elem: T) -> bool {
        self.inner.insert(elem)
    }

    /// Remove an element, returning true if it was present
    pub fn remove(&mut self, elem: &T) -> bool {
        self.inner.remove(elem)
    }

    /// Remove every given element; absent elements are skipped
    pub fn remove_all<'a, I>(&mut self, elems: I)
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        for elem in elems {
            self.inner.remove(elem);
        }
    }

    /// Iterate the elements in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.iter()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Keep only the elements also present in `other`
    pub fn intersect_with(&mut self, other: &Set<T>) {
        self.inner.retain(|elem| other.inner.contains(elem));
    }

    /// Drop every element present in `other`
    pub fn difference_with(&mut self, other: &Set<T>) {
        if other.len() < self.len() {
            for elem in other.iter() {
                self.inner.remove(elem);
            }
        } else {
            self.inner.retain(|elem| !other.inner.contains(elem));
        }
    }

    /// Consume the set into its elements, unordered
    pub fn into_vec(self) -> Vec<T> {
        self.inner.into_iter().collect()
    }
}

impl<T: Eq + Hash + Clone> Set<T> {
    /// Snapshot the elements into a Vec, unordered
    pub fn collect(&self) -> Vec<T> {
        self.inner.iter().cloned().collect()
    }

    /// Add every element of `other`
    pub fn union_with(&mut self, other: &Set<T>) {
        self.inner.extend(other.inner.iter().cloned());
    }
}

impl<T: Eq + Hash> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> Clone for Set<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inner.iter()).finish()
    }
}

impl<T: Eq + Hash> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl<T: Eq + Hash> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = std::collections::hash_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains() {
        let mut set = Set::new();
        assert!(set.insert(1));
        assert!(set.insert(2));
        assert!(!set.insert(1));

        assert!(set.contains(&1));
        assert!(set.contains_all(&[1, 2]));
        assert!(!set.contains_all(&[1, 3]));
        assert!(set.contains_all(&[]));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut set: Set<i32> = [1, 2, 3].into_iter().collect();
        assert!(set.remove(&2));
        assert!(!set.remove(&2));
        set.remove_all(&[1, 9]);
        assert_eq!(set.collect(), vec![3]);
    }

    #[test]
    fn test_collect_snapshot() {
        let set: Set<&str> = ["a", "b"].into_iter().collect();
        let mut elems = set.collect();
        elems.sort();
        assert_eq!(elems, vec!["a", "b"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_set_algebra() {
        let base: Set<i32> = [1, 2, 3, 4].into_iter().collect();
        let other: Set<i32> = [3, 4, 5].into_iter().collect();

        let mut union = base.clone();
        union.union_with(&other);
        let mut elems = union.into_vec();
        elems.sort();
        assert_eq!(elems, vec![1, 2, 3, 4, 5]);

        let mut inter = base.clone();
        inter.intersect_with(&other);
        let mut elems = inter.into_vec();
        elems.sort();
        assert_eq!(elems, vec![3, 4]);

        let mut diff = base.clone();
        diff.difference_with(&other);
        let mut elems = diff.into_vec();
        elems.sort();
        assert_eq!(elems, vec![1, 2]);
    }

    #[test]
    fn test_intersect_with_empty() {
        let mut set: Set<i32> = [1, 2].into_iter().collect();
        set.intersect_with(&Set::new());
        assert!(set.is_empty());
    }

    #[test]
    fn test_default_and_clear() {
        let mut set: Set<u8> = Set::default();
        assert!(set.is_empty());
        set.extend([1, 2, 3]);
        set.clear();
        assert_eq!(set.len(), 0);
    }
}
