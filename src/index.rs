//! Primary and secondary indexes
//!
//! This module provides the two index kinds an `IndexMap` is built from:
//! - PrimaryIndex: one-to-one mapping from an extracted key to a value
//! - SecondaryIndex: IndexKey → Set<ValueRef> for one-to-many and
//!   many-to-many ("contains") lookups
//!
//! Both are parameterized by a key-extraction capability. Closures implement
//! the capability directly; hand-written extractor types work too.
//!
//! # Stale keys
//!
//! `SecondaryIndex::remove` recomputes keys from the value's current state.
//! A value must not change its extracted keys while it is indexed, otherwise
//! removal misses the buckets it was inserted under. `IndexMap::update` and
//! `IndexMap::update_by` remove before handing a value out for modification.

use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::key::IndexKey;
use crate::set::Set;
use crate::value_ref::ValueRef;

/// Extracts the unique primary key of a value
///
/// Must be deterministic, and injective over all live values: two distinct
/// values sharing a key silently overwrite one another.
pub trait ExtractKey<V>: Send + Sync {
    /// Primary key type
    type Key;

    /// Compute the primary key of `value`
    fn extract_key(&self, value: &V) -> Self::Key;
}

impl<V, K, F> ExtractKey<V> for F
where
    F: Fn(&V) -> K + Send + Sync,
{
    type Key = K;

    fn extract_key(&self, value: &V) -> K {
        self(value)
    }
}

/// Extracts zero or more secondary keys of a value
pub trait ExtractKeys<V>: Send + Sync {
    /// Compute every key `value` is reachable under
    fn extract_keys(&self, value: &V) -> Vec<IndexKey>;
}

impl<V, F, I> ExtractKeys<V> for F
where
    F: Fn(&V) -> I + Send + Sync,
    I: IntoIterator,
    I::Item: Into<IndexKey>,
{
    fn extract_keys(&self, value: &V) -> Vec<IndexKey> {
        self(value).into_iter().map(Into::into).collect()
    }
}

/// One-to-one index: primary key → value
pub struct PrimaryIndex<K, V> {
    extractor: Box<dyn ExtractKey<V, Key = K>>,
    inner: FxHashMap<K, Arc<V>>,
}

impl<K, V> PrimaryIndex<K, V>
where
    K: Eq + Hash,
{
    /// Create a primary index over the given key extractor
    pub fn new<E>(extractor: E) -> Self
    where
        E: ExtractKey<V, Key = K> + 'static,
    {
        Self {
            extractor: Box::new(extractor),
            inner: FxHashMap::default(),
        }
    }

    /// Compute the primary key of a value without touching the index
    pub fn key_of(&self, value: &V) -> K {
        self.extractor.extract_key(value)
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &K) -> Option<&Arc<V>> {
        self.inner.get(key)
    }

    /// Check whether `key` is present
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Store `value` under its extracted key
    ///
    /// Overwrites any prior entry for that key and returns it. Detecting the
    /// overwrite is the caller's concern.
    pub fn insert(&mut self, value: Arc<V>) -> Option<Arc<V>> {
        let key = self.extractor.extract_key(&value);
        self.inner.insert(key, value)
    }

    /// Remove the entry under `key`; no-op if absent
    pub fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        self.inner.remove(key)
    }

    /// Iterate all entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Arc<V>)> {
        self.inner.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Reserve room for at least `additional` more entries
    pub fn reserve(&mut self, additional: usize) {
        self.inner.reserve(additional);
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<K, V> fmt::Debug for PrimaryIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimaryIndex")
            .field("len", &self.inner.len())
            .finish()
    }
}

/// Many-valued index: IndexKey → Set of values
///
/// A value may register under several keys, which gives "contains"
/// semantics for collection-valued attributes.
pub struct SecondaryIndex<V> {
    extractor: Box<dyn ExtractKeys<V>>,
    inner: FxHashMap<IndexKey, Set<ValueRef<V>>>,
}

impl<V> SecondaryIndex<V> {
    /// Create a secondary index over the given keys extractor
    pub fn new<E>(extractor: E) -> Self
    where
        E: ExtractKeys<V> + 'static,
    {
        Self {
            extractor: Box::new(extractor),
            inner: FxHashMap::default(),
        }
    }

    /// Compute the keys of a value without touching the index
    pub fn keys_of(&self, value: &V) -> Vec<IndexKey> {
        self.extractor.extract_keys(value)
    }

    /// Get the bucket for `key`, or None if no value is indexed under it
    pub fn get(&self, key: &IndexKey) -> Option<&Set<ValueRef<V>>> {
        self.inner.get(key)
    }

    /// Snapshot the values indexed under `key`, unordered
    pub fn get_all(&self, key: &IndexKey) -> Vec<Arc<V>> {
        self.inner
            .get(key)
            .map(|bucket| bucket.iter().map(|v| Arc::clone(v.as_arc())).collect())
            .unwrap_or_default()
    }

    /// Add `value` under every key its extractor returns
    ///
    /// Buckets are created on first use.
    pub fn insert(&mut self, value: &Arc<V>) {
        for key in self.extractor.extract_keys(value) {
            self.inner
                .entry(key)
                .or_default()
                .insert(ValueRef::new(Arc::clone(value)));
        }
    }

    /// Remove `value` from every key its extractor currently returns
    ///
    /// Buckets that become empty are dropped so the index does not
    /// accumulate empty sets.
    pub fn remove(&mut self, value: &Arc<V>) {
        let handle = ValueRef::new(Arc::clone(value));
        for key in self.extractor.extract_keys(value) {
            if let Some(bucket) = self.inner.get_mut(&key) {
                bucket.remove(&handle);
                if bucket.is_empty() {
                    self.inner.remove(&key);
                }
            }
        }
    }

    /// Number of distinct keys with at least one value
    pub fn key_count(&self) -> usize {
        self.inner.len()
    }

    /// Check if no value is indexed
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every bucket
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<V> fmt::Debug for SecondaryIndex<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecondaryIndex")
            .field("key_count", &self.inner.len())
            .finish()
    }
}
