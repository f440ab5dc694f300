//! IndexMap: a primary index plus named secondary indexes kept in sync
//!
//! # Design Notes
//!
//! - **One lock for the whole composite**: a single `parking_lot::RwLock` guards
//!   the primary index and every secondary index as one critical section.
//!   Reads take it shared, mutations take it exclusive.
//! - **Lock-free core**: all bookkeeping lives on `MapCore`, which never locks.
//!   Each public `IndexMap` method acquires the lock exactly once and then
//!   calls into the core, so no call path re-acquires the (non-reentrant) lock.
//! - **Remove before write**: inserting under an existing primary key first
//!   removes the old value from every secondary index, so a logically updated
//!   value never leaves a stale bucket entry behind.
//! - **Unknown index names are not errors**: every read and mutation addressed
//!   by index name treats an unknown name as an empty match.
//!
//! # Callbacks
//!
//! `update`, `update_by` and `range` run their callbacks while the lock is
//! held. A callback must not call back into the same map from the same thread;
//! doing so deadlocks.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::config::IndexMapConfig;
use crate::error::{Error, Result};
use crate::index::{PrimaryIndex, SecondaryIndex};
use crate::key::IndexKey;
use crate::search::SearchStream;
use crate::set::Set;
use crate::value_ref::ValueRef;

/// Primary index and secondary indexes, with no locking of its own
pub(crate) struct MapCore<K, V> {
    primary: PrimaryIndex<K, V>,
    indexes: FxHashMap<String, SecondaryIndex<V>>,
}

impl<K, V> MapCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(primary: PrimaryIndex<K, V>) -> Self {
        Self {
            primary,
            indexes: FxHashMap::default(),
        }
    }

    /// Register and backfill; returns the backfilled count, None if taken
    fn add_index(&mut self, name: String, mut index: SecondaryIndex<V>) -> Option<usize> {
        if self.indexes.contains_key(&name) {
            return None;
        }

        for (_, value) in self.primary.iter() {
            index.insert(value);
        }
        self.indexes.insert(name, index);

        Some(self.primary.len())
    }

    pub(crate) fn get(&self, key: &K) -> Option<&Arc<V>> {
        self.primary.get(key)
    }

    pub(crate) fn bucket(&self, index_name: &str, key: &IndexKey) -> Option<&Set<ValueRef<V>>> {
        self.indexes.get(index_name)?.get(key)
    }

    pub(crate) fn get_all_by(&self, index_name: &str, key: &IndexKey) -> Vec<Arc<V>> {
        self.indexes
            .get(index_name)
            .map(|index| index.get_all(key))
            .unwrap_or_default()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &Arc<V>)> {
        self.primary.iter()
    }

    pub(crate) fn key_of(&self, value: &V) -> K {
        self.primary.key_of(value)
    }

    pub(crate) fn len(&self) -> usize {
        self.primary.len()
    }

    pub(crate) fn insert(&mut self, value: Arc<V>) -> Option<Arc<V>> {
        let key = self.primary.key_of(&value);
        if let Some(old) = self.primary.get(&key) {
            for index in self.indexes.values_mut() {
                index.remove(old);
            }
        }

        let displaced = self.primary.insert(Arc::clone(&value));
        for index in self.indexes.values_mut() {
            index.insert(&value);
        }

        displaced
    }

    fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        let value = self.primary.remove(key)?;
        for index in self.indexes.values_mut() {
            index.remove(&value);
        }
        Some(value)
    }

    /// Detach every value matching `(index_name, key)` from all indexes
    fn take_matching(&mut self, index_name: &str, key: &IndexKey) -> Vec<Arc<V>> {
        let matched = self.get_all_by(index_name, key);
        for value in &matched {
            let primary_key = self.primary.key_of(value);
            self.remove(&primary_key);
        }
        matched
    }

    fn clear(&mut self) {
        self.primary.clear();
        for index in self.indexes.values_mut() {
            index.clear();
        }
    }
}

/// Collection of shared values reachable by primary key and by any number of
/// named secondary indexes
///
/// # Example
///
/// ```
/// use strata_indexmap::{IndexMap, PrimaryIndex, SecondaryIndex};
///
/// struct Person {
///     id: i64,
///     city: String,
/// }
///
/// let persons = IndexMap::new(PrimaryIndex::new(|p: &Person| p.id));
/// persons.add_index("city", SecondaryIndex::new(|p: &Person| [p.city.clone()]));
///
/// persons.insert(Person { id: 1, city: "SF".into() });
/// persons.insert(Person { id: 2, city: "SF".into() });
///
/// assert_eq!(persons.get_all_by("city", "SF").len(), 2);
/// assert!(persons.get(&1).is_some());
/// ```
pub struct IndexMap<K, V> {
    core: RwLock<MapCore<K, V>>,
    config: IndexMapConfig,
}

impl<K, V> IndexMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an IndexMap over a primary index with default configuration
    pub fn new(primary: PrimaryIndex<K, V>) -> Self {
        Self::with_config(primary, IndexMapConfig::default())
    }

    /// Create an IndexMap over a primary index with the given configuration
    pub fn with_config(mut primary: PrimaryIndex<K, V>, config: IndexMapConfig) -> Self {
        primary.reserve(config.initial_capacity);
        Self {
            core: RwLock::new(MapCore::new(primary)),
            config,
        }
    }

    /// The configuration this map was created with
    pub fn config(&self) -> &IndexMapConfig {
        &self.config
    }

    pub(crate) fn read_core(&self) -> RwLockReadGuard<'_, MapCore<K, V>> {
        self.core.read()
    }

    pub(crate) fn write_core(&self) -> RwLockWriteGuard<'_, MapCore<K, V>> {
        self.core.write()
    }

    // ========================================
    // Index registration
    // ========================================

    /// Register a secondary index under `name`
    ///
    /// Every value already stored is inserted into the new index before this
    /// returns. Returns false, leaving the existing index untouched, if `name`
    /// is already registered.
    pub fn add_index(&self, name: impl Into<String>, index: SecondaryIndex<V>) -> bool {
        self.try_add_index(name, index).is_ok()
    }

    /// Register a secondary index under `name`, failing on a duplicate name
    pub fn try_add_index(&self, name: impl Into<String>, index: SecondaryIndex<V>) -> Result<()> {
        let name = name.into();
        let mut core = self.core.write();

        match core.add_index(name.clone(), index) {
            Some(backfilled) => {
                debug!(
                    target: "strata::indexmap",
                    map = %self.config.name,
                    index = %name,
                    backfilled,
                    "Registered secondary index"
                );
                Ok(())
            }
            None => {
                warn!(
                    target: "strata::indexmap",
                    map = %self.config.name,
                    index = %name,
                    "Secondary index already registered"
                );
                Err(Error::IndexExists(name))
            }
        }
    }

    /// Check whether a secondary index is registered under `name`
    pub fn has_index(&self, name: &str) -> bool {
        self.core.read().indexes.contains_key(name)
    }

    /// Names of all registered secondary indexes, sorted
    pub fn index_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.core.read().indexes.keys().cloned().collect();
        names.sort();
        names
    }

    // ========================================
    // Reads
    // ========================================

    /// Get the value stored under the primary key
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.core.read().get(key).cloned()
    }

    /// Get one of the values indexed under `key` in `index_name`
    ///
    /// No guarantee which one is returned when several match. None if the
    /// index is unknown or nothing matches.
    pub fn get_by(&self, index_name: &str, key: impl Into<IndexKey>) -> Option<Arc<V>> {
        let key = key.into();
        let core = self.core.read();
        let any = core
            .bucket(index_name, &key)?
            .iter()
            .next()
            .map(|value| Arc::clone(value.as_arc()));
        any
    }

    /// Get all values indexed under `key` in `index_name`, unordered
    ///
    /// Empty if the index is unknown or nothing matches.
    pub fn get_all_by(&self, index_name: &str, key: impl Into<IndexKey>) -> Vec<Arc<V>> {
        self.core.read().get_all_by(index_name, &key.into())
    }

    /// Check whether a value is stored under the primary key
    pub fn contains_key(&self, key: &K) -> bool {
        self.core.read().primary.contains_key(key)
    }

    /// Visit every entry in no particular order; stops when `f` returns false
    ///
    /// `f` runs under the shared lock and must not call back into the same
    /// map. A nested read can deadlock behind a queued writer.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &Arc<V>) -> bool,
    {
        let core = self.core.read();
        for (key, value) in core.iter() {
            if !f(key, value) {
                return;
            }
        }
    }

    /// Snapshot all keys and values; `keys[i]` is the key of `values[i]`
    pub fn collect(&self) -> (Vec<K>, Vec<Arc<V>>) {
        let core = self.core.read();
        let mut keys = Vec::with_capacity(core.len());
        let mut values = Vec::with_capacity(core.len());
        for (key, value) in core.iter() {
            keys.push(key.clone());
            values.push(Arc::clone(value));
        }
        (keys, values)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.core.read().len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a chained search over the secondary indexes
    pub fn search(&self) -> SearchStream<'_, K, V> {
        SearchStream::new(self)
    }

    // ========================================
    // Mutations
    // ========================================

    /// Insert a value, replacing any value stored under the same primary key
    ///
    /// The replaced value is removed from every secondary index before the new
    /// one is indexed, and is returned.
    pub fn insert(&self, value: impl Into<Arc<V>>) -> Option<Arc<V>> {
        self.core.write().insert(value.into())
    }

    /// Insert values in order under one exclusive lock
    ///
    /// Later values overwrite earlier ones sharing a primary key.
    pub fn insert_many<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<V>>,
    {
        let mut core = self.core.write();
        let mut inserted = 0usize;
        for value in values {
            core.insert(value.into());
            inserted += 1;
        }
        trace!(target: "strata::indexmap", map = %self.config.name, inserted, "insert_many");
    }

    /// Replace the value under `key` through `f`
    ///
    /// The current value (if any) is removed from every index, then passed to
    /// `f`, which returns `(new_value, changed)`. The new value is inserted only
    /// when `changed` is true and it is present. Returning `changed = false`
    /// therefore deletes the entry: hand the value back with `changed = true`
    /// to keep it. Returns whether a value was inserted.
    ///
    /// `f` runs under the exclusive lock and must not touch this map.
    pub fn update<F>(&self, key: &K, f: F) -> bool
    where
        F: FnOnce(Option<Arc<V>>) -> (Option<Arc<V>>, bool),
    {
        let mut core = self.core.write();
        let old = core.remove(key);
        match f(old) {
            (Some(value), true) => {
                core.insert(value);
                true
            }
            _ => false,
        }
    }

    /// Replace every value matching `(index_name, key)` through `f`
    ///
    /// All matches are removed first, then each is passed to `f` and
    /// re-inserted when `f` reports a change and returns a value. Updated values
    /// must keep distinct primary keys or they overwrite one another. Returns
    /// the number of values re-inserted.
    ///
    /// `f` runs under the exclusive lock and must not touch this map.
    pub fn update_by<F>(&self, index_name: &str, key: impl Into<IndexKey>, mut f: F) -> usize
    where
        F: FnMut(Arc<V>) -> (Option<Arc<V>>, bool),
    {
        let key = key.into();
        let mut core = self.core.write();
        let matched = core.take_matching(index_name, &key);
        let total = matched.len();

        let mut reinserted = 0;
        for value in matched {
            if let (Some(value), true) = f(value) {
                core.insert(value);
                reinserted += 1;
            }
        }

        trace!(
            target: "strata::indexmap",
            map = %self.config.name,
            index = index_name,
            %key,
            matched = total,
            reinserted,
            "update_by"
        );
        reinserted
    }

    /// Remove the value under the primary key from every index
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.core.write().remove(key)
    }

    /// Remove the values under each primary key; returns how many existed
    pub fn remove_many<'a, I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut core = self.core.write();
        keys.into_iter()
            .filter(|key| core.remove(key).is_some())
            .count()
    }

    /// Remove every value matching any of `keys` in `index_name`
    ///
    /// Returns the number of values removed; zero for an unknown index.
    pub fn remove_by<I>(&self, index_name: &str, keys: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<IndexKey>,
    {
        let mut core = self.core.write();
        let removed: usize = keys
            .into_iter()
            .map(|key| core.take_matching(index_name, &key.into()).len())
            .sum();

        trace!(
            target: "strata::indexmap",
            map = %self.config.name,
            index = index_name,
            removed,
            "remove_by"
        );
        removed
    }

    /// Remove every value from the primary index and all secondary indexes
    ///
    /// Registered indexes stay registered.
    pub fn clear(&self) {
        let mut core = self.core.write();
        let cleared = core.len();
        core.clear();
        debug!(target: "strata::indexmap", map = %self.config.name, cleared, "Cleared index map");
    }
}

impl<K, V> fmt::Debug for IndexMap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexMap")
            .field("name", &self.config.name)
            .field("len", &self.len())
            .field("indexes", &self.index_names())
            .finish()
    }
}
