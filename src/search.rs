//! Chained multi-index search
//!
//! A `SearchStream` records lookup steps and evaluates them strictly in the
//! order they were chained. Each step's own result is the union of its keys'
//! buckets; the step then folds into an accumulator that starts EMPTY:
//!
//! - `and`: intersection (a leading `and` therefore always yields nothing)
//! - `or`: union
//! - `exclude`: difference
//!
//! An unknown index name contributes an empty step result.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::key::IndexKey;
use crate::map::{IndexMap, MapCore};
use crate::set::Set;
use crate::value_ref::ValueRef;

/// How a lookup step combines with the accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Set intersection
    And,
    /// Set union
    Or,
    /// Set difference
    Exclude,
}

#[derive(Debug, Clone)]
struct IndexLookup {
    kind: LookupKind,
    index_name: String,
    keys: SmallVec<[IndexKey; 4]>,
}

impl IndexLookup {
    fn evaluate<K, V>(&self, core: &MapCore<K, V>) -> Set<ValueRef<V>>
    where
        K: Eq + Hash + Clone,
    {
        let mut result = Set::new();
        for key in &self.keys {
            if let Some(bucket) = core.bucket(&self.index_name, key) {
                result.union_with(bucket);
            }
        }
        result
    }
}

/// Single-use query builder over one `IndexMap`
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
/// persons.insert_many([
///     Person { id: 1, city: "SF".into() },
///     Person { id: 2, city: "Shanghai".into() },
/// ]);
///
/// let found = persons.search().or("city", ["SF", "Shanghai"]).execute();
/// assert_eq!(found.len(), 2);
/// ```
#[must_use = "a search does nothing until executed"]
pub struct SearchStream<'a, K, V> {
    map: &'a IndexMap<K, V>,
    chain: Vec<IndexLookup>,
}

impl<'a, K, V> SearchStream<'a, K, V>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(map: &'a IndexMap<K, V>) -> Self {
        Self {
            map,
            chain: Vec::new(),
        }
    }

    fn push<I>(mut self, kind: LookupKind, index_name: &str, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<IndexKey>,
    {
        self.chain.push(IndexLookup {
            kind,
            index_name: index_name.to_string(),
            keys: keys.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Keep only accumulated values also matching any of `keys`
    pub fn and<I>(self, index_name: &str, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<IndexKey>,
    {
        self.push(LookupKind::And, index_name, keys)
    }

    /// Add values matching any of `keys`
    pub fn or<I>(self, index_name: &str, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<IndexKey>,
    {
        self.push(LookupKind::Or, index_name, keys)
    }

    /// Drop accumulated values matching any of `keys`
    pub fn exclude<I>(self, index_name: &str, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<IndexKey>,
    {
        self.push(LookupKind::Exclude, index_name, keys)
    }

    /// Number of chained steps
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Check if no step has been chained
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Evaluate the chain under one shared lock; result is unordered
    pub fn execute(self) -> Vec<Arc<V>> {
        let mut acc: Set<ValueRef<V>> = Set::new();
        {
            let core = self.map.read_core();
            for lookup in &self.chain {
                let result = lookup.evaluate(&*core);
                match lookup.kind {
                    LookupKind::And => acc.intersect_with(&result),
                    LookupKind::Or => acc.union_with(&result),
                    LookupKind::Exclude => acc.difference_with(&result),
                }
            }
        }
        acc.into_iter().map(ValueRef::into_arc).collect()
    }
}

impl<K, V> fmt::Debug for SearchStream<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchStream")
            .field("chain", &self.chain)
            .finish()
    }
}
