//! strata-indexmap: an in-memory collection with multiple access paths
//!
//! This crate stores shared values under a unique primary key and lets
//! callers register named secondary indexes over derived keys at any time:
//! - Set: minimal unordered set backing index buckets and search results
//! - PrimaryIndex: primary key → value, one-to-one
//! - SecondaryIndex: IndexKey → Set of values, with multi-key ("contains") extraction
//! - IndexMap: the composite keeping every index consistent under
//!   insert/update/remove/clear, behind a single reader/writer lock
//! - SearchStream: AND/OR/EXCLUDE over several index lookups, left to right
//! - Serialization adapter: serde/JSON/bincode encoding of the primary mapping
//!
//! # Quick Start
//!
//! ```
//! use strata_indexmap::{IndexMap, PrimaryIndex, SecondaryIndex};
//!
//! struct Replica {
//!     id: i64,
//!     nodes: Vec<i64>,
//! }
//!
//! let replicas = IndexMap::new(PrimaryIndex::new(|r: &Replica| r.id));
//! replicas.add_index("node", SecondaryIndex::new(|r: &Replica| r.nodes.clone()));
//!
//! replicas.insert(Replica { id: 1, nodes: vec![1, 2, 3] });
//! replicas.insert(Replica { id: 2, nodes: vec![2, 3, 4] });
//!
//! assert_eq!(replicas.get_all_by("node", 3i64).len(), 2);
//! assert_eq!(replicas.get_all_by("node", 4i64).len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod key;
pub mod map;
pub mod search;
pub mod set;
pub mod value_ref;

pub use config::IndexMapConfig;
pub use error::{Error, Result};
pub use index::{ExtractKey, ExtractKeys, PrimaryIndex, SecondaryIndex};
pub use key::IndexKey;
pub use map::IndexMap;
pub use search::{LookupKind, SearchStream};
pub use set::Set;
pub use value_ref::ValueRef;
