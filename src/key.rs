//! Secondary index keys
//!
//! Secondary indexes are stored side by side under one map, so their keys
//! share a single hashable type. `IndexKey` is a closed set of scalar kinds.
//!
//! ## Type Rules
//!
//! - Different kinds are NEVER equal: `Int(1) != UInt(1)`, `Bytes(b"a") != Str("a")`
//! - Signed integers convert to `Int`, unsigned integers to `UInt`
//! - Floats are not keys (no total equality)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which a secondary index buckets values
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndexKey {
    /// Boolean key
    Bool(bool),
    /// 64-bit signed integer key
    Int(i64),
    /// 64-bit unsigned integer key
    UInt(u64),
    /// UTF-8 string key
    Str(String),
    /// Raw bytes key
    Bytes(Vec<u8>),
}

impl IndexKey {
    /// Get the kind name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            IndexKey::Bool(_) => "Bool",
            IndexKey::Int(_) => "Int",
            IndexKey::UInt(_) => "UInt",
            IndexKey::Str(_) => "Str",
            IndexKey::Bytes(_) => "Bytes",
        }
    }

    /// Get as str if this is a Str key
    pub fn as_str(&self) -> Option<&str> {
        match self {
            IndexKey::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int key
    pub fn as_int(&self) -> Option<i64> {
        match self {
            IndexKey::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Bool(b) => write!(f, "{}", b),
            IndexKey::Int(i) => write!(f, "{}", i),
            IndexKey::UInt(u) => write!(f, "{}u", u),
            IndexKey::Str(s) => write!(f, "{:?}", s),
            IndexKey::Bytes(b) => write!(f, "bytes[{}]", b.len()),
        }
    }
}

impl From<&str> for IndexKey {
    fn from(s: &str) -> Self {
        IndexKey::Str(s.to_string())
    }
}

impl From<String> for IndexKey {
    fn from(s: String) -> Self {
        IndexKey::Str(s)
    }
}

impl From<&String> for IndexKey {
    fn from(s: &String) -> Self {
        IndexKey::Str(s.clone())
    }
}

impl From<char> for IndexKey {
    fn from(c: char) -> Self {
        IndexKey::Str(c.to_string())
    }
}

impl From<bool> for IndexKey {
    fn from(b: bool) -> Self {
        IndexKey::Bool(b)
    }
}

impl From<i64> for IndexKey {
    fn from(i: i64) -> Self {
        IndexKey::Int(i)
    }
}

impl From<i32> for IndexKey {
    fn from(i: i32) -> Self {
        IndexKey::Int(i as i64)
    }
}

impl From<i16> for IndexKey {
    fn from(i: i16) -> Self {
        IndexKey::Int(i as i64)
    }
}

impl From<i8> for IndexKey {
    fn from(i: i8) -> Self {
        IndexKey::Int(i as i64)
    }
}

impl From<u64> for IndexKey {
    fn from(u: u64) -> Self {
        IndexKey::UInt(u)
    }
}

impl From<u32> for IndexKey {
    fn from(u: u32) -> Self {
        IndexKey::UInt(u as u64)
    }
}

impl From<u16> for IndexKey {
    fn from(u: u16) -> Self {
        IndexKey::UInt(u as u64)
    }
}

impl From<u8> for IndexKey {
    fn from(u: u8) -> Self {
        IndexKey::UInt(u as u64)
    }
}

impl From<usize> for IndexKey {
    fn from(u: usize) -> Self {
        IndexKey::UInt(u as u64)
    }
}

impl From<Vec<u8>> for IndexKey {
    fn from(b: Vec<u8>) -> Self {
        IndexKey::Bytes(b)
    }
}

impl From<&[u8]> for IndexKey {
    fn from(b: &[u8]) -> Self {
        IndexKey::Bytes(b.to_vec())
    }
}

impl From<&IndexKey> for IndexKey {
    fn from(k: &IndexKey) -> Self {
        k.clone()
    }
}
