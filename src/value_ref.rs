//! Identity-keyed value handles
//!
//! Stored values are shared `Arc<V>` references. Secondary buckets hold
//! `ValueRef<V>`, which hashes and compares by pointer identity: two
//! structurally equal values inserted as distinct `Arc`s are distinct members,
//! and the same `Arc` is never counted twice.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Handle to a stored value, compared by `Arc` identity
pub struct ValueRef<V>(Arc<V>);

impl<V> ValueRef<V> {
    /// Wrap a shared value
    pub fn new(value: Arc<V>) -> Self {
        ValueRef(value)
    }

    /// Borrow the underlying shared value
    pub fn as_arc(&self) -> &Arc<V> {
        &self.0
    }

    /// Unwrap into the underlying shared value
    pub fn into_arc(self) -> Arc<V> {
        self.0
    }
}

impl<V> Clone for ValueRef<V> {
    fn clone(&self) -> Self {
        ValueRef(Arc::clone(&self.0))
    }
}

impl<V> PartialEq for ValueRef<V> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<V> Eq for ValueRef<V> {}

impl<V> Hash for ValueRef<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl<V: fmt::Debug> fmt::Debug for ValueRef<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueRef").field(&self.0).finish()
    }
}

impl<V> From<Arc<V>> for ValueRef<V> {
    fn from(value: Arc<V>) -> Self {
        ValueRef(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::Set;

    #[test]
    fn test_identity_not_structure() {
        let a = Arc::new(String::from("same"));
        let b = Arc::new(String::from("same"));

        assert_eq!(ValueRef::new(a.clone()), ValueRef::new(a.clone()));
        assert_ne!(ValueRef::new(a.clone()), ValueRef::new(b.clone()));

        let mut set = Set::new();
        set.insert(ValueRef::new(a.clone()));
        set.insert(ValueRef::new(a));
        set.insert(ValueRef::new(b));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_into_arc_roundtrip() {
        let a = Arc::new(5u32);
        let handle = ValueRef::from(a.clone());
        assert!(Arc::ptr_eq(handle.as_arc(), &a));
        assert!(Arc::ptr_eq(&handle.into_arc(), &a));
    }
}
