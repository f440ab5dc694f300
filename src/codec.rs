//! Serialization adapter
//!
//! Only the primary key → value mapping is encoded; secondary index structure
//! is never serialized. Decoding rebuilds index state by inserting every
//! decoded value through the normal insert path, so indexes registered before
//! decoding are backfilled.
//!
//! Decoding parses the whole payload before touching the map: a malformed
//! payload fails without modifying it.

use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::error::Result;
use crate::map::IndexMap;

impl<K, V> Serialize for IndexMap<K, V>
where
    K: Eq + Hash + Clone + Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let core = self.read_core();
        let mut map = serializer.serialize_map(Some(core.len()))?;
        for (key, value) in core.iter() {
            map.serialize_entry(key, value.as_ref())?;
        }
        map.end()
    }
}

impl<K, V> IndexMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Decode a key → value mapping and insert every value
    ///
    /// Primary keys are re-extracted from the values; a payload key that
    /// disagrees with its value's extracted key is logged and ignored.
    /// Existing entries are kept unless a decoded value shares their key.
    /// Returns the number of decoded entries; entries whose values share a
    /// primary key collapse into one stored value, so this can exceed the
    /// growth of `len()`.
    pub fn decode_from<'de, D>(&self, deserializer: D) -> std::result::Result<usize, D::Error>
    where
        D: Deserializer<'de>,
        K: Deserialize<'de>,
        V: Deserialize<'de>,
    {
        let entries = FxHashMap::<K, V>::deserialize(deserializer)?;
        Ok(self.absorb(entries))
    }

    fn absorb(&self, entries: FxHashMap<K, V>) -> usize {
        let mut core = self.write_core();
        let mut mismatched = 0usize;
        let count = entries.len();

        for (key, value) in entries {
            if core.key_of(&value) != key {
                mismatched += 1;
            }
            core.insert(Arc::new(value));
        }

        if mismatched > 0 {
            warn!(
                target: "strata::indexmap",
                map = %self.config().name,
                mismatched,
                "Decoded keys disagree with extracted primary keys"
            );
        }
        debug!(target: "strata::indexmap", map = %self.config().name, count, "Decoded entries");
        count
    }

    /// Encode the primary mapping as JSON
    pub fn to_json(&self) -> Result<Vec<u8>>
    where
        K: Serialize,
        V: Serialize,
    {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a JSON object of key → value and insert every value
    pub fn load_json(&self, bytes: &[u8]) -> Result<usize>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        let entries: FxHashMap<K, V> = serde_json::from_slice(bytes)?;
        Ok(self.absorb(entries))
    }

    /// Encode the primary mapping with bincode
    pub fn to_bincode(&self) -> Result<Vec<u8>>
    where
        K: Serialize,
        V: Serialize,
    {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a bincode-encoded mapping and insert every value
    pub fn load_bincode(&self, bytes: &[u8]) -> Result<usize>
    where
        K: DeserializeOwned,
        V: DeserializeOwned,
    {
        let entries: FxHashMap<K, V> = bincode::deserialize(bytes)?;
        Ok(self.absorb(entries))
    }
}
