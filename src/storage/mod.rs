//! Pluggable key-value map backends for index state.
//!
//! Every store owned by an index engine (postings, bimaps, statistics) sits
//! behind [`KeyValueMap`], which exposes only whole-value get/put. `get`
//! returns an owned copy, never a reference into the store, so callers
//! cannot mutate stored values in place: every update is an explicit
//! read-modify-write-replace. This keeps the engine compatible with
//! backends that only support whole-value semantics, such as persistent or
//! remote key-value stores.

pub mod memory;

pub use memory::MemoryMap;

use crate::error::Result;

/// A key-value map supporting only whole-value access.
///
/// Implementations may be in-memory, on-disk, or remote. The contract is
/// that `put` replaces the stored value wholesale and `get` hands back an
/// owned copy of it.
pub trait KeyValueMap<K, V>: Send + Sync {
    /// Get an owned copy of the value for a key, if present.
    fn get(&self, key: &K) -> Option<V>;

    /// Store a value under a key, replacing any previous value wholesale.
    fn put(&mut self, key: K, value: V) -> Result<()>;

    /// Check whether a key is present.
    fn contains(&self, key: &K) -> bool;

    /// Number of entries in the map.
    fn len(&self) -> usize;

    /// Whether the map is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all entries.
    fn clear(&mut self);

    /// An owned snapshot of every entry, for statistics export.
    fn entries(&self) -> Vec<(K, V)>;
}
