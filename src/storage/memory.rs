//! In-memory key-value map implementation.

use std::hash::Hash;

use ahash::AHashMap;

use crate::error::Result;
use crate::storage::KeyValueMap;

/// An in-memory [`KeyValueMap`] backed by a hash map.
///
/// The default backend for index engines; also useful in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryMap<K, V> {
    entries: AHashMap<K, V>,
}

impl<K, V> MemoryMap<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        MemoryMap {
            entries: AHashMap::new(),
        }
    }
}

impl<K, V> KeyValueMap<K, V> for MemoryMap<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: K, value: V) -> Result<()> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn entries(&self) -> Vec<(K, V)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut map: MemoryMap<String, u64> = MemoryMap::new();
        assert!(map.is_empty());

        map.put("a".to_string(), 1).unwrap();
        map.put("b".to_string(), 2).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"a".to_string()), Some(1));

        map.put("a".to_string(), 10).unwrap();
        assert_eq!(map.get(&"a".to_string()), Some(10));

        map.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn test_entries_snapshot() {
        let mut map: MemoryMap<u64, String> = MemoryMap::new();
        map.put(0, "doc0".to_string()).unwrap();
        map.put(1, "doc1".to_string()).unwrap();

        let mut entries = map.entries();
        entries.sort();
        assert_eq!(
            entries,
            vec![(0, "doc0".to_string()), (1, "doc1".to_string())]
        );
    }
}
