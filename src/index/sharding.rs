//! Document routing across shards.

use std::hash::{Hash, Hasher};

use ahash::AHasher;
use rand::Rng;

/// Maps a document key to the shard that owns it.
///
/// Only indexing calls are routed; queries always fan out to every shard
/// (document-level sharding). A read-only collection never consults its
/// shard function.
pub trait ShardFunction: Send + Sync {
    /// Shard index for a document key, in `0..shard_count`.
    fn shard_of(&self, key: &str, shard_count: usize) -> usize;
}

/// Default shard function: a salted hash of the key modulo the shard count.
///
/// The salt is drawn at construction so that document placement is not
/// predictable across processes; pass a fixed salt for reproducible
/// placement in tests.
#[derive(Debug, Clone)]
pub struct HashShardFunction {
    salt: u64,
}

impl HashShardFunction {
    /// Create a shard function with a random salt.
    pub fn new() -> Self {
        HashShardFunction {
            salt: rand::rng().random(),
        }
    }

    /// Create a shard function with a fixed salt.
    pub fn with_salt(salt: u64) -> Self {
        HashShardFunction { salt }
    }
}

impl Default for HashShardFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardFunction for HashShardFunction {
    fn shard_of(&self, key: &str, shard_count: usize) -> usize {
        let mut hasher = AHasher::default();
        hasher.write_u64(self.salt);
        key.hash(&mut hasher);
        (hasher.finish() % shard_count.max(1) as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_of_is_deterministic() {
        let func = HashShardFunction::with_salt(42);
        assert_eq!(func.shard_of("doc1", 4), func.shard_of("doc1", 4));
    }

    #[test]
    fn test_shard_of_in_range() {
        let func = HashShardFunction::new();
        for i in 0..100 {
            let shard = func.shard_of(&format!("doc{i}"), 3);
            assert!(shard < 3);
        }
    }

    #[test]
    fn test_salt_changes_placement() {
        let a = HashShardFunction::with_salt(1);
        let b = HashShardFunction::with_salt(2);
        let moved = (0..100)
            .filter(|i| {
                let key = format!("doc{i}");
                a.shard_of(&key, 16) != b.shard_of(&key, 16)
            })
            .count();
        assert!(moved > 0);
    }

    #[test]
    fn test_single_shard_collapses_to_zero() {
        let func = HashShardFunction::new();
        assert_eq!(func.shard_of("anything", 1), 0);
    }
}
