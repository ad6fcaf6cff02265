use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// A map split into a fixed number of independently locked shards.
///
/// Used by the parallel scorer so that concurrent contributions to the same
/// document id serialize only at shard granularity. At most one shard lock is
/// held at a time, so no lock ordering is required.
pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<HashMap<K, V>>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Hash + Eq,
    V: Default,
{
    /// Create a map with `bucket_count` shards (at least one).
    pub fn new(bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        Self {
            shards: (0..bucket_count).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    fn shard_index(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    /// Lock the key's shard and return a guard over its value,
    /// default-inserting when absent. The lock is released when the guard
    /// drops.
    pub fn access(&self, key: K) -> MappedMutexGuard<'_, V> {
        let guard = self.shards[self.shard_index(&key)].lock();
        MutexGuard::map(guard, |shard| shard.entry(key).or_default())
    }

    /// Remove the key from its shard; returns whether it was present.
    pub fn erase(&self, key: &K) -> bool {
        self.shards[self.shard_index(key)].lock().remove(key).is_some()
    }

    /// Drain every shard into one plain map. Consumes the accumulator, so a
    /// merge can never interleave with further writes.
    pub fn into_plain_map(self) -> HashMap<K, V> {
        let mut merged = HashMap::new();
        for shard in self.shards {
            merged.extend(shard.into_inner());
        }
        merged
    }

    /// Number of shards this map was built with.
    pub fn bucket_count(&self) -> usize {
        self.shards.len()
    }
}
