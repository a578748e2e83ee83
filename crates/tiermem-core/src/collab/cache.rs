//! Assistant object cache.
//!
//! A plain key-to-value map for remote objects (assistant definitions,
//! sessions) that are expensive to recreate. No capacity bound and no
//! eviction; use [`TieredMemoryStore`](crate::TieredMemoryStore) for that.

use std::collections::HashMap;
use std::hash::Hash;

/// Unbounded key-to-value cache
#[derive(Debug, Clone)]
pub struct AssistantCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K: Eq + Hash, V> AssistantCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Return the cached value, creating it on first use
    pub fn get_or_insert_with<F>(&mut self, key: K, create: F) -> &V
    where
        F: FnOnce() -> V,
    {
        self.entries.entry(key).or_insert_with(create)
    }

    /// Fallible variant of [`get_or_insert_with`](Self::get_or_insert_with)
    pub fn get_or_try_insert_with<F, E>(&mut self, key: K, create: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        use std::collections::hash_map::Entry;

        match self.entries.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(create()?)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V> Default for AssistantCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
