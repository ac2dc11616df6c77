//! Generic memoizing cache
//!
//! The compute-once, remember-forever building block behind every typed
//! decode cache. There is no per-key locking: two threads racing on the
//! same key may both run the factory, and whichever insert lands first is
//! the value everyone sees afterwards. Factories are pure functions of the
//! key, so a duplicated computation wastes time but never diverges.

use dashmap::DashMap;
use std::hash::Hash;

/// Grow-only map from key to computed value.
pub struct MemoCache<K: Eq + Hash, V: Clone> {
    map: DashMap<K, V>,
}

impl<K: Eq + Hash, V: Clone> MemoCache<K, V> {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    /// Return the cached value for `key`, computing and storing it on miss.
    pub fn get_or_add(&self, key: K, factory: impl FnOnce() -> V) -> V {
        if let Some(value) = self.map.get(&key) {
            return value.clone();
        }
        let value = factory();
        self.map.entry(key).or_insert(value).clone()
    }

    /// Fallible variant: errors propagate and are not memoized.
    pub fn get_or_try_add<E>(
        &self,
        key: K,
        factory: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.map.get(&key) {
            return Ok(value.clone());
        }
        let value = factory()?;
        Ok(self.map.entry(key).or_insert(value).clone())
    }

    pub fn clear(&self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K: Eq + Hash, V: Clone> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
