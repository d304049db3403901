//! The storage port.
//!
//! The host chain offers strongly consistent keyed tables with
//! get/emplace/modify/erase semantics; [`Table`] is that capability as a
//! trait. A deployment constructs its tables once and mutates them only
//! through the router operations. [`MemoryTable`] is the in-process binding
//! used by tests and embedders; chain bindings implement [`Table`] against
//! the host's own storage primitive.

use std::collections::HashMap;
use std::hash::Hash;

/// One keyed table of the host chain's storage.
///
/// Values are returned by value: the host storage owns the bytes and hands
/// out copies, so the trait does the same. Records are small (sequence
/// numbers, identities), which keeps that cheap.
pub trait Table<K, V> {
    fn get(&self, key: &K) -> Option<V>;

    /// Insert or overwrite.
    fn insert(&mut self, key: K, value: V);

    fn remove(&mut self, key: &K) -> Option<V>;

    fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

/// HashMap-backed [`Table`] binding.
#[derive(Debug, Clone)]
pub struct MemoryTable<K, V> {
    map: HashMap<K, V>,
}

impl<K, V> MemoryTable<K, V> {
    pub fn new() -> Self {
        MemoryTable {
            map: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V> Default for MemoryTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Table<K, V> for MemoryTable<K, V> {
    fn get(&self, key: &K) -> Option<V> {
        self.map.get(key).cloned()
    }

    fn insert(&mut self, key: K, value: V) {
        self.map.insert(key, value);
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.map.remove(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }
}
