// Session-lifetime response cache.
//
// Maps a structured request key to the collection fetched for it. Entries
// are never invalidated or evicted: the key space is bounded by the number
// of leagues (and years) a user can select in one session.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// In-memory map from request key to a shared, immutable response.
#[derive(Debug)]
pub struct ResponseCache<K, V> {
    entries: HashMap<K, Arc<V>>,
}

impl<K, V> Default for ResponseCache<K, V> {
    fn default() -> Self {
        ResponseCache {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> ResponseCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.get(key).cloned()
    }

    /// Store `value` under `key`, replacing any earlier response, and return
    /// the shared handle.
    pub fn insert(&mut self, key: K, value: V) -> Arc<V> {
        let shared = Arc::new(value);
        self.entries.insert(key, Arc::clone(&shared));
        shared
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        All,
        League(i64),
    }

    #[test]
    fn empty_by_default() {
        let cache: ResponseCache<Key, Vec<u32>> = ResponseCache::new();
        assert!(cache.is_empty());
        assert!(cache.get(&Key::All).is_none());
    }

    #[test]
    fn structured_keys_are_distinct() {
        let mut cache = ResponseCache::new();
        cache.insert(Key::All, vec![1, 2, 3]);
        cache.insert(Key::League(4), vec![4]);
        assert_eq!(cache.len(), 2);
        assert_eq!(*cache.get(&Key::All).unwrap(), vec![1, 2, 3]);
        assert_eq!(*cache.get(&Key::League(4)).unwrap(), vec![4]);
        assert!(!cache.contains(&Key::League(1)));
    }

    #[test]
    fn insert_replaces_and_shares() {
        let mut cache = ResponseCache::new();
        let first = cache.insert(Key::League(1), vec![1]);
        let second = cache.insert(Key::League(1), vec![2]);
        assert_eq!(cache.len(), 1);
        assert_eq!(*first, vec![1]);
        assert!(Arc::ptr_eq(&second, &cache.get(&Key::League(1)).unwrap()));
    }
}
