//! HashMap-backed in-memory storage, the default back end.

use std::collections::HashMap;

use super::{Storage, Stored};

/// A simple in-memory storage implementation over a `HashMap`.
#[derive(Debug)]
pub struct MemoryStorage<V> {
    entries: HashMap<String, Stored<V>>,
}

impl<V> MemoryStorage<V> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> Default for MemoryStorage<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> Storage<V> for MemoryStorage<V> {
    fn set(&mut self, key: String, value: Option<V>, description: Option<String>) {
        self.entries.insert(key, (value, description));
    }

    fn get(&self, key: &str) -> Option<Stored<V>> {
        self.entries.get(key).cloned()
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn update(&mut self, entries: Vec<(String, Stored<V>)>) {
        self.entries.extend(entries);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn to_map(&self) -> HashMap<String, Stored<V>> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_and_contains() {
        let mut store: MemoryStorage<i32> = MemoryStorage::new();
        store.set("a".to_string(), Some(1), Some("one".to_string()));

        assert!(store.contains("a"));
        assert_eq!(store.get("a"), Some((Some(1), Some("one".to_string()))));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_set_overwrites_unconditionally() {
        let mut store: MemoryStorage<i32> = MemoryStorage::new();
        store.set("a".to_string(), Some(1), None);
        store.set("a".to_string(), Some(2), Some("replaced".to_string()));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a"), Some((Some(2), Some("replaced".to_string()))));
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let mut store: MemoryStorage<i32> = MemoryStorage::new();
        store.delete("missing");
        assert!(store.is_empty());

        store.set("a".to_string(), Some(1), None);
        store.delete("a");
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_update_and_to_map() {
        let mut store: MemoryStorage<i32> = MemoryStorage::new();
        store.set("keep".to_string(), Some(0), None);
        store.update(vec![
            ("a".to_string(), (Some(1), None)),
            ("b".to_string(), (None, Some("unset".to_string()))),
        ]);

        let snapshot = store.to_map();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot["b"], (None, Some("unset".to_string())));

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "keep"]);
    }

    #[test]
    fn test_clear() {
        let mut store: MemoryStorage<i32> = MemoryStorage::new();
        store.set("a".to_string(), Some(1), None);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }
}
