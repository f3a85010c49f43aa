use super::KeyValueStore;
use std::collections::HashMap;

/// Volatile store for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_overwrite() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", "1".to_string());
        store.set("a", "2".to_string());
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("b"), None);
    }
}
