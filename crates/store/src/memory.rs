//! In-process store for tests, development and the demo binary.

use std::collections::HashMap;

use crate::kv::{StateStore, StorageKey, StoreError};

/// HashMap-backed store. Not durable; contents die with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<&'static str, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key.as_str()).cloned())
    }

    fn write(&mut self, key: StorageKey, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.as_str(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let mut store = MemoryStore::new();
        store.write(StorageKey::Language, "\"en\"").unwrap();
        assert_eq!(
            store.read(StorageKey::Language).unwrap().as_deref(),
            Some("\"en\"")
        );
        assert_eq!(store.read(StorageKey::Products).unwrap(), None);
    }
}
