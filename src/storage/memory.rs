use super::contract::{StateKey, StateStore};
use crate::error::StorageError;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Volatile store, for tests and dry runs.
#[derive(Default)]
pub struct MemoryStateStore {
    blobs: RwLock<HashMap<StateKey, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, key: StateKey) -> Result<Option<String>, StorageError> {
        Ok(self.blobs.read().get(&key).cloned())
    }

    fn save(&self, key: StateKey, blob: &str) -> Result<(), StorageError> {
        self.blobs.write().insert(key, blob.to_string());
        Ok(())
    }

    fn clear(&self, key: StateKey) -> Result<(), StorageError> {
        self.blobs.write().remove(&key);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
