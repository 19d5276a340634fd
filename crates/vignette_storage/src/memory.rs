//! In-memory key-value store for tests.

use crate::KeyValueStore;
use std::collections::HashMap;
use std::sync::Mutex;
use vignette_error::VignetteResult;

/// In-memory storage backend.
///
/// Useful as a test double wherever a [`KeyValueStore`] is injected.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> VignetteResult<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn store(&self, key: &str, value: &str) -> VignetteResult<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> VignetteResult<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}
