//! In-memory key-value store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::PersistentStore;
use crate::error::Result;

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one value.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.into(), value.into());
        Self {
            inner: Mutex::new(MemoryState { values, writes: 0 }),
        }
    }

    /// Number of successful `set` calls so far.
    pub async fn write_count(&self) -> usize {
        self.inner.lock().await.writes
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.lock().await.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.inner.lock().await;
        state.values.insert(key.to_string(), value.to_string());
        state.writes += 1;
        Ok(())
    }
}
