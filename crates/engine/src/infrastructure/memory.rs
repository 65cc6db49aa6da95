//! In-memory key/value storage.
//!
//! Used by tests and by `STORE_BACKEND=memory`. Nothing is persisted.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::infrastructure::ports::{KeyValueStore, RepoError};

#[derive(Default)]
pub struct MemoryLocalStore {
    entries: DashMap<String, String>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepoError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepoError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, RepoError> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, RepoError> {
        let mut entries: Vec<(String, String)> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort();
        Ok(entries)
    }
}
