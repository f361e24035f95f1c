//! In-memory storage backend.
//!
//! Used by tests and demos. Nothing survives process exit.

use dashmap::DashMap;

use homegrid_core::storage::{Result, StorageBackend};

use super::namespaced_key;

/// Non-persistent backend over a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries across all tables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn write(&self, table: &str, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(namespaced_key(table, key), value.to_vec());
        Ok(())
    }

    fn read(&self, table: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .entries
            .get(&namespaced_key(table, key))
            .map(|entry| entry.value().clone()))
    }

    fn delete(&self, table: &str, key: &str) -> Result<bool> {
        Ok(self.entries.remove(&namespaced_key(table, key)).is_some())
    }

    fn scan(&self, table: &str, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let full_prefix = namespaced_key(table, prefix);
        let strip = table.len() + 1;

        let mut results: Vec<(String, Vec<u8>)> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(&full_prefix))
            .map(|entry| (entry.key()[strip..].to_string(), entry.value().clone()))
            .collect();
        // DashMap iteration order is arbitrary; keep scans deterministic.
        results.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(results)
    }

    fn write_batch(&self, table: &str, items: Vec<(String, Vec<u8>)>) -> Result<()> {
        for (key, value) in items {
            self.entries.insert(namespaced_key(table, &key), value);
        }
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
