//! Redb storage backend.
//!
//! Persistent storage using the redb embedded database: one unified table
//! with namespaced keys, plus an optional write-through LRU cache for hot
//! keys.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::RwLock as StdRwLock;

use lru::LruCache;
use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};

use homegrid_core::storage::{Result, StorageBackend, StorageError};

use super::namespaced_key;

const UNIFIED_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("homegrid");

const DEFAULT_CACHE_ENTRIES: usize = 1024;

fn backend_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Backend(e.to_string())
}

/// Configuration for [`RedbBackend`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedbConfig {
    /// Path to the database file.
    pub path: PathBuf,

    /// Create parent directories if they don't exist.
    #[serde(default = "default_create_dirs")]
    pub create_dirs: bool,

    /// LRU cache capacity in entries. 0 disables caching.
    #[serde(default = "default_cache_entries")]
    pub cache_entries: usize,
}

fn default_create_dirs() -> bool {
    true
}

fn default_cache_entries() -> usize {
    DEFAULT_CACHE_ENTRIES
}

impl RedbConfig {
    /// Create a config for the given database path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create_dirs: true,
            cache_entries: DEFAULT_CACHE_ENTRIES,
        }
    }

    /// Set whether to create parent directories.
    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    /// Set the cache capacity. 0 disables caching.
    pub fn with_cache_entries(mut self, entries: usize) -> Self {
        self.cache_entries = entries;
        self
    }
}

/// Persistent backend over a redb database file.
pub struct RedbBackend {
    db: Database,
    path: PathBuf,
    cache: Option<StdRwLock<LruCache<String, Vec<u8>>>>,
}

impl RedbBackend {
    /// Open or create a database with the given configuration.
    pub fn new(config: RedbConfig) -> Result<Self> {
        if config.create_dirs {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
                }
            }
        }

        let db = if config.path.exists() {
            Database::open(&config.path).map_err(backend_err)?
        } else {
            Database::create(&config.path).map_err(backend_err)?
        };

        let cache = NonZeroUsize::new(config.cache_entries)
            .map(|capacity| StdRwLock::new(LruCache::new(capacity)));

        Ok(Self {
            db,
            path: config.path,
            cache,
        })
    }

    /// Open or create a database at the given path with default settings.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(RedbConfig::new(path.as_ref()))
    }

    /// The database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cache_put(&self, key: String, value: Vec<u8>) {
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.write() {
                cache.put(key, value);
            }
        }
    }

    fn cache_get(&self, key: &str) -> Option<Vec<u8>> {
        let cache = self.cache.as_ref()?;
        // get() updates LRU position, so a write lock is needed.
        let mut cache = cache.write().ok()?;
        cache.get(key).cloned()
    }

    fn cache_evict(&self, key: &str) {
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.write() {
                cache.pop(key);
            }
        }
    }
}

impl StorageBackend for RedbBackend {
    fn write(&self, table: &str, key: &str, value: &[u8]) -> Result<()> {
        let namespaced = namespaced_key(table, key);

        let txn = self.db.begin_write().map_err(backend_err)?;
        {
            let mut t = txn.open_table(UNIFIED_TABLE).map_err(backend_err)?;
            t.insert(&*namespaced, value).map_err(backend_err)?;
        }
        txn.commit().map_err(backend_err)?;

        self.cache_put(namespaced, value.to_vec());
        Ok(())
    }

    fn read(&self, table: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let namespaced = namespaced_key(table, key);

        if let Some(cached) = self.cache_get(&namespaced) {
            return Ok(Some(cached));
        }

        let txn = self.db.begin_read().map_err(backend_err)?;
        let t = match txn.open_table(UNIFIED_TABLE) {
            Ok(t) => t,
            // Nothing has ever been written.
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(backend_err(e)),
        };

        match t.get(&*namespaced).map_err(backend_err)? {
            Some(value) => {
                let data = value.value().to_vec();
                self.cache_put(namespaced, data.clone());
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    fn delete(&self, table: &str, key: &str) -> Result<bool> {
        let namespaced = namespaced_key(table, key);
        self.cache_evict(&namespaced);

        let txn = self.db.begin_write().map_err(backend_err)?;
        let removed = {
            let mut t = txn.open_table(UNIFIED_TABLE).map_err(backend_err)?;
            let existed = t.remove(&*namespaced).map_err(backend_err)?.is_some();
            existed
        };
        txn.commit().map_err(backend_err)?;
        Ok(removed)
    }

    fn scan(&self, table: &str, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let full_prefix = namespaced_key(table, prefix);
        let strip = table.len() + 1;

        let txn = self.db.begin_read().map_err(backend_err)?;
        let t = match txn.open_table(UNIFIED_TABLE) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(backend_err(e)),
        };

        // Keys are ordered, so start at the prefix and stop at the first
        // non-matching key.
        let mut results = Vec::new();
        for item in t.range(full_prefix.as_str()..).map_err(backend_err)? {
            let (key, value) = item.map_err(backend_err)?;
            let key_str = key.value();
            if !key_str.starts_with(full_prefix.as_str()) {
                break;
            }
            results.push((key_str[strip..].to_string(), value.value().to_vec()));
        }
        Ok(results)
    }

    fn write_batch(&self, table: &str, items: Vec<(String, Vec<u8>)>) -> Result<()> {
        let txn = self.db.begin_write().map_err(backend_err)?;
        {
            let mut t = txn.open_table(UNIFIED_TABLE).map_err(backend_err)?;
            for (key, value) in &items {
                let namespaced = namespaced_key(table, key);
                t.insert(&*namespaced, value.as_slice()).map_err(backend_err)?;
            }
        }
        txn.commit().map_err(backend_err)?;

        for (key, value) in items {
            self.cache_put(namespaced_key(table, &key), value);
        }
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = RedbConfig::new("./data/grid.redb")
            .with_create_dirs(false)
            .with_cache_entries(0);
        assert_eq!(config.path, PathBuf::from("./data/grid.redb"));
        assert!(!config.create_dirs);
        assert_eq!(config.cache_entries, 0);
    }

    #[test]
    fn test_read_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let backend = RedbBackend::open(dir.path().join("grid.redb")).unwrap();
        assert_eq!(backend.read("devices", "missing").unwrap(), None);
        assert!(backend.scan("devices", "").unwrap().is_empty());
    }

    #[test]
    fn test_write_read_roundtrip_without_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            RedbConfig::new(dir.path().join("grid.redb")).with_cache_entries(0);
        let backend = RedbBackend::new(config).unwrap();

        backend.write("t", "k", b"payload").unwrap();
        assert_eq!(backend.read("t", "k").unwrap(), Some(b"payload".to_vec()));
        assert!(backend.is_persistent());
    }
}
