//! Byte-level storage abstraction.
//!
//! Defines the interface all storage backends implement (redb, memory, and
//! future engines). Backends are constructed explicitly by the process entry
//! point and injected where needed.

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage backend error types.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend error.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Core storage backend trait.
pub trait StorageBackend: Send + Sync {
    /// Write a value to a key in the specified table.
    fn write(&self, table: &str, key: &str, value: &[u8]) -> Result<()>;

    /// Read a value by key from the specified table.
    fn read(&self, table: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Delete a key from the specified table.
    fn delete(&self, table: &str, key: &str) -> Result<bool>;

    /// Scan keys with a given prefix in the specified table.
    fn scan(&self, table: &str, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;

    /// Batch write multiple values to the specified table.
    fn write_batch(&self, table: &str, items: Vec<(String, Vec<u8>)>) -> Result<()>;

    /// Check if this backend supports persistent storage.
    fn is_persistent(&self) -> bool;
}
