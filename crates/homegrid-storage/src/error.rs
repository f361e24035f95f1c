//! Error types for the storage crate.

use homegrid_core::{StorageError, StoreError};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Storage error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Not found error.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Io(e) => Error::Io(e),
            StorageError::Serialization(s) => Error::Serialization(s),
            StorageError::Backend(s) => Error::Storage(s),
        }
    }
}

// Surface storage faults through the engine's store port unchanged.
impl From<Error> for StoreError {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(e) => StoreError::Io(e),
            Error::Serialization(s) => StoreError::Serialization(s),
            Error::Storage(s) => StoreError::Backend(s),
            Error::NotFound(s) => StoreError::NotFound(s),
            Error::InvalidInput(s) => StoreError::Backend(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_store_not_found() {
        let err: StoreError = Error::NotFound("alice/light-1".to_string()).into();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
