//! State store port.
//!
//! The execution engine's outbound interface to persistence. Implementations
//! own the persisted state documents; the engine holds only the in-flight
//! snapshot for the duration of one call.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::state::{StatePatch, StateSnapshot};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by a state store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document for the requested key.
    #[error("not found: {0}")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend error.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Read and write device state by (user, device).
///
/// Per-document updates are last-write-wins; no compare-and-swap is offered
/// beyond what the backing store natively guarantees.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the current state snapshot for a device.
    async fn device_state(&self, user_id: &str, device_id: &str) -> Result<StateSnapshot>;

    /// Read a device's capability attributes (e.g. `openDirection`).
    async fn device_attributes(&self, user_id: &str, device_id: &str)
        -> Result<Map<String, Value>>;

    /// Apply a partial state update to a device document.
    async fn update_device_state(
        &self,
        user_id: &str,
        device_id: &str,
        patch: &StatePatch,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound("alice/washer-1".to_string());
        assert!(err.to_string().contains("alice/washer-1"));
    }
}
