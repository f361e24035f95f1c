//! Command executor.
//!
//! Validates one command against the device's persisted state, runs the
//! handler, persists the patch, and returns the result payload. Stateless
//! between calls; the store adapter is injected and owns persistence.

use std::sync::Arc;

use serde_json::Map;

use homegrid_core::{ResultState, StateStore, StoreError};

use crate::command::CommandRequest;
use crate::error::ExecuteError;
use crate::registry::CommandRegistry;

/// Executes device commands against a [`StateStore`].
///
/// One `execute` call performs at most one snapshot read and one patch
/// write (plus an attributes read for commands that branch on them). No
/// locking is held between the read and the write; concurrent commands
/// against the same device are last-write-wins per the store's guarantee.
pub struct CommandExecutor {
    store: Arc<dyn StateStore>,
    registry: CommandRegistry,
}

impl CommandExecutor {
    /// Create an executor over the given store.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            registry: CommandRegistry::new(),
        }
    }

    /// The registry backing this executor.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Execute one command for one device.
    ///
    /// Validation order, short-circuiting on the first failure:
    /// missing document, offline device, unknown identifier, then
    /// handler-specific parameter and state checks. Validation failures
    /// abort before any store write.
    pub async fn execute(
        &self,
        user_id: &str,
        device_id: &str,
        request: &CommandRequest,
    ) -> Result<ResultState, ExecuteError> {
        let snapshot = match self.store.device_state(user_id, device_id).await {
            Ok(snapshot) => snapshot,
            Err(StoreError::NotFound(_)) => return Err(ExecuteError::DeviceNotFound),
            Err(err) => return Err(err.into()),
        };

        if !snapshot.online {
            return Err(ExecuteError::DeviceOffline);
        }

        let kind = self
            .registry
            .lookup(&request.command)
            .ok_or(ExecuteError::ActionNotAvailable)?;

        let attributes = if kind.needs_attributes() {
            self.store.device_attributes(user_id, device_id).await?
        } else {
            Map::new()
        };

        let outcome = kind.apply(&snapshot, &attributes, &request.params)?;

        if !outcome.patch.is_empty() {
            self.store
                .update_device_state(user_id, device_id, &outcome.patch)
                .await?;
        }

        tracing::debug!(
            user = user_id,
            device = device_id,
            command = kind.name(),
            fields = outcome.patch.len(),
            "command executed"
        );

        Ok(outcome.result)
    }
}
