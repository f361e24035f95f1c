//! Device directory.
//!
//! One JSON document per device, keyed by (user, device), plus per-user
//! profiles. The directory owns registration and metadata updates and
//! implements the engine's `StateStore` port: state is mutated through
//! partial patches only, never replaced wholesale.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use homegrid_core::store::Result as StoreResult;
use homegrid_core::{Device, StatePatch, StateSnapshot, StateStore, StorageBackend};

use crate::error::{Error, Result};

const DEVICES_TABLE: &str = "devices";
const USERS_TABLE: &str = "users";

fn device_key(user_id: &str, device_id: &str) -> String {
    format!("user:{}:device:{}", user_id, device_id)
}

fn user_device_prefix(user_id: &str) -> String {
    format!("user:{}:device:", user_id)
}

/// Stored device document: metadata plus current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDocument {
    #[serde(flatten)]
    pub device: Device,
    /// Current state snapshot.
    pub states: StateSnapshot,
    /// Unix millis of the last state update.
    #[serde(default)]
    pub last_updated: i64,
}

/// Per-user settings document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Whether state changes are pushed proactively for this user's devices.
    #[serde(default)]
    pub report_state: bool,
}

/// Document store for devices and users over a storage backend.
pub struct DeviceDirectory {
    backend: Arc<dyn StorageBackend>,
}

impl DeviceDirectory {
    /// Create a directory over the given backend.
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        key: &str,
    ) -> Result<Option<T>> {
        match self.backend.read(table, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize>(&self, table: &str, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.write(table, key, &bytes)?;
        Ok(())
    }

    // User profiles

    /// Create a user profile if one does not exist yet.
    pub fn register_user(&self, user_id: &str) -> Result<()> {
        if !self.user_exists(user_id)? {
            self.write_json(USERS_TABLE, user_id, &UserProfile::default())?;
        }
        Ok(())
    }

    /// Whether a profile exists for the user.
    pub fn user_exists(&self, user_id: &str) -> Result<bool> {
        Ok(self.backend.read(USERS_TABLE, user_id)?.is_some())
    }

    /// Toggle proactive state reporting for a user.
    pub fn set_report_state(&self, user_id: &str, enabled: bool) -> Result<()> {
        let mut profile: UserProfile = self
            .read_json(USERS_TABLE, user_id)?
            .unwrap_or_default();
        profile.report_state = enabled;
        self.write_json(USERS_TABLE, user_id, &profile)
    }

    /// Whether proactive state reporting is enabled for a user.
    pub fn report_state_enabled(&self, user_id: &str) -> Result<bool> {
        let profile: Option<UserProfile> = self.read_json(USERS_TABLE, user_id)?;
        Ok(profile.map(|p| p.report_state).unwrap_or(false))
    }

    /// Account unlink: stop proactive reporting for the user.
    pub fn disconnect(&self, user_id: &str) -> Result<()> {
        self.set_report_state(user_id, false)
    }

    // Devices

    /// Register a device with its initial state.
    pub fn register_device(
        &self,
        user_id: &str,
        device: Device,
        initial_state: StateSnapshot,
    ) -> Result<()> {
        let doc = DeviceDocument {
            device,
            states: initial_state,
            last_updated: Utc::now().timestamp_millis(),
        };
        let key = device_key(user_id, &doc.device.id);
        self.write_json(DEVICES_TABLE, &key, &doc)?;
        tracing::debug!(user = user_id, device = %doc.device.id, "device registered");
        Ok(())
    }

    /// Load one device document.
    pub fn device(&self, user_id: &str, device_id: &str) -> Result<DeviceDocument> {
        self.read_json(DEVICES_TABLE, &device_key(user_id, device_id))?
            .ok_or_else(|| Error::NotFound(format!("{}/{}", user_id, device_id)))
    }

    /// List all of a user's devices, ordered by device id.
    pub fn devices(&self, user_id: &str) -> Result<Vec<DeviceDocument>> {
        let items = self
            .backend
            .scan(DEVICES_TABLE, &user_device_prefix(user_id))?;

        let mut result = Vec::with_capacity(items.len());
        for (_, bytes) in items {
            match serde_json::from_slice::<DeviceDocument>(&bytes) {
                Ok(doc) => result.push(doc),
                Err(err) => {
                    tracing::warn!(user = user_id, error = %err, "skipping unreadable device document");
                }
            }
        }
        Ok(result)
    }

    /// Update a device's display name and/or nickname.
    pub fn rename_device(
        &self,
        user_id: &str,
        device_id: &str,
        name: Option<&str>,
        nickname: Option<&str>,
    ) -> Result<()> {
        let mut doc = self.device(user_id, device_id)?;
        if let Some(name) = name {
            doc.device.name.name = name.to_string();
        }
        if let Some(nickname) = nickname {
            doc.device.name.nicknames = vec![nickname.to_string()];
        }
        self.write_json(DEVICES_TABLE, &device_key(user_id, device_id), &doc)
    }

    /// Remove a device. Returns whether a document was deleted.
    pub fn unregister_device(&self, user_id: &str, device_id: &str) -> Result<bool> {
        let removed = self
            .backend
            .delete(DEVICES_TABLE, &device_key(user_id, device_id))?;
        if removed {
            tracing::debug!(user = user_id, device = device_id, "device unregistered");
        }
        Ok(removed)
    }
}

#[async_trait]
impl StateStore for DeviceDirectory {
    async fn device_state(&self, user_id: &str, device_id: &str) -> StoreResult<StateSnapshot> {
        let doc = self.device(user_id, device_id)?;
        Ok(doc.states)
    }

    async fn device_attributes(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> StoreResult<Map<String, Value>> {
        let doc = self.device(user_id, device_id)?;
        Ok(doc.device.attributes)
    }

    async fn update_device_state(
        &self,
        user_id: &str,
        device_id: &str,
        patch: &StatePatch,
    ) -> StoreResult<()> {
        let mut doc = self.device(user_id, device_id)?;
        doc.states.apply_patch(patch);
        doc.last_updated = Utc::now().timestamp_millis();
        self.write_json(DEVICES_TABLE, &device_key(user_id, device_id), &doc)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryBackend;
    use homegrid_core::DeviceName;
    use serde_json::json;

    fn directory() -> DeviceDirectory {
        DeviceDirectory::new(Arc::new(MemoryBackend::new()))
    }

    #[test]
    fn test_document_wire_shape() {
        let device = Device::new("light-1", "LIGHT", DeviceName::new("Lamp"))
            .with_trait("action.devices.traits.OnOff");
        let doc = DeviceDocument {
            device,
            states: StateSnapshot::new(true).with_field("on", json!(false)),
            last_updated: 0,
        };

        let value = serde_json::to_value(&doc).unwrap();
        // Device fields are flattened alongside the states sub-document.
        assert_eq!(value["id"], "light-1");
        assert_eq!(value["type"], "LIGHT");
        assert_eq!(value["states"]["online"], true);
        assert_eq!(value["states"]["on"], false);
    }

    #[test]
    fn test_user_profile_roundtrip() {
        let dir = directory();
        assert!(!dir.user_exists("alice").unwrap());

        dir.register_user("alice").unwrap();
        assert!(dir.user_exists("alice").unwrap());
        assert!(!dir.report_state_enabled("alice").unwrap());

        dir.set_report_state("alice", true).unwrap();
        assert!(dir.report_state_enabled("alice").unwrap());

        dir.disconnect("alice").unwrap();
        assert!(!dir.report_state_enabled("alice").unwrap());
    }
}
