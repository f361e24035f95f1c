//! Device model.
//!
//! A device is owned by a user, created on registration, updated via
//! patches, and deleted on unregistration. Which state fields and commands
//! are valid for a device is gated by its trait set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured device naming.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceName {
    /// Manufacturer-provided default names.
    #[serde(default)]
    pub default_names: Vec<String>,
    /// User-assigned name.
    pub name: String,
    /// Additional nicknames.
    #[serde(default)]
    pub nicknames: Vec<String>,
}

impl DeviceName {
    /// Create a name with no defaults or nicknames.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            default_names: Vec::new(),
            name: name.into(),
            nicknames: Vec::new(),
        }
    }

    /// Add a nickname.
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nicknames.push(nickname.into());
        self
    }
}

/// Manufacturer metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub manufacturer: String,
    pub model: String,
    pub hw_version: String,
    pub sw_version: String,
}

/// A registered device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Unique per user.
    pub id: String,
    /// Device category (e.g. "LIGHT", "THERMOSTAT").
    #[serde(rename = "type")]
    pub device_type: String,
    /// Capability identifiers (e.g. `action.devices.traits.OnOff`).
    #[serde(default)]
    pub traits: Vec<String>,
    pub name: DeviceName,
    #[serde(default)]
    pub device_info: DeviceInfo,
    /// Whether state changes are pushed proactively.
    #[serde(default)]
    pub will_report_state: bool,
    /// Free-form capability parameters (e.g. `openDirection`).
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Device {
    /// Create a device with empty traits and attributes.
    pub fn new(id: impl Into<String>, device_type: impl Into<String>, name: DeviceName) -> Self {
        Self {
            id: id.into(),
            device_type: device_type.into(),
            traits: Vec::new(),
            name,
            device_info: DeviceInfo::default(),
            will_report_state: false,
            attributes: Map::new(),
        }
    }

    /// Add a capability trait.
    pub fn with_trait(mut self, capability: impl Into<String>) -> Self {
        self.traits.push(capability.into());
        self
    }

    /// Set manufacturer metadata.
    pub fn with_device_info(mut self, info: DeviceInfo) -> Self {
        self.device_info = info;
        self
    }

    /// Enable proactive state reporting.
    pub fn with_report_state(mut self, enabled: bool) -> Self {
        self.will_report_state = enabled;
        self
    }

    /// Add a capability attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Check whether the device declares a capability.
    pub fn has_trait(&self, capability: &str) -> bool {
        self.traits.iter().any(|t| t == capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_device_builder() {
        let device = Device::new("washer-1", "WASHER", DeviceName::new("Washer"))
            .with_trait("action.devices.traits.StartStop")
            .with_trait("action.devices.traits.RunCycle")
            .with_report_state(true);

        assert_eq!(device.id, "washer-1");
        assert!(device.has_trait("action.devices.traits.StartStop"));
        assert!(!device.has_trait("action.devices.traits.OnOff"));
        assert!(device.will_report_state);
    }

    #[test]
    fn test_device_serde_shape() {
        let device = Device::new("blinds-1", "BLINDS", DeviceName::new("Blinds"))
            .with_attribute("openDirection", json!(["UP", "DOWN"]));

        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(value["type"], "BLINDS");
        assert_eq!(value["name"]["name"], "Blinds");
        assert_eq!(value["attributes"]["openDirection"][0], "UP");
        assert_eq!(value["willReportState"], false);

        let back: Device = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, "blinds-1");
    }
}
