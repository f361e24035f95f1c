//! Device state documents, patches, and results.
//!
//! State is a mapping from field name to JSON value and always carries
//! `online`. It is mutated exclusively through patches, never replaced
//! wholesale.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel value of `timerRemainingSec` meaning "no timer is set".
pub const TIMER_NONE: i64 = -1;

/// Partial state update: only the fields that changed.
pub type StatePatch = Map<String, Value>;

/// Fields echoed back to the caller after a command.
pub type ResultState = Map<String, Value>;

/// Device state as read at the start of one command execution.
///
/// Used for validation and for echoing unchanged sibling fields back to the
/// caller. Trait-dependent fields live in the flattened map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Connectivity status. Read-only input to the engine.
    pub online: bool,
    /// Trait-dependent state fields (`on`, `brightness`, `isLocked`, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl StateSnapshot {
    /// Create a snapshot with no trait fields.
    pub fn new(online: bool) -> Self {
        Self {
            online,
            fields: Map::new(),
        }
    }

    /// Set a state field.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Raw field lookup.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Boolean field, `None` if absent or not a bool.
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(Value::as_bool)
    }

    /// Integer field, `None` if absent or not an integer.
    pub fn i64_field(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }

    /// String field, `None` if absent or not a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Merge a patch into this snapshot. A patch may touch `online` (the
    /// store layer does when connectivity flips); trait fields are inserted
    /// or overwritten individually.
    pub fn apply_patch(&mut self, patch: &StatePatch) {
        for (name, value) in patch {
            if name == "online" {
                if let Some(online) = value.as_bool() {
                    self.online = online;
                }
            } else {
                self.fields.insert(name.clone(), value.clone());
            }
        }
    }
}
