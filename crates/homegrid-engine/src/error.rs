//! Execution error taxonomy.
//!
//! Every validation failure is terminal for the call and aborts before any
//! store write. Store faults other than the initial not-found propagate
//! unchanged.

use homegrid_core::StoreError;

/// Errors returned by [`crate::CommandExecutor::execute`].
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// No state document exists for (user, device).
    #[error("no state document for device")]
    DeviceNotFound,

    /// The device's `online` field is false.
    #[error("device is offline")]
    DeviceOffline,

    /// The command identifier is not present in the registry.
    #[error("command not available")]
    ActionNotAvailable,

    /// Command recognized but a required parameter variant is absent or
    /// malformed.
    #[error("required parameter variant absent")]
    NotSupported,

    /// A timer-family command was issued while no timer is set.
    #[error("no timer exists")]
    NoTimerExists,

    /// A computed value violates a domain bound.
    #[error("value out of range")]
    ValueOutOfRange,

    /// Store-layer fault, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ExecuteError {
    /// Protocol error code, reported verbatim to the caller.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::DeviceNotFound => "deviceNotFound",
            ExecuteError::DeviceOffline => "deviceOffline",
            ExecuteError::ActionNotAvailable => "actionNotAvailable",
            ExecuteError::NotSupported => "notSupported",
            ExecuteError::NoTimerExists => "noTimerExists",
            ExecuteError::ValueOutOfRange => "valueOutOfRange",
            ExecuteError::Store(_) => "hardError",
        }
    }
}
