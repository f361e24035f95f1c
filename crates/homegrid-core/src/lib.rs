//! Core traits and types for homegrid.
//!
//! This crate defines the foundational abstractions used across the project:
//! the device model, state snapshot/patch types, the state store port the
//! execution engine talks to, and the byte-level storage backend trait.

pub mod device;
pub mod state;
pub mod storage;
pub mod store;

pub use device::{Device, DeviceInfo, DeviceName};
pub use state::{ResultState, StatePatch, StateSnapshot, TIMER_NONE};
pub use storage::{StorageBackend, StorageError};
pub use store::{StateStore, StoreError};
