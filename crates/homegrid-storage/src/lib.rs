//! Storage layer for homegrid.
//!
//! Provides:
//! - Byte-level storage backends (redb persistent, in-memory)
//! - The device directory: per-user device documents and user profiles,
//!   including the `StateStore` implementation the engine runs against

pub mod backends;
pub mod devices;
pub mod error;

pub use backends::{MemoryBackend, RedbBackend, RedbConfig};
pub use devices::{DeviceDirectory, DeviceDocument, UserProfile};
pub use error::{Error, Result};
