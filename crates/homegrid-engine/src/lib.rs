//! Command execution engine for device control.
//!
//! Provides:
//! - The closed set of device command identifiers and their tagged kinds
//! - A registry mapping identifiers to handler specifications
//! - Pure per-command handlers over `(snapshot, attributes, params)`
//! - The executor that validates, applies, and persists one command

pub mod command;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod params;
pub mod registry;

// Re-exports
pub use command::{CommandKind, CommandRequest, COMMAND_PREFIX};
pub use error::ExecuteError;
pub use executor::CommandExecutor;
pub use handlers::Outcome;
pub use registry::{CommandRegistry, CommandSpec};
