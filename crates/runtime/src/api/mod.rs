//! Public runtime API surface.
//!
//! This module gathers the types exposed to hosts of the robot so the engine
//! and worker layers can stay focused on decisions and scheduling.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::RobotHandle;
