//! Computer opponent for turn-based tactical battles.
//!
//! This crate wires the decision engine to a background worker that steps it
//! on request. Hosts share their [`game_core::GameManager`] behind a single
//! lock, spawn a [`Robot`], and call [`RobotHandle::request_step`] while it is
//! the robot's turn.
//!
//! Modules are organized by responsibility:
//! - [`engine`] holds the phase controller and its pure decision helpers
//! - [`api`] exposes the types hosts interact with
//! - [`robot`] hosts the orchestrator, builder and configuration
//! - `workers` keeps the scheduler task internal to the crate
pub mod api;
pub mod engine;
pub mod robot;

mod workers;

pub use api::{Result, RobotHandle, RuntimeError};
pub use engine::{
    Action, ActionCandidateGenerator, FallbackChain, FallbackStrategy, OperationKind,
    RecruitmentPlanner, StepOutcome, ThreatMap, TurnPhaseController,
};
pub use robot::{Robot, RobotBuilder, RobotConfig};
pub use workers::{MetricsSnapshot, RobotMetrics, SharedManager};
