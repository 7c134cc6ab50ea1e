//! Decision engine for a computer-controlled team.
//!
//! The [`TurnPhaseController`] reacts to the game manager's phase; the other
//! modules are the pure helpers it consults:
//! - [`generator`] enumerates candidate actions for the selected unit
//! - [`scoring`] ranks candidates and standby tiles
//! - [`fallback`] repositions units when no candidate is worth taking
//! - [`recruit`] spends gold once every unit has finished
//! - [`threat`] and [`abilities`] hold per-turn derived data
pub mod abilities;
pub mod action;
pub mod context;
pub mod controller;
pub mod fallback;
pub mod generator;
pub mod recruit;
pub mod scoring;
pub mod threat;

pub use abilities::AbilityIndex;
pub use action::{Action, InFlight, OperationKind, Stage};
pub use context::{NO_DISTANCE, RobotContext};
pub use controller::{StepOutcome, TurnPhaseController};
pub use fallback::{Decision, FallbackChain, FallbackStrategy};
pub use generator::ActionCandidateGenerator;
pub use recruit::{EnemyProfile, RecruitmentPlanner};
pub use threat::ThreatMap;
