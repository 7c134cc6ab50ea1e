//! Rule collaborators consumed by opponent engines.
//!
//! Reachability, combat arithmetic and the unit catalog are expressed as
//! traits or plain data so a host can swap in its own rules while the engine
//! keeps calling the same capabilities.
mod combat;
mod positions;
mod rules;

pub use combat::{CombatEvaluator, StandardCombat};
pub use positions::{GridPositionGenerator, PositionGenerator};
pub use rules::RuleSet;
