//! Integer scoring of candidates and standby tiles.
//!
//! Scores are plain `i32` sums without normalization. Selection is greedy:
//! the first candidate strictly above the running best wins, so ties keep the
//! earliest-seen entry.

mod actions;
mod combat;
mod standby;

pub use actions::action_score;
pub use combat::attack_exchange_score;
pub use standby::standby_score;

use game_core::{Ability, Position, Unit};
use tracing::debug;

use super::action::Action;
use super::context::RobotContext;

/// Effective threat radius of a unit.
///
/// The terrain bonus (crawler 1, air force 2) is counted twice.
pub fn mobility(unit: &Unit) -> i32 {
    let bonus = if unit.has_ability(Ability::AirForce) {
        2
    } else if unit.has_ability(Ability::Crawler) {
        1
    } else {
        0
    };
    let base = if unit.has_ability(Ability::HeavyMachine) {
        unit.max_attack_range + bonus
    } else {
        unit.movement_point - 2 + unit.max_attack_range + bonus
    };
    base + bonus
}

/// Highest-scoring candidate, if any scores above zero.
///
/// A candidate set whose best score is zero or negative yields `None`; callers
/// reposition instead of taking the least-bad action.
pub fn preferred_action(
    ctx: &RobotContext<'_>,
    selected: &Unit,
    candidates: &[Action],
) -> Option<(Action, i32)> {
    let mut preferred = None;
    let mut best = 0;
    for candidate in candidates {
        let score = action_score(ctx, selected, candidate);
        if score > best {
            preferred = Some(*candidate);
            best = score;
        }
    }
    if let Some(action) = preferred {
        debug!(unit = %selected.id, %action, score = best, "preferred action");
    }
    preferred.map(|action| (action, best))
}

/// Best standby tile among `movable`, or the unit's own tile when empty.
pub fn preferred_standby_position(
    ctx: &RobotContext<'_>,
    unit: &Unit,
    movable: &[Position],
) -> Position {
    let mut preferred = movable.first().copied().unwrap_or(unit.position);
    let mut best = i32::MIN;
    for &position in movable {
        let score = standby_score(ctx, unit, position);
        if score > best {
            preferred = position;
            best = score;
        }
    }
    preferred
}
