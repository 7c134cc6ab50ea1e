//! Per-candidate action scores.

use game_core::{Ability, Unit};

use super::combat::attack_exchange_score;
use super::mobility;
use super::standby::standby_score;
use crate::engine::action::{Action, OperationKind};
use crate::engine::context::RobotContext;

pub const CASTLE_CAPTURE: i32 = 20000;
pub const VILLAGE_CAPTURE: i32 = 10000;
pub const REPAIR: i32 = 5000;
pub const RAZE: i32 = 5000;
pub const SUMMON: i32 = 1000;

/// Desirability of `selected` carrying out `action`.
///
/// The unit is evaluated as a clone standing on the action's origin.
pub fn action_score(ctx: &RobotContext<'_>, selected: &Unit, action: &Action) -> i32 {
    let board = ctx.board();
    let mut actor = selected.clone();
    actor.position = action.origin();

    let mut score = match action.kind() {
        OperationKind::Occupy => match board.tile(action.origin()) {
            Some(tile) if tile.is_castle() => CASTLE_CAPTURE,
            Some(tile) if tile.is_village() => VILLAGE_CAPTURE,
            _ => 0,
        },
        OperationKind::Repair => REPAIR,
        OperationKind::Summon => SUMMON,
        // A self-heal targets the origin, where only the moved clone stands.
        OperationKind::Heal => match heal_target(ctx, &actor, action) {
            Some(target) if ctx.is_ally(Some(target)) => {
                10 * (target.attack * target.current_hp / target.max_hp.max(1)
                    + mobility(target) * 5)
            }
            _ => 0,
        },
        OperationKind::Attack => {
            let target = board.unit_at(action.target());
            match target {
                Some(defender) if ctx.is_enemy(target) => {
                    defender.price / 20 + attack_exchange_score(ctx, &actor, defender)
                }
                None if ctx.is_enemy_village(board.tile(action.target())) => RAZE,
                _ => 0,
            }
        }
        OperationKind::Standby => 0,
    };

    if !actor.has_ability(Ability::Charger) {
        score += standby_score(ctx, &actor, action.origin());
    }

    let current = selected.position;
    if ctx.is_threatened(current) && action.origin() != current {
        let tile = board.tile(current);
        if ctx.is_my_castle(tile) {
            score -= CASTLE_CAPTURE;
        }
        if ctx.is_my_village(tile) {
            score -= VILLAGE_CAPTURE;
        }
    }

    score
}

fn heal_target<'a>(ctx: &RobotContext<'a>, actor: &'a Unit, action: &Action) -> Option<&'a Unit> {
    if action.target() == action.origin() {
        Some(actor)
    } else {
        ctx.board().unit_at(action.target())
    }
}
