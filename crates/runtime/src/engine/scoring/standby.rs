//! Positional desirability of ending a turn on a tile.

use game_core::{Ability, Position, StatusKind, Unit};

use crate::engine::context::RobotContext;

const AURA_RADIUS: i32 = 2;

/// Score for `unit` standing on `position`.
///
/// Pure: identical inputs always yield the same score.
pub fn standby_score(ctx: &RobotContext<'_>, unit: &Unit, position: Position) -> i32 {
    let board = ctx.board();
    let combat = ctx.manager.combat();
    let tile = board.tile(position);

    let mut score = ctx.average_enemy_distance(position) * 20;
    score -= ctx.average_ally_distance(position) * 10;
    if let Some(tile) = tile {
        score += combat.tile_defence_bonus(unit, tile) * 5;
        score += combat.terrain_heal(unit, tile) * 10;
    }

    if board.is_tomb(position) {
        let immune = unit.has_ability(Ability::Undead) || unit.has_ability(Ability::Necromancer);
        if !immune && unit.status.is_none() {
            score -= unit.price / 4;
        }
        if unit.has_ability(Ability::Undead) {
            score += 200;
        }
    }

    if ctx.is_enemy_castle(tile) {
        score -= 50 * unit.price / 20;
    }
    if ctx.is_my_castle(tile) && !ctx.is_my_commander(unit) {
        score -= 5000;
    }

    if ctx.is_threatened(position) {
        if tile.is_some_and(|tile| tile.is_castle()) && ctx.gold() < ctx.cheapest_unit_price() {
            score += 20000;
        }
        if tile.is_some_and(|tile| tile.is_village()) {
            score += 10000;
        }
    }

    score + aura_score(ctx, unit, position)
}

fn aura_score(ctx: &RobotContext<'_>, unit: &Unit, position: Position) -> i32 {
    let slowing = unit.has_ability(Ability::SlowingAura);
    let attack = unit.has_ability(Ability::AttackAura);
    let refresh = unit.has_ability(Ability::RefreshAura);
    if !slowing && !attack && !refresh {
        return 0;
    }

    let board = ctx.board();
    let mut score = 0;
    for around in ctx
        .manager
        .positions()
        .positions_within_range(board, position, 0, AURA_RADIUS)
    {
        let target = board.unit_at(around);
        let Some(found) = target else {
            continue;
        };
        if slowing && ctx.is_enemy(target) && found.status.is_none() {
            score += found.price / 4;
        }
        if attack && ctx.is_ally(target) && found.status.is_none() {
            score += found.price / 4;
        }
        if refresh && ctx.is_ally(target) {
            if found.current_hp < found.max_hp {
                score += found.price / 4;
            }
            if found.status.is_some_and(StatusKind::is_debuff) {
                score += found.price / 5;
            }
        }
    }
    score
}
