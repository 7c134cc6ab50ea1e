//! Attack/counter-attack exchange simulation.

use game_core::{StatusKind, Unit};

use crate::engine::context::RobotContext;

/// Value of one side of an exchange: what `victim` loses from a hit that
/// dealt `damage` and left it with its current status.
fn loss_value(victim: &Unit, damage: i32, status_before: Option<StatusKind>) -> i32 {
    let (kill_factor, damage_divisor) = if victim.is_commander() {
        (20, 10)
    } else {
        (10, 20)
    };
    let mut value = if victim.is_dead() {
        victim.price * kill_factor
    } else {
        damage * victim.price / damage_divisor
    };
    if status_before.is_none() {
        value += match victim.status {
            Some(StatusKind::Poisoned) => victim.price / 4,
            Some(StatusKind::Blinded) => victim.price / 2,
            _ => 0,
        };
    }
    value
}

/// Net value of `attacker` striking `defender`, minus the expected counter.
///
/// Works on independent clones; neither argument nor the board is touched.
pub fn attack_exchange_score(ctx: &RobotContext<'_>, attacker: &Unit, defender: &Unit) -> i32 {
    let board = ctx.board();
    let combat = ctx.manager.combat();

    let mut defender = defender.clone();
    let defender_status = defender.status;
    let damage = combat.damage(board, attacker, &defender);
    defender.change_current_hp(-damage);
    if defender_status.is_none() {
        combat.attach_attack_status(attacker, &mut defender);
    }
    let mut score = loss_value(&defender, damage, defender_status);

    if ctx.manager.can_counter(attacker, &defender) {
        let mut attacker = attacker.clone();
        let attacker_status = attacker.status;
        let counter = combat.damage(board, &defender, &attacker);
        attacker.change_current_hp(-counter);
        if attacker_status.is_none() {
            combat.attach_attack_status(&defender, &mut attacker);
        }
        score -= loss_value(&attacker, counter, attacker_status);
    }

    score
}
