//! Side-effect free combat arithmetic.

use crate::state::{Ability, AttackType, Board, StatusKind, Tile, TileKind, Unit};

/// Hypothetical combat outcomes between two unit snapshots.
///
/// Implementations never touch the board; callers clone units before applying
/// the returned damage or status.
pub trait CombatEvaluator: Send + Sync {
    /// Damage `attacker` would deal to `defender` standing where they stand.
    fn damage(&self, board: &Board, attacker: &Unit, defender: &Unit) -> i32;

    /// Status a hit from `attacker` leaves on `defender`, if any.
    fn attack_status(&self, attacker: &Unit, defender: &Unit) -> Option<StatusKind>;

    fn tile_defence_bonus(&self, unit: &Unit, tile: &Tile) -> i32;

    /// Hit points the tile restores to `unit` at the start of its turn.
    fn terrain_heal(&self, unit: &Unit, tile: &Tile) -> i32;

    /// Applies the on-hit status to a defender snapshot.
    fn attach_attack_status(&self, attacker: &Unit, defender: &mut Unit) {
        if let Some(status) = self.attack_status(attacker, defender) {
            defender.status = Some(status);
        }
    }
}

/// Reference combat rules.
///
/// Damage is attack minus the matching defence and the defender's terrain
/// bonus, scaled by the attacker's remaining health.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardCombat;

impl StandardCombat {
    pub const MARKSMAN_BONUS: i32 = 15;
    pub const INSPIRED_BONUS: i32 = 10;
    pub const TERRAIN_HEAL: i32 = 10;

    pub const fn new() -> Self {
        Self
    }
}

impl CombatEvaluator for StandardCombat {
    fn damage(&self, board: &Board, attacker: &Unit, defender: &Unit) -> i32 {
        let mut attack = attacker.attack;
        if attacker.has_ability(Ability::Marksman) && defender.has_ability(Ability::AirForce) {
            attack += Self::MARKSMAN_BONUS;
        }
        match attacker.status {
            Some(StatusKind::Inspired) => attack += Self::INSPIRED_BONUS,
            Some(StatusKind::Blinded) => attack /= 2,
            _ => {}
        }

        let defence = match attacker.attack_type {
            AttackType::Physical => defender.physical_defence,
            AttackType::Magic => defender.magic_defence,
        };
        let terrain = board
            .tile(defender.position)
            .map(|tile| self.tile_defence_bonus(defender, tile))
            .unwrap_or(0);

        let raw = (attack - defence - terrain).max(0);
        if attacker.max_hp <= 0 {
            return raw;
        }
        raw * attacker.current_hp.max(0) / attacker.max_hp
    }

    fn attack_status(&self, attacker: &Unit, _defender: &Unit) -> Option<StatusKind> {
        if attacker.has_ability(Ability::Poisoner) {
            Some(StatusKind::Poisoned)
        } else if attacker.has_ability(Ability::Blinder) {
            Some(StatusKind::Blinded)
        } else {
            None
        }
    }

    fn tile_defence_bonus(&self, unit: &Unit, tile: &Tile) -> i32 {
        if unit.has_ability(Ability::AirForce) {
            return 0;
        }
        match tile.kind {
            TileKind::Forest | TileKind::Village => 10,
            TileKind::Hill | TileKind::Castle => 15,
            TileKind::Mountain => 20,
            TileKind::Plains | TileKind::Road | TileKind::Water | TileKind::Ruins => 0,
        }
    }

    fn terrain_heal(&self, unit: &Unit, tile: &Tile) -> i32 {
        let owned = tile.team == Some(unit.team);
        if owned && (tile.is_castle() || tile.is_village()) {
            Self::TERRAIN_HEAL
        } else {
            0
        }
    }
}
