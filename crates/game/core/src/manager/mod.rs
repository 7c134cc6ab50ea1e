//! Phase machine and command surface of a battle.
//!
//! [`GameManager`] is the authoritative owner of the board. Opponent engines
//! read through its query methods and change the game only by issuing its
//! synchronous commands, each of which either applies atomically or returns a
//! [`CommandError`] without touching state.
mod battle;

pub use battle::BattleManager;

use crate::env::{CombatEvaluator, PositionGenerator, RuleSet};
use crate::error::CommandError;
use crate::state::{
    Ability, Board, Player, Position, TeamId, Tile, TileKind, Unit, UnitTypeId,
};

/// Activation stage of the current team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Waiting for a unit to be selected, a recruit or the end of turn.
    Select,
    /// A unit is selected and may move.
    Move,
    /// The selected unit has moved and must act.
    Act,
    /// The selected unit acted and relocates once more.
    Remove,
    /// Host-side presentation is running; commands are not accepted.
    Animating,
    GameOver,
}

/// Authoritative battle owner consumed by opponent engines.
pub trait GameManager: Send {
    // ========================================================================
    // State
    // ========================================================================

    fn phase(&self) -> Phase;

    /// Team whose turn it is.
    fn current_team(&self) -> TeamId;

    fn selected_unit(&self) -> Option<&Unit>;

    fn board(&self) -> &Board;

    fn rules(&self) -> &RuleSet;

    fn positions(&self) -> &dyn PositionGenerator;

    fn combat(&self) -> &dyn CombatEvaluator;

    fn player(&self, team: TeamId) -> Option<&Player>;

    fn gold(&self, team: TeamId) -> i32 {
        self.player(team).map(|player| player.gold).unwrap_or(0)
    }

    /// Teams in the same alliance are allies; a team is always its own ally.
    fn is_ally(&self, team: TeamId, other: TeamId) -> bool {
        if team == other {
            return true;
        }
        match (self.player(team), self.player(other)) {
            (Some(a), Some(b)) => a.alliance == b.alliance,
            _ => false,
        }
    }

    fn is_enemy(&self, team: TeamId, other: TeamId) -> bool {
        !self.is_ally(team, other)
    }

    /// Ownership-aware variant for tiles, where `None` means neutral.
    fn is_enemy_owner(&self, team: TeamId, owner: Option<TeamId>) -> bool {
        owner.is_some_and(|owner| self.is_enemy(team, owner))
    }

    fn is_ally_owner(&self, team: TeamId, owner: Option<TeamId>) -> bool {
        owner.is_some_and(|owner| self.is_ally(team, owner))
    }

    fn is_commander_alive(&self, team: TeamId) -> bool {
        self.board().units_of(team).any(Unit::is_commander)
    }

    /// Commander record of `team`: the living commander, or a fresh sample
    /// describing the one that could be recruited.
    fn commander_of(&self, team: TeamId) -> Option<Unit> {
        if let Some(commander) = self.board().units_of(team).find(|unit| unit.is_commander()) {
            return Some(commander.clone());
        }
        let rules = self.rules();
        rules.sample(rules.commander_type()).map(|sample| {
            let mut commander = sample.clone();
            commander.team = team;
            commander
        })
    }

    fn unit_price(&self, unit_type: UnitTypeId, team: TeamId) -> i32 {
        if self.rules().is_commander_type(unit_type) {
            if let Some(commander) = self.commander_of(team) {
                return commander.price;
            }
        }
        self.rules()
            .sample(unit_type)
            .map(|sample| sample.price)
            .unwrap_or(i32::MAX)
    }

    // ========================================================================
    // Capability queries
    // ========================================================================

    /// Whether `healer`, standing where its snapshot says, may heal `target`.
    fn can_heal(&self, healer: &Unit, target: &Unit) -> bool {
        healer.has_ability(Ability::Healer)
            && self.is_ally(healer.team, target.team)
            && target.current_hp < target.max_hp
            && (healer.is_same_unit(target)
                || healer.in_attack_range(healer.position.distance(target.position)))
    }

    fn can_repair(&self, unit: &Unit, position: Position) -> bool {
        unit.has_ability(Ability::Repairer)
            && self
                .board()
                .tile(position)
                .is_some_and(Tile::is_repairable)
    }

    fn can_occupy(&self, unit: &Unit, position: Position) -> bool {
        let Some(tile) = self.board().tile(position) else {
            return false;
        };
        if tile.team == Some(unit.team) {
            return false;
        }
        match tile.kind {
            TileKind::Castle => unit.is_commander(),
            TileKind::Village => unit.has_ability(Ability::Conqueror) || unit.is_commander(),
            _ => false,
        }
    }

    /// Whether `defender`, after taking the hit, strikes back at `attacker`.
    fn can_counter(&self, attacker: &Unit, defender: &Unit) -> bool {
        !defender.is_dead()
            && self.is_enemy(attacker.team, defender.team)
            && !defender.has_ability(Ability::HeavyMachine)
            && defender.in_attack_range(attacker.position.distance(defender.position))
    }

    /// Free tile a recruit bought at `castle` would appear on.
    fn spawn_position(&self, team: TeamId, castle: Position) -> Option<Position> {
        let board = self.board();
        let tile = board.tile(castle)?;
        if !tile.is_castle() || tile.team != Some(team) {
            return None;
        }
        match board.unit_at(castle) {
            None => Some(castle),
            Some(occupant) if occupant.team == team && occupant.is_commander() => castle
                .neighbors()
                .into_iter()
                .find(|&next| {
                    board.contains(next)
                        && !board.is_occupied(next)
                        && board.tile(next).is_some_and(|tile| tile.kind != TileKind::Water)
                }),
            Some(_) => None,
        }
    }

    fn can_buy(&self, unit_type: UnitTypeId, team: TeamId, castle: Position) -> bool {
        let rules = self.rules();
        if self.phase() != Phase::Select || !rules.is_available(unit_type) {
            return false;
        }
        if rules.is_commander_type(unit_type) && self.is_commander_alive(team) {
            return false;
        }
        self.unit_price(unit_type, team) <= self.gold(team)
            && self.spawn_position(team, castle).is_some()
    }

    fn has_enemy_within_range(&self, unit: &Unit) -> bool {
        let board = self.board();
        self.positions()
            .attackable_positions(board, unit)
            .into_iter()
            .filter_map(|position| board.unit_at(position))
            .any(|target| self.is_enemy(unit.team, target.team))
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn select(&mut self, position: Position) -> Result<(), CommandError>;

    fn move_to(&mut self, position: Position) -> Result<(), CommandError>;

    fn occupy(&mut self) -> Result<(), CommandError>;

    fn repair(&mut self) -> Result<(), CommandError>;

    fn attack(&mut self, target: Position) -> Result<(), CommandError>;

    fn heal(&mut self, target: Position) -> Result<(), CommandError>;

    fn summon(&mut self, target: Position) -> Result<(), CommandError>;

    /// Ends the selected unit's activation without acting.
    fn standby(&mut self) -> Result<(), CommandError>;

    fn end_turn(&mut self) -> Result<(), CommandError>;

    fn buy_unit(&mut self, unit_type: UnitTypeId, castle: Position) -> Result<(), CommandError>;
}
