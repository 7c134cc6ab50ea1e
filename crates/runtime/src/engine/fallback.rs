//! Ordered repositioning strategies used when no candidate is worth taking.
//!
//! Each strategy either produces a [`Decision`] or passes. The chain stops at
//! the first strategy that decides; the final entry always decides.

use game_core::{Ability, Position, Unit};
use tracing::debug;

use super::action::Action;
use super::context::RobotContext;
use super::scoring::preferred_standby_position;

/// A repositioning decision plus an optional objective to reserve for the
/// rest of the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub claim: Option<Position>,
}

impl Decision {
    pub const fn new(action: Action) -> Self {
        Self {
            action,
            claim: None,
        }
    }

    pub const fn claiming(action: Action, objective: Position) -> Self {
        Self {
            action,
            claim: Some(objective),
        }
    }
}

/// One link of the fallback chain.
pub trait FallbackStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn decide(&self, ctx: &RobotContext<'_>, unit: &Unit, movable: &[Position]) -> Option<Decision>;
}

/// Standby on the single next step toward `target`.
fn advance(ctx: &RobotContext<'_>, unit: &Unit, target: Position) -> Action {
    let step = ctx
        .manager
        .positions()
        .next_position_toward(ctx.board(), unit, target);
    Action::standby(step)
}

/// Nearest position by Manhattan distance; ties keep the first seen.
fn nearest(from: Position, positions: impl IntoIterator<Item = Position>) -> Option<Position> {
    let mut nearest = None;
    let mut shortest = i32::MAX;
    for position in positions {
        let distance = from.distance(position);
        if distance < shortest {
            nearest = Some(position);
            shortest = distance;
        }
    }
    nearest
}

/// Stay on a threatened tile the unit is still able to stand on.
pub struct HoldThreatenedPosition;

impl FallbackStrategy for HoldThreatenedPosition {
    fn name(&self) -> &'static str {
        "hold_threatened_position"
    }

    fn decide(&self, ctx: &RobotContext<'_>, unit: &Unit, movable: &[Position]) -> Option<Decision> {
        let here = unit.position;
        (ctx.is_threatened(here) && movable.contains(&here))
            .then(|| Decision::new(Action::standby(here)))
    }
}

/// Conquerors head for the nearest capturable village nobody has claimed.
pub struct CaptureVillage;

impl FallbackStrategy for CaptureVillage {
    fn name(&self) -> &'static str {
        "capture_village"
    }

    fn decide(&self, ctx: &RobotContext<'_>, unit: &Unit, _movable: &[Position]) -> Option<Decision> {
        if !unit.has_ability(Ability::Conqueror) {
            return None;
        }
        let board = ctx.board();
        let villages = board.village_positions().into_iter().filter(|&position| {
            !ctx.is_assigned(position)
                && board.tile(position).is_some_and(|tile| ctx.is_capturable(tile))
        });
        let village = nearest(unit.position, villages)?;
        Some(Decision::claiming(advance(ctx, unit, village), village))
    }
}

/// Close in on the nearest enemy commander.
pub struct HuntCommander;

impl FallbackStrategy for HuntCommander {
    fn name(&self) -> &'static str {
        "hunt_commander"
    }

    fn decide(&self, ctx: &RobotContext<'_>, unit: &Unit, _movable: &[Position]) -> Option<Decision> {
        let commanders = ctx
            .board()
            .units()
            .iter()
            .filter(|other| ctx.is_enemy_commander(other))
            .map(|other| other.position);
        let target = nearest(unit.position, commanders)?;
        Some(Decision::new(advance(ctx, unit, target)))
    }
}

/// Commanders march on the nearest castle not held by their alliance, or
/// settle on the best standby tile when every castle is friendly.
pub struct SeekCastle;

impl FallbackStrategy for SeekCastle {
    fn name(&self) -> &'static str {
        "seek_castle"
    }

    fn decide(&self, ctx: &RobotContext<'_>, unit: &Unit, movable: &[Position]) -> Option<Decision> {
        if !unit.is_commander() {
            return None;
        }
        let board = ctx.board();
        let castles = board.castle_positions().into_iter().filter(|&position| {
            board.tile(position).is_some_and(|tile| ctx.is_capturable(tile))
        });
        let action = match nearest(unit.position, castles) {
            Some(castle) => advance(ctx, unit, castle),
            None => Action::standby(preferred_standby_position(ctx, unit, movable)),
        };
        Some(Decision::new(action))
    }
}

/// Close in on the nearest enemy unit.
pub struct ChaseEnemy;

impl FallbackStrategy for ChaseEnemy {
    fn name(&self) -> &'static str {
        "chase_enemy"
    }

    fn decide(&self, ctx: &RobotContext<'_>, unit: &Unit, _movable: &[Position]) -> Option<Decision> {
        let enemies = ctx
            .board()
            .units()
            .iter()
            .filter(|other| ctx.is_enemy(Some(other)))
            .map(|other| other.position);
        let target = nearest(unit.position, enemies)?;
        Some(Decision::new(advance(ctx, unit, target)))
    }
}

/// Terminal link: the best standby tile in reach.
pub struct HoldBestStandby;

impl FallbackStrategy for HoldBestStandby {
    fn name(&self) -> &'static str {
        "hold_best_standby"
    }

    fn decide(&self, ctx: &RobotContext<'_>, unit: &Unit, movable: &[Position]) -> Option<Decision> {
        Some(Decision::new(Action::standby(preferred_standby_position(
            ctx, unit, movable,
        ))))
    }
}

/// Strategies evaluated in order until one decides.
pub struct FallbackChain {
    strategies: Vec<Box<dyn FallbackStrategy>>,
}

impl FallbackChain {
    pub fn new(strategies: Vec<Box<dyn FallbackStrategy>>) -> Self {
        Self { strategies }
    }

    /// Hold a threatened tile, capture a village, hunt the enemy commander,
    /// seek a castle (commanders), chase any enemy, then hold the best tile.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(HoldThreatenedPosition),
            Box::new(CaptureVillage),
            Box::new(HuntCommander),
            Box::new(SeekCastle),
            Box::new(ChaseEnemy),
            Box::new(HoldBestStandby),
        ])
    }

    /// First decision in the chain, or standby in place if every link passes.
    pub fn decide(&self, ctx: &RobotContext<'_>, unit: &Unit, movable: &[Position]) -> Decision {
        for strategy in &self.strategies {
            if let Some(decision) = strategy.decide(ctx, unit, movable) {
                debug!(
                    unit = %unit.id,
                    strategy = strategy.name(),
                    action = %decision.action,
                    "fallback decided"
                );
                return decision;
            }
        }
        Decision::new(Action::standby(unit.position))
    }
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use game_core::{
        BattleManager, Board, GameConfig, GameManager, Player, RuleSet, TeamId, UnitTypeId,
    };

    use super::*;
    use crate::engine::abilities::AbilityIndex;
    use crate::engine::threat::ThreatMap;

    const RED: TeamId = TeamId(0);
    const BLUE: TeamId = TeamId(1);

    fn game(rows: &[&str]) -> BattleManager {
        let board = Board::from_rows(rows).unwrap();
        let players = vec![Player::new(RED, 0, 0), Player::new(BLUE, 1, 0)];
        BattleManager::new(board, RuleSet::standard(), players, GameConfig::default())
    }

    /// Runs the standard chain for the unit at `position`.
    fn decide(game: &BattleManager, position: Position, assigned: &[Position]) -> Decision {
        let threats = ThreatMap::build(game, RED);
        let assigned: HashSet<Position> = assigned.iter().copied().collect();
        let abilities = AbilityIndex::build(game.rules());
        let ctx = RobotContext {
            manager: game,
            team: RED,
            threats: &threats,
            assigned: &assigned,
            abilities: &abilities,
        };
        let unit = game.board().unit_at(position).unwrap();
        let movable = game.positions().movable_positions(game.board(), unit);
        FallbackChain::standard().decide(&ctx, unit, &movable)
    }

    #[test]
    fn threatened_tile_is_held() {
        let mut game = game(&["C.....", "......"]);
        game.board_mut().set_owner(Position::ORIGIN, Some(RED));
        game.deploy(UnitTypeId(1), RED, Position::ORIGIN).unwrap();
        game.deploy(UnitTypeId(4), BLUE, Position::new(3, 1)).unwrap();

        let decision = decide(&game, Position::ORIGIN, &[]);
        assert_eq!(decision, Decision::new(Action::standby(Position::ORIGIN)));
    }

    #[test]
    fn conquerors_claim_the_nearest_unassigned_village() {
        let mut game = game(&["..V.......V"]);
        game.deploy(UnitTypeId(0), RED, Position::ORIGIN).unwrap();

        let decision = decide(&game, Position::ORIGIN, &[]);
        assert_eq!(decision.claim, Some(Position::new(2, 0)));
        assert_eq!(decision.action, Action::standby(Position::new(2, 0)));

        let decision = decide(&game, Position::ORIGIN, &[Position::new(2, 0)]);
        assert_eq!(decision.claim, Some(Position::new(10, 0)));
        assert_eq!(decision.action, Action::standby(Position::new(5, 0)));
    }

    #[test]
    fn enemy_commander_is_hunted_before_other_enemies() {
        let mut game = game(&["..........", ".........."]);
        game.deploy(UnitTypeId(1), RED, Position::ORIGIN).unwrap();
        game.deploy(UnitTypeId(1), BLUE, Position::new(2, 1)).unwrap();
        game.deploy(UnitTypeId(4), BLUE, Position::new(9, 0)).unwrap();

        let decision = decide(&game, Position::ORIGIN, &[]);
        assert_eq!(decision.action, Action::standby(Position::new(5, 0)));
        assert_eq!(decision.claim, None);
    }

    #[test]
    fn commanders_seek_a_capturable_castle() {
        let mut game = game(&["........C"]);
        game.deploy(UnitTypeId(4), RED, Position::ORIGIN).unwrap();
        game.deploy(UnitTypeId(1), BLUE, Position::new(8, 0)).unwrap();

        let decision = decide(&game, Position::ORIGIN, &[]);
        assert_eq!(decision.action, Action::standby(Position::new(5, 0)));
    }

    #[test]
    fn other_units_chase_the_nearest_enemy() {
        let mut game = game(&[".........."]);
        game.deploy(UnitTypeId(1), RED, Position::ORIGIN).unwrap();
        game.deploy(UnitTypeId(1), BLUE, Position::new(9, 0)).unwrap();

        let decision = decide(&game, Position::ORIGIN, &[]);
        assert_eq!(decision.action, Action::standby(Position::new(5, 0)));
    }

    #[test]
    fn lone_units_hold_the_best_standby_tile() {
        let mut game = game(&["...."]);
        game.deploy(UnitTypeId(1), RED, Position::ORIGIN).unwrap();

        let decision = decide(&game, Position::ORIGIN, &[]);
        assert_eq!(decision.action.kind(), crate::engine::action::OperationKind::Standby);
        assert_eq!(decision.claim, None);
    }

    #[test]
    fn empty_chain_stands_in_place() {
        let mut game = game(&["...."]);
        game.deploy(UnitTypeId(1), RED, Position::new(2, 0)).unwrap();

        let threats = ThreatMap::default();
        let assigned = HashSet::new();
        let abilities = AbilityIndex::default();
        let ctx = RobotContext {
            manager: &game,
            team: RED,
            threats: &threats,
            assigned: &assigned,
            abilities: &abilities,
        };
        let unit = game.board().unit_at(Position::new(2, 0)).unwrap();
        let decision = FallbackChain::new(Vec::new()).decide(&ctx, unit, &[]);
        assert_eq!(decision, Decision::new(Action::standby(Position::new(2, 0))));
    }
}
