//! Enumerates legal action candidates for the selected unit.

use game_core::{Ability, Position, Unit};
use tracing::debug;

use super::action::{Action, OperationKind};
use super::context::RobotContext;

/// Builds every candidate action for a unit over its movable positions.
pub struct ActionCandidateGenerator;

impl ActionCandidateGenerator {
    /// Decision for a unit that cannot move: attack the first enemy in range,
    /// otherwise hold position.
    pub fn static_action(ctx: &RobotContext<'_>, unit: &Unit) -> Action {
        let here = unit.position;
        if !ctx.manager.has_enemy_within_range(unit) {
            return Action::standby(here);
        }
        let board = ctx.board();
        ctx.manager
            .positions()
            .attackable_positions(board, unit)
            .into_iter()
            .find(|&position| ctx.is_enemy(board.unit_at(position)))
            .map(|target| Action::new(here, target, OperationKind::Attack))
            .unwrap_or(Action::standby(here))
    }

    /// Candidates in movable-position order, then ring-scan order.
    ///
    /// Heavy machines only consider the tile they start on.
    pub fn generate(ctx: &RobotContext<'_>, unit: &Unit, movable: &[Position]) -> Vec<Action> {
        let board = ctx.board();
        let positions = ctx.manager.positions();
        let heavy = unit.has_ability(Ability::HeavyMachine);
        let mut candidates = Vec::new();
        let mut moved = unit.clone();

        for &origin in movable {
            if heavy && origin != unit.position {
                continue;
            }
            moved.position = origin;

            for target in positions.positions_within_range(
                board,
                origin,
                unit.min_attack_range,
                unit.max_attack_range,
            ) {
                let occupant = board.unit_at(target);
                if ctx.is_enemy(occupant) {
                    candidates.push(Action::new(origin, target, OperationKind::Attack));
                } else if occupant.is_none()
                    && unit.has_ability(Ability::Destroyer)
                    && ctx.is_enemy_village(board.tile(target))
                {
                    candidates.push(Action::new(origin, target, OperationKind::Attack));
                }

                if let Some(patient) = occupant.filter(|&patient| ctx.is_ally(Some(patient))) {
                    if unit.has_ability(Ability::Healer) && ctx.manager.can_heal(&moved, patient) {
                        let target = if patient.is_same_unit(unit) {
                            origin
                        } else {
                            target
                        };
                        candidates.push(Action::new(origin, target, OperationKind::Heal));
                    }
                }

                if occupant.is_none()
                    && board.is_tomb(target)
                    && unit.has_ability(Ability::Necromancer)
                {
                    candidates.push(Action::new(origin, target, OperationKind::Summon));
                }
            }

            if Self::can_occupy(ctx, unit, origin) {
                candidates.push(Action::new(origin, origin, OperationKind::Occupy));
            }
            if Self::can_repair(ctx, unit, origin) {
                candidates.push(Action::new(origin, origin, OperationKind::Repair));
            }
        }

        debug!(unit = %unit.id, count = candidates.len(), "generated candidates");
        candidates
    }

    /// The tile is empty or already holds this unit.
    fn is_free_for(ctx: &RobotContext<'_>, unit: &Unit, position: Position) -> bool {
        ctx.board()
            .unit_at(position)
            .is_none_or(|occupant| occupant.is_same_unit(unit))
    }

    fn can_occupy(ctx: &RobotContext<'_>, unit: &Unit, position: Position) -> bool {
        let capturable = ctx
            .board()
            .tile(position)
            .is_some_and(|tile| ctx.is_capturable(tile));
        capturable
            && ctx.manager.can_occupy(unit, position)
            && Self::is_free_for(ctx, unit, position)
    }

    fn can_repair(ctx: &RobotContext<'_>, unit: &Unit, position: Position) -> bool {
        ctx.manager.can_repair(unit, position) && Self::is_free_for(ctx, unit, position)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use game_core::{BattleManager, Board, GameConfig, GameManager, Player, RuleSet, TeamId, UnitTypeId};

    use super::*;
    use crate::engine::abilities::AbilityIndex;
    use crate::engine::threat::ThreatMap;

    const RED: TeamId = TeamId(0);
    const BLUE: TeamId = TeamId(1);
    const GREEN: TeamId = TeamId(2);

    fn game(rows: &[&str]) -> BattleManager {
        let board = Board::from_rows(rows).unwrap();
        let players = vec![
            Player::new(RED, 0, 0),
            Player::new(BLUE, 1, 0),
            Player::new(GREEN, 0, 0),
        ];
        BattleManager::new(board, RuleSet::standard(), players, GameConfig::default())
    }

    fn candidates(game: &BattleManager, at: Position, movable: &[Position]) -> Vec<Action> {
        let threats = ThreatMap::build(game, RED);
        let assigned = HashSet::new();
        let abilities = AbilityIndex::build(game.rules());
        let ctx = RobotContext {
            manager: game,
            team: RED,
            threats: &threats,
            assigned: &assigned,
            abilities: &abilities,
        };
        let unit = game.board().unit_at(at).unwrap();
        ActionCandidateGenerator::generate(&ctx, unit, movable)
    }

    fn static_action(game: &BattleManager, at: Position) -> Action {
        let threats = ThreatMap::default();
        let assigned = HashSet::new();
        let abilities = AbilityIndex::build(game.rules());
        let ctx = RobotContext {
            manager: game,
            team: RED,
            threats: &threats,
            assigned: &assigned,
            abilities: &abilities,
        };
        ActionCandidateGenerator::static_action(&ctx, game.board().unit_at(at).unwrap())
    }

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn static_units_fire_at_the_first_enemy_in_range() {
        let mut game = game(&["....."]);
        let turret = game.deploy(UnitTypeId(1), RED, pos(2, 0)).unwrap();
        game.board_mut().unit_mut(turret).unwrap().movement_point = 0;
        assert_eq!(static_action(&game, pos(2, 0)), Action::standby(pos(2, 0)));

        game.deploy(UnitTypeId(0), BLUE, pos(4, 0)).unwrap();
        game.deploy(UnitTypeId(0), BLUE, pos(0, 0)).unwrap();
        assert_eq!(
            static_action(&game, pos(2, 0)),
            Action::new(pos(2, 0), pos(0, 0), OperationKind::Attack)
        );
    }

    #[test]
    fn heavy_machines_only_fire_from_their_starting_tile() {
        let mut game = game(&["......"]);
        game.deploy(UnitTypeId(8), RED, pos(0, 0)).unwrap();
        game.deploy(UnitTypeId(0), BLUE, pos(3, 0)).unwrap();
        game.deploy(UnitTypeId(0), BLUE, pos(5, 0)).unwrap();

        assert_eq!(
            candidates(&game, pos(0, 0), &[pos(1, 0), pos(0, 0)]),
            vec![Action::new(pos(0, 0), pos(3, 0), OperationKind::Attack)]
        );
    }

    #[test]
    fn healers_target_wounded_allies_and_themselves_from_a_new_tile() {
        let mut game = game(&["......"]);
        let healer = game.deploy(UnitTypeId(2), RED, pos(1, 0)).unwrap();
        let ally = game.deploy(UnitTypeId(0), RED, pos(3, 0)).unwrap();
        game.deploy(UnitTypeId(0), BLUE, pos(5, 0)).unwrap();
        game.board_mut().unit_mut(healer).unwrap().current_hp = 50;
        game.board_mut().unit_mut(ally).unwrap().current_hp = 40;

        assert_eq!(
            candidates(&game, pos(1, 0), &[pos(1, 0), pos(2, 0)]),
            vec![
                Action::new(pos(1, 0), pos(3, 0), OperationKind::Heal),
                Action::new(pos(2, 0), pos(2, 0), OperationKind::Heal),
                Action::new(pos(2, 0), pos(3, 0), OperationKind::Heal),
            ]
        );
    }

    #[test]
    fn necromancers_summon_only_on_empty_tombs() {
        let mut game = game(&["....."]);
        game.deploy(UnitTypeId(3), RED, pos(0, 0)).unwrap();
        game.deploy(UnitTypeId(0), BLUE, pos(1, 0)).unwrap();
        game.board_mut().add_tomb(pos(1, 0));
        game.board_mut().add_tomb(pos(2, 0));

        assert_eq!(
            candidates(&game, pos(0, 0), &[pos(0, 0)]),
            vec![
                Action::new(pos(0, 0), pos(1, 0), OperationKind::Attack),
                Action::new(pos(0, 0), pos(2, 0), OperationKind::Summon),
            ]
        );
    }

    #[test]
    fn destroyers_raze_empty_enemy_villages_and_repair_ruins() {
        let mut game = game(&["RV.V."]);
        game.board_mut().set_owner(pos(1, 0), Some(BLUE));
        game.deploy(UnitTypeId(7), RED, pos(0, 0)).unwrap();

        assert_eq!(
            candidates(&game, pos(0, 0), &[pos(0, 0), pos(2, 0)]),
            vec![
                Action::new(pos(0, 0), pos(1, 0), OperationKind::Attack),
                Action::new(pos(0, 0), pos(0, 0), OperationKind::Repair),
                Action::new(pos(2, 0), pos(1, 0), OperationKind::Attack),
            ]
        );
    }

    #[test]
    fn structures_held_by_the_alliance_are_not_occupied() {
        let mut game = game(&["VVVV."]);
        game.board_mut().set_owner(pos(0, 0), Some(RED));
        game.board_mut().set_owner(pos(1, 0), Some(GREEN));
        game.board_mut().set_owner(pos(2, 0), Some(BLUE));
        game.deploy(UnitTypeId(0), RED, pos(4, 0)).unwrap();

        let movable = [pos(0, 0), pos(1, 0), pos(2, 0), pos(3, 0), pos(4, 0)];
        assert_eq!(
            candidates(&game, pos(4, 0), &movable),
            vec![
                Action::new(pos(2, 0), pos(2, 0), OperationKind::Occupy),
                Action::new(pos(3, 0), pos(3, 0), OperationKind::Occupy),
            ]
        );
    }
}
