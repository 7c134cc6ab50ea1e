//! Positions enemy capturers could reach this turn.

use std::collections::HashSet;

use game_core::{Ability, GameManager, Position, TeamId};

/// Friendly castles reachable by an enemy commander and friendly villages
/// reachable by an enemy conqueror.
///
/// Garrisoned tiles count: a capturer that could step in once the garrison
/// leaves threatens them. Only valid for the turn it was built in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThreatMap {
    threatened: HashSet<Position>,
}

impl ThreatMap {
    pub fn build(manager: &dyn GameManager, team: TeamId) -> Self {
        let board = manager.board();
        let positions = manager.positions();
        let mut threatened = HashSet::new();

        for enemy in board.units() {
            if !manager.is_enemy(team, enemy.team) {
                continue;
            }
            let commander = enemy.has_ability(Ability::Commander);
            let conqueror = enemy.has_ability(Ability::Conqueror);
            if !commander && !conqueror {
                continue;
            }
            for position in positions.reachable_positions(board, enemy) {
                let Some(tile) = board.tile(position) else {
                    continue;
                };
                if tile.team != Some(team) {
                    continue;
                }
                if (commander && tile.is_castle()) || (conqueror && tile.is_village()) {
                    threatened.insert(position);
                }
            }
        }

        Self { threatened }
    }

    pub fn is_threatened(&self, position: Position) -> bool {
        self.threatened.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.threatened.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threatened.is_empty()
    }

    pub fn clear(&mut self) {
        self.threatened.clear();
    }
}
