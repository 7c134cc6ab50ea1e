//! Reachability queries over the board.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::state::{Ability, Board, Position, StatusKind, TileKind, Unit};

/// Answers movement and targeting questions for a unit on a board.
///
/// Every method is a pure function of its arguments; results come back in a
/// deterministic order because callers break ties by iteration order.
pub trait PositionGenerator: Send + Sync {
    /// Tiles within the unit's movement this turn, starting with its own
    /// position. Tiles held by other units are included when they could be
    /// entered once vacated, but are never passed through.
    fn reachable_positions(&self, board: &Board, unit: &Unit) -> Vec<Position>;

    /// Reachable tiles the unit may end its movement on.
    fn movable_positions(&self, board: &Board, unit: &Unit) -> Vec<Position> {
        let mut positions = self.reachable_positions(board, unit);
        positions.retain(|&position| {
            board
                .unit_at(position)
                .is_none_or(|occupant| occupant.is_same_unit(unit))
        });
        positions
    }

    /// Tiles the unit could strike from where it currently stands.
    fn attackable_positions(&self, board: &Board, unit: &Unit) -> Vec<Position> {
        self.positions_within_range(
            board,
            unit.position,
            unit.min_attack_range,
            unit.max_attack_range,
        )
    }

    /// On-board tiles whose distance from `center` lies in `[min, max]`,
    /// scanned row by row.
    fn positions_within_range(
        &self,
        board: &Board,
        center: Position,
        min: i32,
        max: i32,
    ) -> Vec<Position> {
        let mut positions = Vec::new();
        if max < min || max < 0 {
            return positions;
        }
        for y in (center.y - max)..=(center.y + max) {
            for x in (center.x - max)..=(center.x + max) {
                let position = Position::new(x, y);
                let distance = center.distance(position);
                if distance >= min && distance <= max && board.contains(position) {
                    positions.push(position);
                }
            }
        }
        positions
    }

    /// The single movable tile that brings the unit closest to `target`
    /// along a walkable path. Returns the unit's position when no step helps.
    fn next_position_toward(&self, board: &Board, unit: &Unit, target: Position) -> Position;
}

/// Movement-point flood fill over per-terrain move costs.
///
/// Units of other teams block passage. Units of the moving unit's own team
/// may be passed through but not stopped on.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridPositionGenerator;

impl GridPositionGenerator {
    pub const fn new() -> Self {
        Self
    }

    /// Cost for `unit` to enter a tile of the given kind, `None` if impassable.
    pub fn move_cost(unit: &Unit, kind: TileKind) -> Option<i32> {
        if unit.has_ability(Ability::AirForce) {
            return Some(1);
        }
        let rough = if unit.has_ability(Ability::Crawler) {
            1
        } else {
            2
        };
        match kind {
            TileKind::Water => None,
            TileKind::Forest | TileKind::Hill => Some(rough),
            TileKind::Mountain => Some(rough + 1),
            TileKind::Plains
            | TileKind::Road
            | TileKind::Castle
            | TileKind::Village
            | TileKind::Ruins => Some(1),
        }
    }

    fn movement_budget(unit: &Unit) -> i32 {
        match unit.status {
            Some(StatusKind::Slowed) => (unit.movement_point - 1).max(0),
            _ => unit.movement_point,
        }
    }

    fn entry_cost(board: &Board, unit: &Unit, position: Position) -> Option<i32> {
        let tile = board.tile(position)?;
        Self::move_cost(unit, tile.kind)
    }

    /// Cheapest path cost from every tile to `target`, ignoring units.
    fn distance_field(board: &Board, unit: &Unit, target: Position) -> HashMap<Position, i32> {
        let mut field = HashMap::new();
        if !board.contains(target) {
            return field;
        }
        let mut frontier = BinaryHeap::new();
        field.insert(target, 0);
        frontier.push(Reverse((0, target)));

        while let Some(Reverse((cost, position))) = frontier.pop() {
            if field.get(&position).is_some_and(|&best| cost > best) {
                continue;
            }
            // Stepping from `next` onto `position` pays the cost of `position`.
            let Some(step) = Self::entry_cost(board, unit, position) else {
                continue;
            };
            for next in position.neighbors() {
                if !board.contains(next) || Self::entry_cost(board, unit, next).is_none() {
                    continue;
                }
                let candidate = cost + step;
                if field.get(&next).is_none_or(|&best| candidate < best) {
                    field.insert(next, candidate);
                    frontier.push(Reverse((candidate, next)));
                }
            }
        }
        field
    }
}

impl PositionGenerator for GridPositionGenerator {
    fn reachable_positions(&self, board: &Board, unit: &Unit) -> Vec<Position> {
        let budget = Self::movement_budget(unit);
        let mut best: HashMap<Position, i32> = HashMap::new();
        let mut settled = Vec::new();
        let mut frontier = BinaryHeap::new();

        best.insert(unit.position, 0);
        frontier.push(Reverse((0, unit.position)));

        while let Some(Reverse((cost, position))) = frontier.pop() {
            if best.get(&position).is_some_and(|&known| cost > known) || settled.contains(&position)
            {
                continue;
            }
            settled.push(position);

            // Other teams' units end the path on their tile.
            if board
                .unit_at(position)
                .is_some_and(|other| other.team != unit.team)
            {
                continue;
            }

            for next in position.neighbors() {
                let Some(step) = Self::entry_cost(board, unit, next) else {
                    continue;
                };
                let candidate = cost + step;
                if candidate <= budget && best.get(&next).is_none_or(|&known| candidate < known) {
                    best.insert(next, candidate);
                    frontier.push(Reverse((candidate, next)));
                }
            }
        }
        settled
    }

    fn next_position_toward(&self, board: &Board, unit: &Unit, target: Position) -> Position {
        let field = Self::distance_field(board, unit, target);
        let mut preferred = unit.position;
        let mut shortest = field.get(&unit.position).copied().unwrap_or(i32::MAX);

        for position in self.movable_positions(board, unit) {
            match field.get(&position) {
                Some(&distance) if distance < shortest => {
                    preferred = position;
                    shortest = distance;
                }
                _ => {}
            }
        }
        preferred
    }
}
