//! Read-only blackboard shared by the engine's decision helpers.

use std::collections::HashSet;

use game_core::{Board, GameManager, Position, TeamId, Tile, Unit};

use super::abilities::AbilityIndex;
use super::threat::ThreatMap;

/// Returned by the average-distance helpers when nobody qualifies.
pub const NO_DISTANCE: i32 = 999;

/// Everything a decision helper may consult for the controlled team.
///
/// Borrowed for the duration of one locked step; helpers never mutate it.
/// Claims on [`RobotContext::assigned`] are applied by the controller.
#[derive(Clone, Copy)]
pub struct RobotContext<'a> {
    pub manager: &'a dyn GameManager,
    pub team: TeamId,
    pub threats: &'a ThreatMap,
    pub assigned: &'a HashSet<Position>,
    pub abilities: &'a AbilityIndex,
}

impl<'a> RobotContext<'a> {
    pub fn board(&self) -> &'a Board {
        self.manager.board()
    }

    pub fn gold(&self) -> i32 {
        self.manager.gold(self.team)
    }

    pub fn is_threatened(&self, position: Position) -> bool {
        self.threats.is_threatened(position)
    }

    pub fn is_assigned(&self, position: Position) -> bool {
        self.assigned.contains(&position)
    }

    // ========================================================================
    // Unit relations
    // ========================================================================

    /// Own units only; allied teams do not count.
    pub fn is_ally(&self, unit: Option<&Unit>) -> bool {
        unit.is_some_and(|unit| unit.team == self.team)
    }

    pub fn is_enemy(&self, unit: Option<&Unit>) -> bool {
        unit.is_some_and(|unit| self.manager.is_enemy(self.team, unit.team))
    }

    pub fn is_enemy_commander(&self, unit: &Unit) -> bool {
        self.is_enemy(Some(unit)) && unit.is_commander()
    }

    pub fn is_my_commander(&self, unit: &Unit) -> bool {
        unit.is_commander() && unit.team == self.team
    }

    // ========================================================================
    // Tile relations
    // ========================================================================

    pub fn is_my_castle(&self, tile: Option<&Tile>) -> bool {
        tile.is_some_and(|tile| tile.is_castle() && tile.team == Some(self.team))
    }

    pub fn is_my_village(&self, tile: Option<&Tile>) -> bool {
        tile.is_some_and(|tile| tile.is_village() && tile.team == Some(self.team))
    }

    pub fn is_enemy_castle(&self, tile: Option<&Tile>) -> bool {
        tile.is_some_and(|tile| {
            tile.is_castle() && self.manager.is_enemy_owner(self.team, tile.team)
        })
    }

    pub fn is_enemy_village(&self, tile: Option<&Tile>) -> bool {
        tile.is_some_and(|tile| {
            tile.is_village() && self.manager.is_enemy_owner(self.team, tile.team)
        })
    }

    /// Whether the tile is not held by this team or an ally of it.
    pub fn is_capturable(&self, tile: &Tile) -> bool {
        !self.manager.is_ally_owner(self.team, tile.team)
    }

    // ========================================================================
    // Distances and prices
    // ========================================================================

    /// Mean Manhattan distance from `position` to every allied unit.
    pub fn average_ally_distance(&self, position: Position) -> i32 {
        self.average_distance(position, |unit| self.manager.is_ally(self.team, unit.team))
    }

    /// Mean Manhattan distance from `position` to every enemy unit.
    pub fn average_enemy_distance(&self, position: Position) -> i32 {
        self.average_distance(position, |unit| self.manager.is_enemy(self.team, unit.team))
    }

    fn average_distance(&self, position: Position, include: impl Fn(&Unit) -> bool) -> i32 {
        let (count, total) = self
            .board()
            .units()
            .iter()
            .filter(|&unit| include(unit))
            .fold((0, 0), |(count, total), unit| {
                (count + 1, total + unit.position.distance(position))
            });
        if count == 0 { NO_DISTANCE } else { total / count }
    }

    /// Price of the cheapest recruitable unit.
    pub fn cheapest_unit_price(&self) -> i32 {
        self.recruit_price_at(0)
    }

    /// Price of the second entry of the recruit list, or the first when only
    /// one type is recruitable.
    pub fn second_cheapest_unit_price(&self) -> i32 {
        let available = self.manager.rules().available_units();
        self.recruit_price_at(if available.len() >= 2 { 1 } else { 0 })
    }

    fn recruit_price_at(&self, index: usize) -> i32 {
        self.manager
            .rules()
            .available_units()
            .get(index)
            .map(|&type_id| self.manager.unit_price(type_id, self.team))
            .unwrap_or(i32::MAX)
    }
}
