//! Unit snapshots.
//!
//! A [`Unit`] is plain data: cloning it yields an independent snapshot that can
//! be moved or damaged hypothetically without touching the live board.

use arrayvec::ArrayVec;

use super::{Ability, Position, StatusKind, TeamId, UnitId, UnitTypeId};
use crate::config::GameConfig;

/// Damage channel of a unit's attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackType {
    #[default]
    Physical,
    Magic,
}

/// A unit on the board, or a catalog sample when not yet placed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub type_id: UnitTypeId,
    pub team: TeamId,
    pub position: Position,
    pub abilities: ArrayVec<Ability, { GameConfig::MAX_ABILITIES }>,
    pub attack: i32,
    pub attack_type: AttackType,
    pub physical_defence: i32,
    pub magic_defence: i32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub movement_point: i32,
    pub min_attack_range: i32,
    pub max_attack_range: i32,
    pub price: i32,
    pub status: Option<StatusKind>,
    /// Set once the unit has finished its activation for the current turn.
    pub standby: bool,
}

impl Unit {
    /// Creates a catalog sample of the given type with neutral stats.
    pub fn new(type_id: UnitTypeId) -> Self {
        Self {
            id: UnitId::default(),
            type_id,
            team: TeamId::default(),
            position: Position::ORIGIN,
            abilities: ArrayVec::new(),
            attack: 50,
            attack_type: AttackType::Physical,
            physical_defence: 10,
            magic_defence: 10,
            current_hp: 100,
            max_hp: 100,
            movement_point: 5,
            min_attack_range: 1,
            max_attack_range: 1,
            price: 100,
            status: None,
            standby: false,
        }
    }

    /// Places a copy of this sample on the board.
    pub fn spawn(&self, id: UnitId, team: TeamId, position: Position) -> Self {
        let mut unit = self.clone();
        unit.id = id;
        unit.team = team;
        unit.position = position;
        unit.current_hp = unit.max_hp;
        unit.status = None;
        unit.standby = false;
        unit
    }

    pub fn with_abilities(mut self, abilities: &[Ability]) -> Self {
        self.abilities.clear();
        for &ability in abilities.iter().take(GameConfig::MAX_ABILITIES) {
            if !self.abilities.contains(&ability) {
                self.abilities.push(ability);
            }
        }
        self
    }

    pub fn with_attack(mut self, attack: i32, attack_type: AttackType) -> Self {
        self.attack = attack;
        self.attack_type = attack_type;
        self
    }

    pub fn with_defence(mut self, physical: i32, magic: i32) -> Self {
        self.physical_defence = physical;
        self.magic_defence = magic;
        self
    }

    pub fn with_hp(mut self, max_hp: i32) -> Self {
        self.max_hp = max_hp;
        self.current_hp = max_hp;
        self
    }

    pub fn with_current_hp(mut self, current_hp: i32) -> Self {
        self.current_hp = current_hp;
        self
    }

    pub fn with_movement(mut self, movement_point: i32) -> Self {
        self.movement_point = movement_point;
        self
    }

    pub fn with_range(mut self, min: i32, max: i32) -> Self {
        self.min_attack_range = min;
        self.max_attack_range = max;
        self
    }

    pub fn with_price(mut self, price: i32) -> Self {
        self.price = price;
        self
    }

    pub fn with_status(mut self, status: Option<StatusKind>) -> Self {
        self.status = status;
        self
    }

    pub fn has_ability(&self, ability: Ability) -> bool {
        self.abilities.contains(&ability)
    }

    pub fn is_commander(&self) -> bool {
        self.has_ability(Ability::Commander)
    }

    /// Units without movement points fire from a fixed position.
    pub fn is_static(&self) -> bool {
        self.movement_point <= 0
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0
    }

    pub fn is_same_unit(&self, other: &Unit) -> bool {
        self.id == other.id
    }

    pub fn change_current_hp(&mut self, delta: i32) {
        self.current_hp = (self.current_hp + delta).min(self.max_hp);
    }

    /// Whether a target at `distance` falls within this unit's attack ring.
    pub fn in_attack_range(&self, distance: i32) -> bool {
        distance >= self.min_attack_range && distance <= self.max_attack_range
    }
}
