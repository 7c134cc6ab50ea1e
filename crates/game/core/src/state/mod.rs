//! Battle state representation.
//!
//! This module owns the data structures that describe units, tiles, the board
//! and the participating players. Hosts mutate the board exclusively through a
//! [`crate::GameManager`]; the robot only reads it and works on cloned unit
//! snapshots when it needs to simulate outcomes.
pub mod board;
pub mod types;

pub use board::{Board, BoardError};
pub use types::{
    Ability, AttackType, Player, Position, StatusKind, TeamId, Tile, TileKind, Unit, UnitId,
    UnitTypeId,
};
