pub mod abilities;
pub mod common;
pub mod player;
pub mod status;
pub mod tile;
pub mod unit;

pub use abilities::Ability;
pub use common::{Position, TeamId, UnitId, UnitTypeId};
pub use player::Player;
pub use status::StatusKind;
pub use tile::{Tile, TileKind};
pub use unit::{AttackType, Unit};
