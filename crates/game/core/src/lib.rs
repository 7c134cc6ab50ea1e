//! Battle data model and rule collaborators shared by the robot and hosts.
//!
//! `game-core` defines the board, units and tiles of a turn-based tactical
//! battle together with the capabilities an opponent engine consumes:
//! [`PositionGenerator`] for reachability, [`CombatEvaluator`] for
//! side-effect free combat simulation, and [`GameManager`] for phase,
//! queries and commands. Deterministic reference implementations
//! ([`GridPositionGenerator`], [`StandardCombat`], [`BattleManager`]) let the
//! engine run end to end without a rendering host.
pub mod config;
pub mod env;
pub mod error;
pub mod manager;
pub mod state;

pub use config::GameConfig;
pub use env::{
    CombatEvaluator, GridPositionGenerator, PositionGenerator, RuleSet, StandardCombat,
};
pub use error::{CommandError, ErrorSeverity, GameError};
pub use manager::{BattleManager, GameManager, Phase};
pub use state::{
    Ability, AttackType, Board, BoardError, Player, Position, StatusKind, TeamId, Tile, TileKind, Unit,
    UnitId, UnitTypeId,
};
