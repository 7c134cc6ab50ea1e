//! Common error infrastructure for game-core.
//!
//! Commands issued against a [`crate::GameManager`] fail with [`CommandError`]
//! when they are illegal for the current phase or board. Errors carry a
//! severity so callers can decide whether a retry makes sense.

use crate::manager::Phase;
use crate::state::{Position, TeamId, UnitTypeId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: Temporary conditions that may succeed on a later attempt
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors indicating corrupted game state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Rejection of a command issued to the game manager.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("command requires phase {expected:?}, current phase is {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("no unit is selected")]
    NoSelectedUnit,

    #[error("no selectable unit of team {team} at {position:?}")]
    NotSelectable { team: TeamId, position: Position },

    #[error("position {0:?} is not reachable by the selected unit")]
    Unreachable(Position),

    #[error("position {0:?} is not a valid target")]
    InvalidTarget(Position),

    #[error("position {0:?} is outside the board")]
    OutOfBounds(Position),

    #[error("unit type {0:?} is not recruitable")]
    UnknownUnitType(UnitTypeId),

    #[error("team {team} cannot buy unit type {unit_type:?} at {position:?}")]
    CannotBuy {
        team: TeamId,
        unit_type: UnitTypeId,
        position: Position,
    },

    #[error("the game is over")]
    GameOver,
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        use CommandError::*;
        match self {
            WrongPhase { .. } | NoSelectedUnit => ErrorSeverity::Recoverable,
            NotSelectable { .. }
            | Unreachable(_)
            | InvalidTarget(_)
            | OutOfBounds(_)
            | UnknownUnitType(_)
            | CannotBuy { .. } => ErrorSeverity::Validation,
            GameOver => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use CommandError::*;
        match self {
            WrongPhase { .. } => "COMMAND_WRONG_PHASE",
            NoSelectedUnit => "COMMAND_NO_SELECTED_UNIT",
            NotSelectable { .. } => "COMMAND_NOT_SELECTABLE",
            Unreachable(_) => "COMMAND_UNREACHABLE",
            InvalidTarget(_) => "COMMAND_INVALID_TARGET",
            OutOfBounds(_) => "COMMAND_OUT_OF_BOUNDS",
            UnknownUnitType(_) => "COMMAND_UNKNOWN_UNIT_TYPE",
            CannotBuy { .. } => "COMMAND_CANNOT_BUY",
            GameOver => "COMMAND_GAME_OVER",
        }
    }
}
