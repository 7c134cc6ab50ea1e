//! Decisions the engine hands to the game manager.

use std::fmt;

use game_core::Position;

/// Command issued once the selected unit reaches its origin tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    Attack,
    Heal,
    Occupy,
    Repair,
    Summon,
    Standby,
}

/// Where to move the selected unit and what to do once there.
///
/// Immutable; progress through the move and act phases is tracked by
/// [`InFlight`] instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    origin: Position,
    target: Position,
    kind: OperationKind,
}

impl Action {
    pub const fn new(origin: Position, target: Position, kind: OperationKind) -> Self {
        Self {
            origin,
            target,
            kind,
        }
    }

    /// Move to `position` and end the activation there.
    pub const fn standby(position: Position) -> Self {
        Self::new(position, position, OperationKind::Standby)
    }

    /// Tile the unit moves to before acting.
    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "go to {} {} {}", self.origin, self.kind, self.target)
    }
}

/// Progress of the pending action through the move and act phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Pending,
    Moved,
    Acted,
}

/// The single action being resolved for the currently selected unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InFlight {
    pub action: Action,
    pub stage: Stage,
}

impl InFlight {
    pub const fn new(action: Action) -> Self {
        Self {
            action,
            stage: Stage::Pending,
        }
    }

    pub fn is_moved(&self) -> bool {
        matches!(self.stage, Stage::Moved | Stage::Acted)
    }

    pub fn is_acted(&self) -> bool {
        self.stage == Stage::Acted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_reads_like_a_move_order() {
        let action = Action::new(
            Position::new(1, 2),
            Position::new(2, 2),
            OperationKind::Attack,
        );
        assert_eq!(action.to_string(), "go to [1, 2] attack [2, 2]");
    }

    #[test]
    fn stages_progress_monotonically() {
        let mut flight = InFlight::new(Action::standby(Position::ORIGIN));
        assert!(!flight.is_moved());
        flight.stage = Stage::Moved;
        assert!(flight.is_moved() && !flight.is_acted());
        flight.stage = Stage::Acted;
        assert!(flight.is_moved() && flight.is_acted());
    }
}
