//! Unified error types surfaced by the runtime API.
//!
//! Wraps rejected game commands, lock poisoning, and worker coordination
//! failures so hosts can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{CommandError, ErrorSeverity, GameError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("game manager rejected a command")]
    Command(#[from] CommandError),

    #[error("game manager lock poisoned by a panicking holder")]
    ManagerPoisoned,

    #[error("robot step panicked: {0}")]
    StepPanicked(String),

    #[error("no unit is selected for the current phase")]
    NoSelectedUnit,

    #[error("robot worker command channel closed")]
    CommandChannelClosed,

    #[error("robot worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("robot worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Command(error) => error.severity(),
            Self::NoSelectedUnit => ErrorSeverity::Recoverable,
            Self::StepPanicked(_) | Self::CommandChannelClosed | Self::ReplyChannelClosed(_) => {
                ErrorSeverity::Internal
            }
            Self::ManagerPoisoned | Self::WorkerJoin(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Command(error) => error.error_code(),
            Self::ManagerPoisoned => "RUNTIME_MANAGER_POISONED",
            Self::StepPanicked(_) => "RUNTIME_STEP_PANICKED",
            Self::NoSelectedUnit => "RUNTIME_NO_SELECTED_UNIT",
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
        }
    }
}

#[cfg(test)]
mod tests {
    use game_core::Position;

    use super::*;

    #[test]
    fn command_errors_keep_their_classification() {
        let error = RuntimeError::from(CommandError::Unreachable(Position::new(2, 3)));
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert_eq!(error.error_code(), "COMMAND_UNREACHABLE");

        assert!(RuntimeError::ManagerPoisoned.severity().is_internal());
        assert!(RuntimeError::NoSelectedUnit.severity().is_recoverable());
        assert_eq!(
            RuntimeError::StepPanicked("boom".into()).error_code(),
            "RUNTIME_STEP_PANICKED"
        );
    }
}
