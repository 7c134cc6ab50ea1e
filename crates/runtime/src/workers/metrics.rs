//! Robot step metrics and statistics.
//!
//! Tracks how many steps ran, how many failed, and what they accomplished.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::StepOutcome;

/// Step metrics tracked by the scheduler worker.
///
/// Uses atomics for lock-free access across threads.
#[derive(Debug, Default)]
pub struct RobotMetrics {
    /// Steps that finished without error
    steps_completed: AtomicU64,

    /// Steps that returned an error or panicked
    steps_failed: AtomicU64,

    /// Actions computed for a selected unit
    actions_submitted: AtomicU64,

    units_recruited: AtomicU64,

    turns_ended: AtomicU64,
}

impl RobotMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful step and what it did.
    pub fn record_outcome(&self, outcome: &StepOutcome) {
        self.steps_completed.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            StepOutcome::Planned(_) => &self.actions_submitted,
            StepOutcome::Recruited { .. } => &self.units_recruited,
            StepOutcome::TurnEnded => &self.turns_ended,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.steps_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn steps_completed(&self) -> u64 {
        self.steps_completed.load(Ordering::Relaxed)
    }

    pub fn steps_failed(&self) -> u64 {
        self.steps_failed.load(Ordering::Relaxed)
    }

    pub fn actions_submitted(&self) -> u64 {
        self.actions_submitted.load(Ordering::Relaxed)
    }

    pub fn units_recruited(&self) -> u64 {
        self.units_recruited.load(Ordering::Relaxed)
    }

    pub fn turns_ended(&self) -> u64 {
        self.turns_ended.load(Ordering::Relaxed)
    }

    /// Creates a snapshot of all metrics for display/logging.
    ///
    /// Individual fields are read atomically; the snapshot as a whole may mix
    /// values from before and after a concurrent step.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            steps_completed: self.steps_completed(),
            steps_failed: self.steps_failed(),
            actions_submitted: self.actions_submitted(),
            units_recruited: self.units_recruited(),
            turns_ended: self.turns_ended(),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    pub steps_completed: u64,
    pub steps_failed: u64,
    pub actions_submitted: u64,
    pub units_recruited: u64,
    pub turns_ended: u64,
}
