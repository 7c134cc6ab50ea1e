//! Scheduler worker that runs the decision engine one step at a time.
//!
//! The worker owns the [`TurnPhaseController`] and shares the game manager with
//! the host through a single coarse lock. Each step waits out the settling
//! delay unlocked, then runs on the blocking pool while holding the lock. A
//! panicking step is caught before the guard drops, so the lock is never
//! poisoned and the next request can retry.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::{task, time};
use tracing::{debug, error, warn};

use game_core::{GameError, GameManager};

use super::RobotMetrics;
use crate::api::{Result, RuntimeError};
use crate::engine::{StepOutcome, TurnPhaseController};

/// Game manager shared between the host and the robot worker.
pub type SharedManager<M> = Arc<Mutex<M>>;

/// Commands that can be sent to the scheduler worker.
pub enum Command {
    /// Reset the controller for a new controlled turn.
    Initialize { reply: oneshot::Sender<Result<()>> },
    /// Run one engine step. The sender has already raised the calculating
    /// flag; the worker lowers it when the step is over.
    Step,
}

/// Background task that turns step requests into engine steps.
pub struct SchedulerWorker<M> {
    manager: SharedManager<M>,
    controller: Arc<Mutex<TurnPhaseController>>,
    command_rx: mpsc::Receiver<Command>,
    shutdown_rx: watch::Receiver<bool>,
    calculating: Arc<AtomicBool>,
    metrics: Arc<RobotMetrics>,
    settle_delay: Duration,
}

impl<M> SchedulerWorker<M>
where
    M: GameManager + 'static,
{
    pub fn new(
        manager: SharedManager<M>,
        controller: TurnPhaseController,
        command_rx: mpsc::Receiver<Command>,
        shutdown_rx: watch::Receiver<bool>,
        calculating: Arc<AtomicBool>,
        metrics: Arc<RobotMetrics>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            manager,
            controller: Arc::new(Mutex::new(controller)),
            command_rx,
            shutdown_rx,
            calculating,
            metrics,
            settle_delay,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_rx.changed() => break,
                command = self.command_rx.recv() => match command {
                    Some(command) => {
                        if !self.handle_command(command).await {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
        self.calculating.store(false, Ordering::Release);
        debug!("robot scheduler stopped");
    }

    /// Returns `false` once the worker should stop.
    async fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Initialize { reply } => {
                let result = self.initialize();
                if reply.send(result).is_err() {
                    debug!("Initialize reply channel closed (caller dropped)");
                }
                true
            }
            Command::Step => self.handle_step().await,
        }
    }

    fn initialize(&self) -> Result<()> {
        let manager = self
            .manager
            .lock()
            .map_err(|_| RuntimeError::ManagerPoisoned)?;
        let mut controller = self.controller.lock().unwrap_or_else(PoisonError::into_inner);
        controller.initialize(manager.rules());
        Ok(())
    }

    async fn handle_step(&mut self) -> bool {
        // Settle without holding the lock; a shutdown abandons the step.
        tokio::select! {
            biased;
            _ = self.shutdown_rx.changed() => {
                debug!("step abandoned during settling delay");
                self.calculating.store(false, Ordering::Release);
                return false;
            }
            _ = time::sleep(self.settle_delay) => {}
        }

        let manager = Arc::clone(&self.manager);
        let controller = Arc::clone(&self.controller);
        let result = task::spawn_blocking(move || run_step(&manager, &controller)).await;

        match result {
            Ok(Ok(outcome)) => {
                debug!(?outcome, "robot step completed");
                self.metrics.record_outcome(&outcome);
            }
            Ok(Err(_)) => self.recover(),
            Err(join_error) => {
                error!(error = %join_error, "robot step panicked");
                self.recover();
            }
        }

        self.calculating.store(false, Ordering::Release);
        true
    }

    /// Drops the failed step's progress so the next request starts clean.
    fn recover(&self) {
        self.metrics.record_failure();
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abort();
        warn!("robot controller reset after failed step");
    }
}

/// One locked engine step.
fn run_step<M: GameManager>(
    manager: &Mutex<M>,
    controller: &Mutex<TurnPhaseController>,
) -> Result<StepOutcome> {
    let mut controller = controller.lock().unwrap_or_else(PoisonError::into_inner);
    let mut manager = manager.lock().map_err(|_| {
        error!("game manager lock poisoned");
        RuntimeError::ManagerPoisoned
    })?;

    // Unwinding stops here, while both guards are still held.
    let stepped = panic::catch_unwind(AssertUnwindSafe(|| {
        let phase = manager.phase();
        (phase, controller.step(&mut *manager))
    }));
    let (phase, result) = match stepped {
        Ok(stepped) => stepped,
        Err(payload) => {
            let message = panic_message(&*payload);
            error!(team = %controller.team(), %message, "robot step panicked");
            return Err(RuntimeError::StepPanicked(message));
        }
    };

    result.inspect_err(|error| {
        error!(
            %phase,
            team = %controller.team(),
            unit = ?manager.selected_unit().map(|unit| unit.id),
            pending = ?controller.pending().map(|flight| flight.action),
            severity = error.severity().as_str(),
            code = error.error_code(),
            %error,
            "robot step failed"
        );
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
