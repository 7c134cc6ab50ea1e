//! Robot orchestrator.
//!
//! [`Robot`] owns the scheduler worker and wires up the command and shutdown
//! channels; [`RobotHandle`] is the cloneable façade hosts keep.

use std::env;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use game_core::GameManager;

use crate::api::{Result, RobotHandle, RuntimeError};
use crate::engine::{FallbackChain, TurnPhaseController};
use crate::workers::{Command, RobotMetrics, SchedulerWorker, SharedManager};

/// Robot configuration shared by the orchestrator and its worker.
#[derive(Debug, Clone)]
pub struct RobotConfig {
    /// Pause before each step so a human can follow the robot's moves.
    pub settle_delay: Duration,
    pub command_buffer_size: usize,
}

impl RobotConfig {
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(150);

    /// Defaults overridden by `ROBOT_SETTLE_DELAY_MS` and
    /// `ROBOT_COMMAND_BUFFER` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(millis) = read_env::<u64>("ROBOT_SETTLE_DELAY_MS") {
            config.settle_delay = Duration::from_millis(millis);
        }
        if let Some(capacity) = read_env::<usize>("ROBOT_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        config
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
            command_buffer_size: 8,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Computer opponent driving whichever team is current when it steps.
///
/// Design: Robot owns the worker task. [`RobotHandle`] provides a cloneable
/// façade for hosts.
pub struct Robot {
    handle: RobotHandle,
    worker_handle: JoinHandle<()>,
}

impl Robot {
    pub fn builder() -> RobotBuilder {
        RobotBuilder::new()
    }

    /// Spawns a robot with the standard fallback chain.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<M>(manager: SharedManager<M>, config: RobotConfig) -> Self
    where
        M: GameManager + 'static,
    {
        Self::builder().config(config).spawn(manager)
    }

    /// Get a cloneable handle to this robot.
    pub fn handle(&self) -> RobotHandle {
        self.handle.clone()
    }

    /// Stop the worker and wait for it to exit.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown();
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Robot`].
pub struct RobotBuilder {
    config: RobotConfig,
    fallback: Option<FallbackChain>,
}

impl RobotBuilder {
    fn new() -> Self {
        Self {
            config: RobotConfig::default(),
            fallback: None,
        }
    }

    /// Override robot configuration
    pub fn config(mut self, config: RobotConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the repositioning strategies used when no action scores.
    pub fn fallback(mut self, fallback: FallbackChain) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Spawn the worker over `manager`.
    pub fn spawn<M>(self, manager: SharedManager<M>) -> Robot
    where
        M: GameManager + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let calculating = Arc::new(AtomicBool::new(false));
        let metrics = Arc::new(RobotMetrics::new());

        let mut controller = TurnPhaseController::new();
        if let Some(fallback) = self.fallback {
            controller = controller.with_fallback(fallback);
        }

        let worker = SchedulerWorker::new(
            manager,
            controller,
            command_rx,
            shutdown_rx,
            Arc::clone(&calculating),
            Arc::clone(&metrics),
            self.config.settle_delay,
        );
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        let handle = RobotHandle::new(command_tx, Arc::new(shutdown_tx), calculating, metrics);
        Robot {
            handle,
            worker_handle,
        }
    }
}
