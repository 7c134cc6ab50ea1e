//! Cloneable façade for driving the robot worker.
//!
//! [`RobotHandle`] hides channel plumbing. Hosts call
//! [`RobotHandle::request_step`] once per frame; the request is dropped while a
//! step is still being calculated.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, oneshot, watch};

use super::errors::{Result, RuntimeError};
use crate::workers::{Command, MetricsSnapshot, RobotMetrics};

/// Client-facing handle to the robot worker.
#[derive(Clone)]
pub struct RobotHandle {
    command_tx: mpsc::Sender<Command>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    calculating: Arc<AtomicBool>,
    metrics: Arc<RobotMetrics>,
}

impl RobotHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        shutdown_tx: Arc<watch::Sender<bool>>,
        calculating: Arc<AtomicBool>,
        metrics: Arc<RobotMetrics>,
    ) -> Self {
        Self {
            command_tx,
            shutdown_tx,
            calculating,
            metrics,
        }
    }

    /// Reset engine state and re-index the recruitable catalog.
    ///
    /// Call when the robot's team takes over, before the first step.
    pub async fn initialize_for_turn(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Initialize { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Whether a step is queued or running.
    pub fn is_calculating(&self) -> bool {
        self.calculating.load(Ordering::Acquire)
    }

    /// Schedule one engine step.
    ///
    /// Returns `false` without scheduling anything when a step is already in
    /// flight.
    pub async fn request_step(&self) -> Result<bool> {
        if self
            .calculating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(false);
        }

        if self.command_tx.send(Command::Step).await.is_err() {
            self.calculating.store(false, Ordering::Release);
            return Err(RuntimeError::CommandChannelClosed);
        }
        Ok(true)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Signal the worker to stop.
    ///
    /// A step still in its settling delay is abandoned before it touches the
    /// game.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}
