//! Worker tasks that back the robot.
//!
//! The scheduler worker executes engine steps on request; metrics are shared
//! with every [`crate::RobotHandle`] clone.

mod metrics;
mod scheduler;

pub use metrics::{MetricsSnapshot, RobotMetrics};
pub use scheduler::{Command, SchedulerWorker, SharedManager};
