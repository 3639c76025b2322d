//! Control module for gantry-motion.
//!
//! Provides the per-axis PID law, the limit-switch interlock and speed estimation.

mod command;
mod pid;
mod safety;
mod speed;

pub use command::{Axis, AxisCommand, Direction, ManualCommand, ParseManualCommandError};
pub use pid::{PidController, PidState};
pub use safety::{LimitState, SafetyMonitor};
pub use speed::SpeedEstimator;
