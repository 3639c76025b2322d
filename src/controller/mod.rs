//! Controller module for gantry-motion.
//!
//! Ties the hardware capabilities, the position tracker and the control
//! algorithms together behind [`MotionController`], which runs a fixed-cadence
//! control loop on its own thread.
//!
//! Only one of Manual, Automatic and Calibrating owns the motors at a time;
//! the limit lockout runs on every tick regardless.

mod builder;
mod gantry;
mod hardware;
mod mode;
mod shutdown;
mod slots;

pub use builder::MotionControllerBuilder;
pub use gantry::{ControllerStatus, MotionController};
pub use hardware::Hardware;
pub use mode::{CalibrationOutcome, MotionMode};
pub use shutdown::ShutdownToken;
pub use slots::{SavedPositions, SLOT_COUNT};
