//! Controller operating modes.

use core::fmt;

/// Which source owns the motor outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionMode {
    /// Operator jog commands drive the motors directly.
    #[default]
    Manual,
    /// The PID loop drives toward the target position.
    Automatic,
    /// The homing sequence owns the motors.
    Calibrating,
}

impl MotionMode {
    /// Mode name for display/debugging.
    pub const fn name(self) -> &'static str {
        match self {
            MotionMode::Manual => "Manual",
            MotionMode::Automatic => "Automatic",
            MotionMode::Calibrating => "Calibrating",
        }
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a [`calibrate`](super::MotionController::calibrate) call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationOutcome {
    /// Zero established and the position is now held in Automatic mode.
    Completed,
    /// Shutdown was requested (or the loop was not running); nothing changed.
    Aborted,
    /// Another calibration is already in progress.
    Busy,
}
