//! Hardware capability traits and their embedded-hal 1.0 implementations.
//!
//! The controller only ever talks to these traits. Board code builds the
//! concrete pins (from [`crate::config::PinAssignments`]) and hands them to
//! the drivers in this module, or supplies its own implementations.

mod hbridge;
mod inputs;
mod trigger;

pub use hbridge::{HBridge, HBridgeMotors};
pub use inputs::{ButtonState, PinButtons, PinLimitSwitches};
pub use trigger::PinTrigger;

use crate::config::units::Speed;
use crate::control::{Axis, AxisCommand, Direction, LimitState};
use crate::error::Result;

/// Direction and duty output for both motors.
///
/// Implementations own the direction last written per axis and report it
/// through [`direction`](MotorOutput::direction); the safety lockout depends
/// on that value being real.
pub trait MotorOutput {
    /// Bring outputs to a known state. Defaults to [`stop_all`](MotorOutput::stop_all).
    fn initialize(&mut self) -> Result<()> {
        self.stop_all()
    }

    /// Set bridge direction for one axis.
    fn set_direction(&mut self, axis: Axis, direction: Direction) -> Result<()>;

    /// Set PWM duty for one axis.
    fn set_speed(&mut self, axis: Axis, speed: Speed) -> Result<()>;

    /// Direction currently applied to an axis.
    fn direction(&self, axis: Axis) -> Direction;

    /// Write a full command (direction then speed).
    fn apply(&mut self, axis: Axis, command: AxisCommand) -> Result<()> {
        self.set_direction(axis, command.direction)?;
        self.set_speed(axis, command.speed)
    }

    /// Stop one axis.
    fn stop(&mut self, axis: Axis) -> Result<()> {
        self.apply(axis, AxisCommand::STOP)
    }

    /// Stop both axes. Y is still attempted if X fails; the first error wins.
    fn stop_all(&mut self) -> Result<()> {
        let x = self.stop(Axis::X);
        let y = self.stop(Axis::Y);
        x.and(y)
    }
}

/// End-of-travel switches.
pub trait LimitSwitchInput {
    /// Sample all four switches.
    fn read(&mut self) -> Result<LimitState>;
}

/// Operator jog panel.
pub trait ButtonInput {
    /// Sample all five buttons.
    fn read(&mut self) -> Result<ButtonState>;
}

/// Imaging (exposure) trigger line.
pub trait ImagingTrigger {
    /// Assert or release the trigger.
    fn set(&mut self, active: bool) -> Result<()>;
}
