//! Limit-switch interlock.
//!
//! A tripped switch vetoes motion toward it and nothing else: the axis may
//! always be driven back off the switch.

use crate::error::Result;
use crate::hal::MotorOutput;

use super::command::{Axis, AxisCommand, Direction};

/// Snapshot of the four end-of-travel switches (`true` = tripped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LimitState {
    /// X axis negative end.
    pub x_min: bool,
    /// X axis positive end.
    pub x_max: bool,
    /// Y axis negative end.
    pub y_min: bool,
    /// Y axis positive end.
    pub y_max: bool,
}

impl LimitState {
    /// No switch tripped.
    pub const CLEAR: LimitState = LimitState {
        x_min: false,
        x_max: false,
        y_min: false,
        y_max: false,
    };

    /// Negative-end switch for an axis.
    #[inline]
    pub fn min(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x_min,
            Axis::Y => self.y_min,
        }
    }

    /// Positive-end switch for an axis.
    #[inline]
    pub fn max(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x_max,
            Axis::Y => self.y_max,
        }
    }

    /// Whether driving `axis` in `direction` pushes further into a tripped switch.
    #[inline]
    pub fn blocks(&self, axis: Axis, direction: Direction) -> bool {
        match direction {
            Direction::Reverse => self.min(axis),
            Direction::Forward => self.max(axis),
            Direction::Stop => false,
        }
    }

    /// True if any switch is tripped.
    #[inline]
    pub fn any(&self) -> bool {
        self.x_min || self.x_max || self.y_min || self.y_max
    }
}

/// Applies [`LimitState`] to commands and live outputs.
pub struct SafetyMonitor;

impl SafetyMonitor {
    /// Veto a proposed command that drives into a tripped switch.
    ///
    /// Deterministic clamp: returns [`AxisCommand::STOP`] or `command` unchanged.
    #[inline]
    pub fn interlock(limits: &LimitState, axis: Axis, command: AxisCommand) -> AxisCommand {
        if limits.blocks(axis, command.direction) {
            AxisCommand::STOP
        } else {
            command
        }
    }

    /// Stop every axis whose current output direction points into a tripped switch.
    ///
    /// Relies on [`MotorOutput::direction`] reporting what was last written.
    /// Returns which axes were locked out, indexed by [`Axis::index`].
    pub fn enforce<M>(limits: &LimitState, motors: &mut M) -> Result<[bool; 2]>
    where
        M: MotorOutput + ?Sized,
    {
        let mut locked = [false; 2];

        for axis in Axis::ALL {
            let current = motors.direction(axis);
            if limits.blocks(axis, current) {
                tracing::debug!(axis = axis.name(), "limit switch lockout");
                motors.stop(axis)?;
                locked[axis.index()] = true;
            }
        }

        Ok(locked)
    }
}
