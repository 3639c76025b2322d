//! Limit switch and button inputs over embedded-hal pins.
//!
//! All inputs are wired to ground with pull-ups, so a pressed switch reads low.

use embedded_hal::digital::InputPin;

use crate::control::{LimitState, ManualCommand};
use crate::error::{InputError, Result};

use super::{ButtonInput, LimitSwitchInput};

fn pressed<P: InputPin>(pin: &mut P, err: InputError) -> Result<bool> {
    pin.is_low().map_err(|_| err.into())
}

/// Four active-low end-of-travel switches.
pub struct PinLimitSwitches<P: InputPin> {
    x_min: P,
    x_max: P,
    y_min: P,
    y_max: P,
}

impl<P: InputPin> PinLimitSwitches<P> {
    /// Wrap the switch pins.
    pub fn new(x_min: P, x_max: P, y_min: P, y_max: P) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Release the pins in constructor order.
    pub fn release(self) -> [P; 4] {
        [self.x_min, self.x_max, self.y_min, self.y_max]
    }
}

impl<P: InputPin> LimitSwitchInput for PinLimitSwitches<P> {
    fn read(&mut self) -> Result<LimitState> {
        Ok(LimitState {
            x_min: pressed(&mut self.x_min, InputError::LimitSwitch)?,
            x_max: pressed(&mut self.x_max, InputError::LimitSwitch)?,
            y_min: pressed(&mut self.y_min, InputError::LimitSwitch)?,
            y_max: pressed(&mut self.y_max, InputError::LimitSwitch)?,
        })
    }
}

/// Snapshot of the operator panel (`true` = pressed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Jog Y forward.
    pub up: bool,
    /// Jog Y reverse.
    pub down: bool,
    /// Jog X reverse.
    pub left: bool,
    /// Jog X forward.
    pub right: bool,
    /// Emergency stop.
    pub emergency: bool,
}

impl ButtonState {
    /// Jog request from the direction buttons; first of up, down, left, right wins.
    ///
    /// Emergency is not a jog; check [`is_emergency`](Self::is_emergency) first.
    pub fn manual_command(&self) -> Option<ManualCommand> {
        if self.up {
            Some(ManualCommand::Up)
        } else if self.down {
            Some(ManualCommand::Down)
        } else if self.left {
            Some(ManualCommand::Left)
        } else if self.right {
            Some(ManualCommand::Right)
        } else {
            None
        }
    }

    /// Emergency button held.
    #[inline]
    pub fn is_emergency(&self) -> bool {
        self.emergency
    }
}

/// Five active-low panel buttons.
pub struct PinButtons<P: InputPin> {
    up: P,
    down: P,
    left: P,
    right: P,
    emergency: P,
}

impl<P: InputPin> PinButtons<P> {
    /// Wrap the button pins.
    pub fn new(up: P, down: P, left: P, right: P, emergency: P) -> Self {
        Self {
            up,
            down,
            left,
            right,
            emergency,
        }
    }

    /// Release the pins in constructor order.
    pub fn release(self) -> [P; 5] {
        [self.up, self.down, self.left, self.right, self.emergency]
    }
}

impl<P: InputPin> ButtonInput for PinButtons<P> {
    fn read(&mut self) -> Result<ButtonState> {
        Ok(ButtonState {
            up: pressed(&mut self.up, InputError::Button)?,
            down: pressed(&mut self.down, InputError::Button)?,
            left: pressed(&mut self.left, InputError::Button)?,
            right: pressed(&mut self.right, InputError::Button)?,
            emergency: pressed(&mut self.emergency, InputError::Button)?,
        })
    }
}
