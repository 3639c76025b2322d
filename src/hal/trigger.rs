//! Imaging trigger output.

use embedded_hal::digital::OutputPin;

use crate::error::{MotorError, Result};

use super::ImagingTrigger;

/// Active-high trigger line.
pub struct PinTrigger<P: OutputPin> {
    pin: P,
    active: bool,
}

impl<P: OutputPin> PinTrigger<P> {
    /// Wrap the trigger pin.
    pub fn new(pin: P) -> Self {
        Self { pin, active: false }
    }

    /// Level last written.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Release the pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> ImagingTrigger for PinTrigger<P> {
    fn set(&mut self, active: bool) -> Result<()> {
        let written = if active {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        written.map_err(|_| MotorError::TriggerError)?;

        self.active = active;
        Ok(())
    }
}
