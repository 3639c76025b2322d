//! Phase-B sampling for platforms that deliver bare phase-A interrupts.

use embedded_hal::digital::InputPin;

use crate::control::Axis;
use crate::error::{InputError, Result};

use super::{EdgeEvent, PositionTracker};

/// One encoder's phase-B input bound to its axis.
pub struct EncoderChannel<B: InputPin> {
    axis: Axis,
    phase_b: B,
}

impl<B: InputPin> EncoderChannel<B> {
    /// Bind a phase-B pin to an axis.
    pub fn new(axis: Axis, phase_b: B) -> Self {
        Self { axis, phase_b }
    }

    /// Axis this channel counts.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Sample phase B into an event without applying it.
    pub fn sample(&mut self) -> Result<EdgeEvent> {
        let high = self.phase_b.is_high().map_err(|_| InputError::Encoder)?;
        Ok(EdgeEvent::new(self.axis, high))
    }

    /// Call from the phase-A edge interrupt: sample B and count.
    pub fn on_phase_a_edge(&mut self, tracker: &PositionTracker) -> Result<EdgeEvent> {
        let event = self.sample()?;
        tracker.apply(event);
        Ok(event)
    }

    /// Release the pin.
    pub fn release(self) -> B {
        self.phase_b
    }
}
