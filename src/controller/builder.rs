//! Builder pattern for MotionController.

use std::path::Path;
use std::sync::Arc;

use crate::config::{load_config, GantryConfig};
use crate::encoder::PositionTracker;
use crate::error::{ControllerError, Result};
use crate::hal::{ImagingTrigger, LimitSwitchInput, MotorOutput};

use super::gantry::MotionController;
use super::hardware::Hardware;

/// Builder for creating MotionController instances.
pub struct MotionControllerBuilder<M, L, T>
where
    M: MotorOutput + Send + 'static,
    L: LimitSwitchInput + Send + 'static,
    T: ImagingTrigger + Send + 'static,
{
    config: GantryConfig,
    motors: Option<M>,
    limits: Option<L>,
    trigger: Option<T>,
    tracker: Option<Arc<PositionTracker>>,
}

impl<M, L, T> Default for MotionControllerBuilder<M, L, T>
where
    M: MotorOutput + Send + 'static,
    L: LimitSwitchInput + Send + 'static,
    T: ImagingTrigger + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M, L, T> MotionControllerBuilder<M, L, T>
where
    M: MotorOutput + Send + 'static,
    L: LimitSwitchInput + Send + 'static,
    T: ImagingTrigger + Send + 'static,
{
    /// Create a new builder with the stock configuration.
    pub fn new() -> Self {
        Self {
            config: GantryConfig::default(),
            motors: None,
            limits: None,
            trigger: None,
            tracker: None,
        }
    }

    /// Use this configuration.
    pub fn config(mut self, config: GantryConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from a TOML file.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.config = load_config(path)?;
        Ok(self)
    }

    /// Set the motor outputs.
    pub fn motors(mut self, motors: M) -> Self {
        self.motors = Some(motors);
        self
    }

    /// Set the limit switch input.
    pub fn limit_switches(mut self, limits: L) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set the imaging trigger.
    pub fn trigger(mut self, trigger: T) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Set all three capabilities at once.
    pub fn hardware(self, hardware: Hardware<M, L, T>) -> Self {
        self.motors(hardware.motors)
            .limit_switches(hardware.limits)
            .trigger(hardware.trigger)
    }

    /// Share an existing position tracker instead of creating one.
    pub fn tracker(mut self, tracker: Arc<PositionTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Build the MotionController.
    ///
    /// # Errors
    ///
    /// Returns an error if a capability is missing or the configuration
    /// does not validate.
    pub fn build(self) -> Result<MotionController<M, L, T>> {
        let motors = self
            .motors
            .ok_or(ControllerError::MissingComponent("motors"))?;
        let limits = self
            .limits
            .ok_or(ControllerError::MissingComponent("limit_switches"))?;
        let trigger = self
            .trigger
            .ok_or(ControllerError::MissingComponent("trigger"))?;
        let tracker = self
            .tracker
            .unwrap_or_else(|| Arc::new(PositionTracker::new()));

        MotionController::with_tracker(
            self.config,
            Hardware::new(motors, limits, trigger),
            tracker,
        )
    }
}
