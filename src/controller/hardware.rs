//! The gantry's hardware capabilities, bundled once at bring-up.

use crate::hal::{ImagingTrigger, LimitSwitchInput, MotorOutput};

/// Everything the controller drives or samples, owned in one place.
///
/// Built once by board code and moved into the controller, so no pin map or
/// driver lives in process-wide state.
pub struct Hardware<M, L, T>
where
    M: MotorOutput,
    L: LimitSwitchInput,
    T: ImagingTrigger,
{
    /// Both motor bridges.
    pub motors: M,
    /// End-of-travel switches.
    pub limits: L,
    /// Imaging trigger line.
    pub trigger: T,
}

impl<M, L, T> Hardware<M, L, T>
where
    M: MotorOutput,
    L: LimitSwitchInput,
    T: ImagingTrigger,
{
    /// Bundle the capabilities.
    pub fn new(motors: M, limits: L, trigger: T) -> Self {
        Self {
            motors,
            limits,
            trigger,
        }
    }
}
