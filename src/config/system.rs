//! Gantry configuration - root configuration structure.

use serde::Deserialize;

use super::motion::MotionConfig;
use super::pid::PidConfig;
use super::pins::PinAssignments;
use super::timing::TimingConfig;

/// Root configuration structure from TOML.
///
/// Every section is optional; an empty document yields the stock tuning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GantryConfig {
    /// Closed-loop tuning.
    pub pid: PidConfig,

    /// Open-loop speeds and unit scale.
    pub motion: MotionConfig,

    /// Loop cadence and sequencing delays.
    pub timing: TimingConfig,

    /// Board GPIO map.
    pub pins: PinAssignments,
}
