//! Manual jog and calibration motion settings.

use serde::Deserialize;

use super::units::{MetersPerCount, Speed};

/// Open-loop speeds and the count-to-meter scale.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Jog speed for left/right commands.
    pub manual_speed_x: Speed,

    /// Jog speed for up/down commands.
    pub manual_speed_y: Speed,

    /// Reduced speed used while seeking limit switches and backing off.
    pub calibration_speed: Speed,

    /// Encoder count to meter conversion.
    pub meters_per_count: MetersPerCount,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            manual_speed_x: Speed(50.0),
            manual_speed_y: Speed(50.0),
            calibration_speed: Speed(30.0),
            meters_per_count: MetersPerCount::default(),
        }
    }
}
