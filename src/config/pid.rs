//! PID tuning configuration.

use serde::Deserialize;

/// Closed-loop gains and position policy, shared by both axes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    /// Proportional gain.
    pub kp: f32,

    /// Integral gain.
    pub ki: f32,

    /// Derivative gain.
    pub kd: f32,

    /// Errors strictly below this many counts produce no drive.
    pub dead_band: u32,

    /// Symmetric clamp on the integral accumulator (anti-windup).
    pub integral_limit: f32,

    /// Both axes within this many counts means the target is reached.
    pub position_tolerance: u32,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 0.5,
            ki: 0.05,
            kd: 40.0,
            dead_band: 2,
            integral_limit: 100.0,
            position_tolerance: 5,
        }
    }
}

impl PidConfig {
    /// Same policy with different gains.
    pub fn with_gains(self, kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd, ..self }
    }
}
