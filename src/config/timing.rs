//! Loop cadence and sequencing delays.

use core::time::Duration;

use serde::Deserialize;

/// All delays in milliseconds, as written in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Control loop period.
    pub loop_period_ms: u32,

    /// Limit-switch polling interval during calibration.
    pub calibration_poll_ms: u32,

    /// Per-axis drive time off the limit switches after zeroing.
    pub calibration_backoff_ms: u32,

    /// How long the imaging trigger is held.
    pub capture_dwell_ms: u32,

    /// Upper bound on joining the control loop at shutdown.
    pub shutdown_timeout_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            loop_period_ms: 10,
            calibration_poll_ms: 100,
            calibration_backoff_ms: 1000,
            capture_dwell_ms: 500,
            shutdown_timeout_ms: 1000,
        }
    }
}

impl TimingConfig {
    /// Control loop period.
    #[inline]
    pub fn loop_period(&self) -> Duration {
        Duration::from_millis(self.loop_period_ms as u64)
    }

    /// Calibration polling interval.
    #[inline]
    pub fn calibration_poll(&self) -> Duration {
        Duration::from_millis(self.calibration_poll_ms as u64)
    }

    /// Calibration back-off drive time.
    #[inline]
    pub fn calibration_backoff(&self) -> Duration {
        Duration::from_millis(self.calibration_backoff_ms as u64)
    }

    /// Imaging trigger dwell.
    #[inline]
    pub fn capture_dwell(&self) -> Duration {
        Duration::from_millis(self.capture_dwell_ms as u64)
    }

    /// Shutdown join timeout.
    #[inline]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms as u64)
    }
}
