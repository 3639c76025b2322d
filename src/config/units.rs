//! Unit types for physical quantities.
//!
//! Keeps encoder counts, PWM duty and SI lengths apart at compile time.

use core::ops::Mul;

use serde::Deserialize;

/// Motor drive speed as a PWM duty percentage.
///
/// Always within `[0, 100]` when built through [`Speed::new`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Speed(pub f32);

impl Speed {
    /// Motor off.
    pub const ZERO: Speed = Speed(0.0);

    /// Full duty.
    pub const MAX: Speed = Speed(100.0);

    /// Create a speed, clamping into `[0, 100]`. NaN maps to zero.
    #[inline]
    pub fn new(percent: f32) -> Self {
        if percent.is_nan() {
            return Self::ZERO;
        }
        Self(percent.clamp(0.0, 100.0))
    }

    /// Get the raw percentage.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Whether the motor would be driven at all.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 <= 0.0
    }

    /// Scale to a PWM compare value for a timer with the given maximum.
    #[inline]
    pub fn to_duty(self, max_duty: u16) -> u16 {
        let clamped = Self::new(self.0);
        libm::roundf(max_duty as f32 * clamped.0 / 100.0) as u16
    }
}

/// Linear position in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Meters(pub f32);

impl Meters {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Linear speed in meters per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct MetersPerSecond(pub f32);

impl MetersPerSecond {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Encoder-count to meter conversion factor.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(transparent)]
pub struct MetersPerCount(pub f32);

impl Default for MetersPerCount {
    fn default() -> Self {
        // 1000 counts per meter
        Self(0.001)
    }
}

impl MetersPerCount {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Convert an encoder count to meters.
    #[inline]
    pub fn position(self, counts: i32) -> Meters {
        Meters(counts as f32 * self.0)
    }

    /// Convert a count rate to meters per second.
    #[inline]
    pub fn speed(self, counts_per_sec: f32) -> MetersPerSecond {
        MetersPerSecond(counts_per_sec * self.0)
    }
}

impl Mul<MetersPerCount> for i32 {
    type Output = Meters;

    fn mul(self, rhs: MetersPerCount) -> Self::Output {
        rhs.position(self)
    }
}
