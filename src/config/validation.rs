//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::pins::MAX_BCM_PIN;
use super::units::Speed;
use super::{GantryConfig, MotionConfig, PidConfig, PinAssignments, TimingConfig};

/// Validate a gantry configuration.
///
/// Checks:
/// - PID gains are finite and non-negative, integral clamp is positive
/// - Dead-band does not exceed the position tolerance
/// - Jog and calibration speeds are in (0, 100]
/// - Meters-per-count scale is positive
/// - Timing values are non-zero (back-off may be zero)
/// - Every GPIO line is unique and on the header
pub fn validate_config(config: &GantryConfig) -> Result<()> {
    validate_pid(&config.pid)?;
    validate_motion(&config.motion)?;
    validate_timing(&config.timing)?;
    validate_pins(&config.pins)?;
    Ok(())
}

fn validate_pid(pid: &PidConfig) -> Result<()> {
    for (name, value) in [("kp", pid.kp), ("ki", pid.ki), ("kd", pid.kd)] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::Config(ConfigError::InvalidGain { name, value }));
        }
    }

    if !pid.integral_limit.is_finite() || pid.integral_limit <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidIntegralLimit(
            pid.integral_limit,
        )));
    }

    // A dead-band wider than the tolerance parks the axis short of "reached"
    if pid.dead_band > pid.position_tolerance {
        return Err(Error::Config(ConfigError::InvalidTolerance {
            dead_band: pid.dead_band,
            tolerance: pid.position_tolerance,
        }));
    }

    Ok(())
}

fn validate_motion(motion: &MotionConfig) -> Result<()> {
    check_speed("manual_speed_x", motion.manual_speed_x)?;
    check_speed("manual_speed_y", motion.manual_speed_y)?;
    check_speed("calibration_speed", motion.calibration_speed)?;

    let scale = motion.meters_per_count.value();
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidScale(scale)));
    }

    Ok(())
}

fn check_speed(name: &'static str, speed: Speed) -> Result<()> {
    let value = speed.value();
    if !(value > 0.0 && value <= 100.0) {
        return Err(Error::Config(ConfigError::InvalidSpeed { name, value }));
    }
    Ok(())
}

fn validate_timing(timing: &TimingConfig) -> Result<()> {
    let required = [
        ("loop_period_ms", timing.loop_period_ms),
        ("calibration_poll_ms", timing.calibration_poll_ms),
        ("capture_dwell_ms", timing.capture_dwell_ms),
        ("shutdown_timeout_ms", timing.shutdown_timeout_ms),
    ];

    for (name, value) in required {
        if value == 0 {
            return Err(Error::Config(ConfigError::InvalidDuration(name)));
        }
    }

    Ok(())
}

fn validate_pins(pins: &PinAssignments) -> Result<()> {
    let mut seen: u32 = 0;

    for (_, pin) in pins.iter() {
        if pin > MAX_BCM_PIN {
            return Err(Error::Config(ConfigError::PinOutOfRange(pin)));
        }

        let bit = 1u32 << pin;
        if seen & bit != 0 {
            return Err(Error::Config(ConfigError::DuplicatePin(pin)));
        }
        seen |= bit;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::MetersPerCount;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&GantryConfig::default()).is_ok());
    }

    #[test]
    fn test_negative_gain() {
        let mut config = GantryConfig::default();
        config.pid.ki = -0.1;

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidGain { name: "ki", .. }))
        ));
    }

    #[test]
    fn test_nan_gain() {
        let mut config = GantryConfig::default();
        config.pid.kd = f32::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_dead_band_wider_than_tolerance() {
        let mut config = GantryConfig::default();
        config.pid.dead_band = 8;

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidTolerance { dead_band: 8, tolerance: 5 }))
        ));
    }

    #[test]
    fn test_speed_above_full_duty() {
        let mut config = GantryConfig::default();
        config.motion.calibration_speed = Speed(120.0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_scale() {
        let mut config = GantryConfig::default();
        config.motion.meters_per_count = MetersPerCount(0.0);
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidScale(_)))
        ));
    }

    #[test]
    fn test_zero_loop_period() {
        let mut config = GantryConfig::default();
        config.timing.loop_period_ms = 0;
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidDuration("loop_period_ms")))
        ));
    }

    #[test]
    fn test_zero_backoff_allowed() {
        let mut config = GantryConfig::default();
        config.timing.calibration_backoff_ms = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_duplicate_pin() {
        let mut config = GantryConfig::default();
        config.pins.trigger = config.pins.limits.x_min;
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::DuplicatePin(26)))
        ));
    }

    #[test]
    fn test_pin_out_of_range() {
        let mut config = GantryConfig::default();
        config.pins.buttons.emergency = 40;
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::PinOutOfRange(40)))
        ));
    }
}
