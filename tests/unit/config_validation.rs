//! Unit tests for configuration validation.

use gantry_motion::config::units::{MetersPerCount, Speed};
use gantry_motion::config::{validate_config, GantryConfig};
use gantry_motion::error::{ConfigError, Error};

/// Test validation of the stock configuration.
#[test]
fn test_default_config_passes_validation() {
    assert!(validate_config(&GantryConfig::default()).is_ok());
}

/// Negative or non-finite gains are rejected.
#[test]
fn test_invalid_gains() {
    let mut config = GantryConfig::default();
    config.pid.kd = f32::NAN;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidGain { name: "kd", .. }))
    ));

    config.pid.kd = 0.0;
    config.pid.kp = -0.1;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidGain { name: "kp", .. }))
    ));
}

/// Zero gains are allowed (a pure P or PD loop).
#[test]
fn test_zero_gains_allowed() {
    let mut config = GantryConfig::default();
    config.pid.ki = 0.0;
    config.pid.kd = 0.0;
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_integral_limit_must_be_positive() {
    let mut config = GantryConfig::default();
    config.pid.integral_limit = 0.0;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidIntegralLimit(_)))
    ));
}

/// The dead-band must not exceed the arrival tolerance.
#[test]
fn test_dead_band_within_tolerance() {
    let mut config = GantryConfig::default();
    config.pid.dead_band = 6;
    config.pid.position_tolerance = 5;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidTolerance { dead_band: 6, tolerance: 5 }))
    ));
}

/// Manual and calibration speeds must lie in (0, 100].
#[test]
fn test_speed_range() {
    let mut config = GantryConfig::default();
    config.motion.calibration_speed = Speed(0.0);
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSpeed { name: "calibration_speed", .. }))
    ));

    config.motion.calibration_speed = Speed(30.0);
    config.motion.manual_speed_y = Speed(120.0);
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSpeed { name: "manual_speed_y", .. }))
    ));
}

#[test]
fn test_scale_must_be_positive() {
    let mut config = GantryConfig::default();
    config.motion.meters_per_count = MetersPerCount(-0.001);
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidScale(_)))
    ));
}

/// Zero durations are rejected except for the calibration back-off.
#[test]
fn test_durations() {
    let mut config = GantryConfig::default();
    config.timing.calibration_backoff_ms = 0;
    assert!(validate_config(&config).is_ok());

    config.timing.shutdown_timeout_ms = 0;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidDuration("shutdown_timeout_ms")))
    ));
}

/// Each GPIO line may be used once and must exist on the header.
#[test]
fn test_pin_map() {
    let mut config = GantryConfig::default();
    config.pins.buttons.emergency = config.pins.limits.x_min;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::DuplicatePin(26)))
    ));

    let mut config = GantryConfig::default();
    config.pins.encoder_y.b = 28;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::PinOutOfRange(28)))
    ));
}
