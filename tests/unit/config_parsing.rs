//! Unit tests for configuration parsing.

use std::io::Write;

use gantry_motion::config::units::Speed;
use gantry_motion::config::{load_config, parse_config, GantryConfig};
use gantry_motion::error::{ConfigError, Error};

const FULL_CONFIG: &str = r#"
[pid]
kp = 0.8
ki = 0.02
kd = 25.0
dead_band = 3
integral_limit = 250.0
position_tolerance = 6

[motion]
manual_speed_x = 60.0
manual_speed_y = 45.0
calibration_speed = 20.0
meters_per_count = 0.0005

[timing]
loop_period_ms = 5
calibration_poll_ms = 50
calibration_backoff_ms = 1500
capture_dwell_ms = 250
shutdown_timeout_ms = 2000

[pins]
trigger = 4
"#;

/// An empty document yields the stock tuning.
#[test]
fn test_empty_document_is_default() {
    let config = parse_config("").expect("empty config");
    assert_eq!(config, GantryConfig::default());

    assert_eq!(config.pid.kp, 0.5);
    assert_eq!(config.pid.ki, 0.05);
    assert_eq!(config.pid.kd, 40.0);
    assert_eq!(config.pid.dead_band, 2);
    assert_eq!(config.pid.integral_limit, 100.0);
    assert_eq!(config.motion.manual_speed_x, Speed(50.0));
    assert_eq!(config.motion.calibration_speed, Speed(30.0));
    assert_eq!(config.timing.loop_period_ms, 10);
    assert_eq!(config.timing.capture_dwell_ms, 500);
    assert_eq!(config.pins.trigger, 18);
}

/// Every section overrides its defaults.
#[test]
fn test_full_document() {
    let config = parse_config(FULL_CONFIG).expect("full config");

    assert_eq!(config.pid.kp, 0.8);
    assert_eq!(config.pid.dead_band, 3);
    assert_eq!(config.pid.position_tolerance, 6);
    assert_eq!(config.motion.manual_speed_y, Speed(45.0));
    assert_eq!(config.motion.meters_per_count.value(), 0.0005);
    assert_eq!(config.timing.calibration_backoff().as_millis(), 1500);
    assert_eq!(config.pins.trigger, 4);
    // Untouched pins keep their defaults.
    assert_eq!(config.pins.motor_x.pwm, 17);
}

/// Partial sections fill the rest from defaults.
#[test]
fn test_partial_section() {
    let config = parse_config("[pid]\nkp = 1.5\n").expect("partial config");
    assert_eq!(config.pid.kp, 1.5);
    assert_eq!(config.pid.kd, 40.0);
    assert_eq!(config.motion, GantryConfig::default().motion);
}

/// Type mismatches surface as parse errors.
#[test]
fn test_wrong_type_is_parse_error() {
    let result = parse_config("[timing]\nloop_period_ms = \"fast\"\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Parsed documents are validated before being returned.
#[test]
fn test_parse_runs_validation() {
    let result = parse_config("[pins]\ntrigger = 17\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::DuplicatePin(17)))));
}

/// Files load through the same path as strings.
#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("gantry-motion-{}.toml", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).expect("create temp file");
        file.write_all(FULL_CONFIG.as_bytes()).expect("write temp file");
    }

    let config = load_config(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.expect("load config").pid.kp, 0.8);
}

#[test]
fn test_missing_file_is_io_error() {
    let result = load_config("/nonexistent/gantry.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}
