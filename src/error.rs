//! Error types for gantry-motion.
//!
//! Provides unified error handling across configuration, hardware capabilities,
//! and the motion controller.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all gantry-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor output error
    Motor(MotorError),
    /// Limit switch, button or encoder input error
    Input(InputError),
    /// Motion controller lifecycle error
    Controller(ControllerError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// PID gain is negative or not finite
    InvalidGain {
        /// Gain name (kp, ki, kd)
        name: &'static str,
        /// Offending value
        value: f32,
    },
    /// Integral clamp must be > 0
    InvalidIntegralLimit(f32),
    /// Speed setting must be in (0, 100]
    InvalidSpeed {
        /// Setting name
        name: &'static str,
        /// Offending value
        value: f32,
    },
    /// Meters-per-count scale must be > 0
    InvalidScale(f32),
    /// Dead-band must not exceed the position tolerance
    InvalidTolerance {
        /// Configured dead-band
        dead_band: u32,
        /// Configured position tolerance
        tolerance: u32,
    },
    /// Duration setting must be > 0
    InvalidDuration(&'static str),
    /// Same GPIO line assigned to two signals
    DuplicatePin(u8),
    /// GPIO line outside the BCM header range (0-27)
    PinOutOfRange(u8),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor output errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Direction or PWM pin operation failed
    PinError,
    /// Imaging trigger pin operation failed
    TriggerError,
}

/// Input errors.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// Limit switch pin read failed
    LimitSwitch,
    /// Button pin read failed
    Button,
    /// Encoder phase pin read failed
    Encoder,
}

/// Motion controller errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// `start()` called while the control loop is running
    AlreadyRunning,
    /// Builder is missing a required component
    MissingComponent(&'static str),
    /// Control loop thread could not be spawned
    SpawnFailed,
    /// Edge event source refused a handler registration
    EdgeRegistration,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Input(e) => write!(f, "Input error: {}", e),
            Error::Controller(e) => write!(f, "Controller error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidGain { name, value } => {
                write!(f, "Invalid gain {}: {}. Must be finite and >= 0", name, value)
            }
            ConfigError::InvalidIntegralLimit(v) => {
                write!(f, "Invalid integral limit: {}. Must be > 0", v)
            }
            ConfigError::InvalidSpeed { name, value } => {
                write!(f, "Invalid speed {}: {}. Must be in (0, 100]", name, value)
            }
            ConfigError::InvalidScale(v) => write!(f, "Invalid meters per count: {}. Must be > 0", v),
            ConfigError::InvalidTolerance { dead_band, tolerance } => write!(
                f,
                "Invalid tolerance: dead band ({}) must not exceed position tolerance ({})",
                dead_band, tolerance
            ),
            ConfigError::InvalidDuration(name) => write!(f, "Invalid duration: {} must be > 0", name),
            ConfigError::DuplicatePin(pin) => write!(f, "GPIO {} assigned more than once", pin),
            ConfigError::PinOutOfRange(pin) => write!(f, "GPIO {} out of range. Valid: 0-27", pin),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "Motor GPIO/PWM operation failed"),
            MotorError::TriggerError => write!(f, "Imaging trigger GPIO operation failed"),
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::LimitSwitch => write!(f, "Limit switch read failed"),
            InputError::Button => write!(f, "Button read failed"),
            InputError::Encoder => write!(f, "Encoder phase read failed"),
        }
    }
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::AlreadyRunning => write!(f, "Control loop already running"),
            ControllerError::MissingComponent(name) => write!(f, "{} is required", name),
            ControllerError::SpawnFailed => write!(f, "Failed to spawn control loop thread"),
            ControllerError::EdgeRegistration => write!(f, "Edge event handler registration failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<InputError> for Error {
    fn from(e: InputError) -> Self {
        Error::Input(e)
    }
}

impl From<ControllerError> for Error {
    fn from(e: ControllerError) -> Self {
        Error::Controller(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for InputError {}

#[cfg(feature = "std")]
impl std::error::Error for ControllerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err: Error = ConfigError::InvalidSpeed {
            name: "manual_speed_x",
            value: 150.0,
        }
        .into();
        let msg = format!("{}", err);
        assert!(msg.starts_with("Configuration error"));
        assert!(msg.contains("manual_speed_x"));
        assert!(msg.contains("150"));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Error::from(MotorError::PinError), Error::Motor(MotorError::PinError));
        assert_eq!(
            Error::from(ControllerError::AlreadyRunning),
            Error::Controller(ControllerError::AlreadyRunning)
        );
    }
}
