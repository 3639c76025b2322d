//! # gantry-motion
//!
//! Closed-loop two-axis gantry control over embedded-hal 1.0 hardware.
//!
//! ## Features
//!
//! - **Encoder tracking**: Quadrature edges counted lock-free into absolute positions
//! - **PID positioning**: Per-axis PID with dead-band and anti-windup clamping
//! - **Limit lockout**: Motion toward a tripped end-of-travel switch is always refused
//! - **Manual jogging**: Operator commands at configured speeds
//! - **Calibration**: Homing to the min switches establishes the zero
//! - **Configuration-driven**: Tuning, timing and the pin map come from TOML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gantry_motion::{Hardware, HBridge, HBridgeMotors, MotionController, PinLimitSwitches, PinTrigger};
//!
//! let config = gantry_motion::load_config("gantry.toml")?;
//!
//! let motors = HBridgeMotors::new(
//!     HBridge::new(x_in1, x_in2, x_pwm),
//!     HBridge::new(y_in1, y_in2, y_pwm),
//! );
//! let limits = PinLimitSwitches::new(x_min, x_max, y_min, y_max);
//! let trigger = PinTrigger::new(trigger_pin);
//!
//! let controller = MotionController::new(config, Hardware::new(motors, limits, trigger))?;
//! controller.attach_edge_source(&mut encoder_interrupts)?;
//! controller.start()?;
//!
//! controller.calibrate()?;
//! controller.go_to_position(Some(1_200), Some(800));
//! controller.capture_image()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables the threaded controller, file I/O and TOML parsing
//! - `defmt`: Enables defmt formatting for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod config;
pub mod control;
pub mod encoder;
pub mod error;
pub mod hal;

#[cfg(feature = "std")]
pub mod controller;

// Re-exports for ergonomic API
pub use config::{validate_config, GantryConfig, MotionConfig, PidConfig, PinAssignments, TimingConfig};
pub use control::{Axis, AxisCommand, Direction, LimitState, ManualCommand, PidController, SafetyMonitor};
pub use encoder::{EdgeEvent, EncoderChannel, PositionTracker};
pub use error::{Error, Result};
pub use hal::{
    ButtonInput, ButtonState, HBridge, HBridgeMotors, ImagingTrigger, LimitSwitchInput,
    MotorOutput, PinButtons, PinLimitSwitches, PinTrigger,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

#[cfg(feature = "std")]
pub use controller::{
    CalibrationOutcome, ControllerStatus, Hardware, MotionController, MotionControllerBuilder,
    MotionMode,
};

#[cfg(feature = "std")]
pub use encoder::{EdgeEventSource, EdgeHandler};

// Unit types
pub use config::units::{Meters, MetersPerCount, MetersPerSecond, Speed};
