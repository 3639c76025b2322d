//! Configuration module for gantry-motion.
//!
//! Provides types for loading and validating PID tuning, motion speeds, timing
//! and the GPIO map from TOML files (with `std` feature) or pre-built values.

mod motion;
mod pid;
pub mod pins;
mod system;
mod timing;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use motion::MotionConfig;
pub use pid::PidConfig;
pub use pins::PinAssignments;
pub use system::GantryConfig;
pub use timing::TimingConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Meters, MetersPerCount, MetersPerSecond, Speed};
