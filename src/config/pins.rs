//! GPIO line assignments (BCM numbering).
//!
//! The crate never opens pins itself; the board bring-up code reads this map
//! to construct the embedded-hal pins handed to [`crate::hal`] drivers.

use heapless::Vec;
use serde::Deserialize;

/// Highest usable line on the 40-pin header.
pub const MAX_BCM_PIN: u8 = 27;

/// Total number of assigned signals.
pub const PIN_COUNT: usize = 20;

/// H-bridge lines for one motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MotorPins {
    /// PWM (enable) line.
    pub pwm: u8,
    /// Bridge input 1, high for forward.
    pub dir1: u8,
    /// Bridge input 2, high for reverse.
    pub dir2: u8,
}

/// Quadrature phase lines for one encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EncoderPins {
    /// Phase A, edges generate interrupts.
    pub a: u8,
    /// Phase B, sampled on each A edge.
    pub b: u8,
}

/// Limit switch lines (active low, pulled up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LimitPins {
    /// X axis negative end.
    pub x_min: u8,
    /// X axis positive end.
    pub x_max: u8,
    /// Y axis negative end.
    pub y_min: u8,
    /// Y axis positive end.
    pub y_max: u8,
}

/// Operator panel lines (active low, pulled up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ButtonPins {
    /// Jog Y forward.
    pub up: u8,
    /// Jog Y reverse.
    pub down: u8,
    /// Jog X reverse.
    pub left: u8,
    /// Jog X forward.
    pub right: u8,
    /// Emergency stop.
    pub emergency: u8,
}

/// Complete pin map for the gantry board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PinAssignments {
    /// X motor bridge.
    pub motor_x: MotorPins,
    /// Y motor bridge.
    pub motor_y: MotorPins,
    /// Imaging trigger output.
    pub trigger: u8,
    /// X encoder.
    pub encoder_x: EncoderPins,
    /// Y encoder.
    pub encoder_y: EncoderPins,
    /// Limit switches.
    pub limits: LimitPins,
    /// Operator buttons.
    pub buttons: ButtonPins,
}

impl Default for PinAssignments {
    fn default() -> Self {
        Self {
            motor_x: MotorPins { pwm: 17, dir1: 27, dir2: 22 },
            motor_y: MotorPins { pwm: 23, dir1: 24, dir2: 25 },
            trigger: 18,
            encoder_x: EncoderPins { a: 5, b: 6 },
            encoder_y: EncoderPins { a: 12, b: 13 },
            limits: LimitPins { x_min: 26, x_max: 19, y_min: 20, y_max: 21 },
            buttons: ButtonPins { up: 16, down: 1, left: 7, right: 8, emergency: 11 },
        }
    }
}

impl PinAssignments {
    /// Every assigned signal with its line number.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> {
        let entries: Vec<(&'static str, u8), PIN_COUNT> = Vec::from_slice(&[
            ("motor_x.pwm", self.motor_x.pwm),
            ("motor_x.dir1", self.motor_x.dir1),
            ("motor_x.dir2", self.motor_x.dir2),
            ("motor_y.pwm", self.motor_y.pwm),
            ("motor_y.dir1", self.motor_y.dir1),
            ("motor_y.dir2", self.motor_y.dir2),
            ("trigger", self.trigger),
            ("encoder_x.a", self.encoder_x.a),
            ("encoder_x.b", self.encoder_x.b),
            ("encoder_y.a", self.encoder_y.a),
            ("encoder_y.b", self.encoder_y.b),
            ("limits.x_min", self.limits.x_min),
            ("limits.x_max", self.limits.x_max),
            ("limits.y_min", self.limits.y_min),
            ("limits.y_max", self.limits.y_max),
            ("buttons.up", self.buttons.up),
            ("buttons.down", self.buttons.down),
            ("buttons.left", self.buttons.left),
            ("buttons.right", self.buttons.right),
            ("buttons.emergency", self.buttons.emergency),
        ])
        .unwrap_or_default();
        entries.into_iter()
    }

    /// Look up a signal's line by its dotted name.
    pub fn line(&self, signal: &str) -> Option<u8> {
        self.iter().find(|(name, _)| *name == signal).map(|(_, pin)| pin)
    }
}
