//! Axis, direction and per-axis drive command.

use core::fmt;
use core::str::FromStr;

use crate::config::units::Speed;

/// One of the two independent motion axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Horizontal carriage.
    X,
    /// Vertical carriage.
    Y,
}

impl Axis {
    /// Both axes, X first.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Array index for per-axis storage.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// Lower-case axis name.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

/// Motor drive direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Toward the min limit switch (negative counts).
    Reverse,
    /// Bridge off.
    #[default]
    Stop,
    /// Toward the max limit switch (positive counts).
    Forward,
}

impl Direction {
    /// Get direction from the sign of a value; zero maps to `Stop`.
    #[inline]
    pub fn from_sign(value: i32) -> Self {
        match value {
            v if v > 0 => Direction::Forward,
            v if v < 0 => Direction::Reverse,
            _ => Direction::Stop,
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub const fn sign(self) -> i8 {
        match self {
            Direction::Reverse => -1,
            Direction::Stop => 0,
            Direction::Forward => 1,
        }
    }
}

/// Direction and speed for a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisCommand {
    /// Drive direction.
    pub direction: Direction,
    /// Drive duty.
    pub speed: Speed,
}

impl AxisCommand {
    /// Bridge off, zero duty.
    pub const STOP: AxisCommand = AxisCommand {
        direction: Direction::Stop,
        speed: Speed::ZERO,
    };

    /// Create a command.
    #[inline]
    pub const fn new(direction: Direction, speed: Speed) -> Self {
        Self { direction, speed }
    }

    /// True when this command would not move the motor.
    #[inline]
    pub fn is_stop(&self) -> bool {
        self.direction == Direction::Stop || self.speed.is_zero()
    }
}

/// Operator jog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ManualCommand {
    /// Y forward.
    Up,
    /// Y reverse.
    Down,
    /// X reverse.
    Left,
    /// X forward.
    Right,
    /// Both axes off.
    Stop,
}

impl ManualCommand {
    /// Axis and direction this command drives, `None` for [`ManualCommand::Stop`].
    pub const fn motion(self) -> Option<(Axis, Direction)> {
        match self {
            ManualCommand::Up => Some((Axis::Y, Direction::Forward)),
            ManualCommand::Down => Some((Axis::Y, Direction::Reverse)),
            ManualCommand::Left => Some((Axis::X, Direction::Reverse)),
            ManualCommand::Right => Some((Axis::X, Direction::Forward)),
            ManualCommand::Stop => None,
        }
    }
}

/// Unrecognized jog command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseManualCommandError;

impl fmt::Display for ParseManualCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected one of: up, down, left, right, stop")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseManualCommandError {}

impl FromStr for ManualCommand {
    type Err = ParseManualCommandError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let s = s.trim();
        let command = if s.eq_ignore_ascii_case("up") {
            ManualCommand::Up
        } else if s.eq_ignore_ascii_case("down") {
            ManualCommand::Down
        } else if s.eq_ignore_ascii_case("left") {
            ManualCommand::Left
        } else if s.eq_ignore_ascii_case("right") {
            ManualCommand::Right
        } else if s.eq_ignore_ascii_case("stop") {
            ManualCommand::Stop
        } else {
            return Err(ParseManualCommandError);
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sign_round_trip() {
        for dir in [Direction::Reverse, Direction::Stop, Direction::Forward] {
            assert_eq!(Direction::from_sign(dir.sign() as i32), dir);
        }
        assert_eq!(Direction::from_sign(-40), Direction::Reverse);
    }

    #[test]
    fn test_stop_command() {
        assert!(AxisCommand::STOP.is_stop());
        assert!(AxisCommand::new(Direction::Forward, Speed::ZERO).is_stop());
        assert!(!AxisCommand::new(Direction::Reverse, Speed(10.0)).is_stop());
    }

    #[test]
    fn test_manual_command_parse() {
        assert_eq!("up".parse(), Ok(ManualCommand::Up));
        assert_eq!(" LEFT ".parse(), Ok(ManualCommand::Left));
        assert_eq!("stop".parse(), Ok(ManualCommand::Stop));
        assert_eq!("sideways".parse::<ManualCommand>(), Err(ParseManualCommandError));
    }

    #[test]
    fn test_manual_command_motion() {
        assert_eq!(ManualCommand::Up.motion(), Some((Axis::Y, Direction::Forward)));
        assert_eq!(ManualCommand::Left.motion(), Some((Axis::X, Direction::Reverse)));
        assert_eq!(ManualCommand::Stop.motion(), None);
    }
}
