//! Per-axis PID position controller.
//!
//! Maps (setpoint, encoder count) to an [`AxisCommand`]. Errors inside the
//! dead-band yield a stop rather than a PID output, the integral is clamped
//! for anti-windup, and a non-positive `dt` drops the derivative term for that
//! call only.

use crate::config::units::Speed;
use crate::config::PidConfig;

use super::command::{Axis, AxisCommand, Direction};

/// Internal state of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidState {
    /// Target position in counts.
    pub setpoint: i32,
    /// Error seen on the previous update.
    pub prev_error: i32,
    /// Integral accumulator, clamped to the configured limit.
    pub integral: f32,
    /// Clock reading (seconds) of the previous update.
    pub last_update: f64,
}

impl PidState {
    fn new(now: f64) -> Self {
        Self {
            setpoint: 0,
            prev_error: 0,
            integral: 0.0,
            last_update: now,
        }
    }

    /// Zero every field and re-stamp the update time.
    #[inline]
    pub fn reset(&mut self, now: f64) {
        *self = Self::new(now);
    }
}

/// Two independent PID loops sharing one set of gains.
///
/// Time is supplied by the caller as monotonic seconds, so the law itself
/// stays free of any clock dependency.
#[derive(Debug, Clone)]
pub struct PidController {
    config: PidConfig,
    axes: [PidState; 2],
}

impl Default for PidController {
    fn default() -> Self {
        Self::new(PidConfig::default(), 0.0)
    }
}

impl PidController {
    /// Create a controller with both setpoints at zero.
    pub fn new(config: PidConfig, now: f64) -> Self {
        Self {
            config,
            axes: [PidState::new(now); 2],
        }
    }

    /// Gains and policy in use.
    #[inline]
    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// State of one axis.
    #[inline]
    pub fn state(&self, axis: Axis) -> &PidState {
        &self.axes[axis.index()]
    }

    /// Reset both axes, setpoints included.
    pub fn reset(&mut self, now: f64) {
        for state in self.axes.iter_mut() {
            state.reset(now);
        }
    }

    /// Clear integral, error history and timestamps, keeping the setpoints.
    pub fn restart(&mut self, now: f64) {
        for state in self.axes.iter_mut() {
            let setpoint = state.setpoint;
            state.reset(now);
            state.setpoint = setpoint;
        }
    }

    /// Update either or both setpoints; `None` leaves that axis untouched.
    pub fn set_target_position(&mut self, x: Option<i32>, y: Option<i32>) {
        if let Some(x) = x {
            self.axes[Axis::X.index()].setpoint = x;
        }
        if let Some(y) = y {
            self.axes[Axis::Y.index()].setpoint = y;
        }
    }

    /// Current setpoints.
    #[inline]
    pub fn target(&self) -> (i32, i32) {
        (self.axes[0].setpoint, self.axes[1].setpoint)
    }

    /// Compute the drive command for one axis at clock reading `now`.
    pub fn compute_pid(&mut self, axis: Axis, position: i32, now: f64) -> AxisCommand {
        let PidConfig {
            kp,
            ki,
            kd,
            dead_band,
            integral_limit,
            ..
        } = self.config;

        let state = &mut self.axes[axis.index()];
        let error = state.setpoint.saturating_sub(position);
        let dt = (now - state.last_update) as f32;
        state.last_update = now;

        if error.unsigned_abs() < dead_band {
            state.prev_error = error;
            return AxisCommand::STOP;
        }

        if dt > 0.0 {
            state.integral += error as f32 * dt;
        }
        state.integral = state.integral.clamp(-integral_limit, integral_limit);

        let derivative = if dt > 0.0 {
            (error as f32 - state.prev_error as f32) / dt
        } else {
            0.0
        };
        state.prev_error = error;

        let output = kp * error as f32 + ki * state.integral + kd * derivative;

        let direction = if output > 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        let speed = Speed::new(output.abs());

        tracing::trace!(
            axis = axis.name(),
            error,
            integral = state.integral,
            derivative,
            output,
            "pid update"
        );

        AxisCommand::new(direction, speed)
    }

    /// Compute commands for both axes from one position snapshot.
    pub fn update(&mut self, position: (i32, i32), now: f64) -> [AxisCommand; 2] {
        [
            self.compute_pid(Axis::X, position.0, now),
            self.compute_pid(Axis::Y, position.1, now),
        ]
    }

    /// True only when both axes are within `tolerance` counts of their setpoints.
    pub fn is_position_reached(&self, position: (i32, i32), tolerance: u32) -> bool {
        let within = |state: &PidState, pos: i32| {
            state.setpoint.saturating_sub(pos).unsigned_abs() <= tolerance
        };
        within(&self.axes[0], position.0) && within(&self.axes[1], position.1)
    }

    /// [`is_position_reached`](Self::is_position_reached) with the configured tolerance.
    #[inline]
    pub fn is_target_reached(&self, position: (i32, i32)) -> bool {
        self.is_position_reached(position, self.config.position_tolerance)
    }
}
