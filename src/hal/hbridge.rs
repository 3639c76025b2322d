//! Dual H-bridge motor driver over embedded-hal pins.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::config::units::Speed;
use crate::control::{Axis, Direction};
use crate::error::{MotorError, Result};

use super::MotorOutput;

/// One bridge channel: two direction inputs and a PWM enable.
///
/// Generic over:
/// - `IN1`: bridge input driven high for forward
/// - `IN2`: bridge input driven high for reverse
/// - `PWM`: duty output (must implement `SetDutyCycle`)
pub struct HBridge<IN1, IN2, PWM>
where
    IN1: OutputPin,
    IN2: OutputPin,
    PWM: SetDutyCycle,
{
    in1: IN1,
    in2: IN2,
    pwm: PWM,
    /// Last direction written to the bridge inputs.
    direction: Direction,
    /// Last duty requested.
    speed: Speed,
}

impl<IN1, IN2, PWM> HBridge<IN1, IN2, PWM>
where
    IN1: OutputPin,
    IN2: OutputPin,
    PWM: SetDutyCycle,
{
    /// Wrap the pins. Nothing is written until the first command.
    pub fn new(in1: IN1, in2: IN2, pwm: PWM) -> Self {
        Self {
            in1,
            in2,
            pwm,
            direction: Direction::Stop,
            speed: Speed::ZERO,
        }
    }

    /// Direction last written.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Duty last written.
    #[inline]
    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Drive the bridge inputs. Both low is coast/stop.
    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let (in1_high, in2_high) = match direction {
            Direction::Forward => (true, false),
            Direction::Reverse => (false, true),
            Direction::Stop => (false, false),
        };

        // Lower the releasing side first so both inputs are never high together
        if in1_high {
            self.in2.set_low().map_err(|_| MotorError::PinError)?;
            self.in1.set_high().map_err(|_| MotorError::PinError)?;
        } else if in2_high {
            self.in1.set_low().map_err(|_| MotorError::PinError)?;
            self.in2.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.in1.set_low().map_err(|_| MotorError::PinError)?;
            self.in2.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.direction = direction;
        Ok(())
    }

    /// Write the PWM duty scaled to the timer's range.
    pub fn set_speed(&mut self, speed: Speed) -> Result<()> {
        let speed = Speed::new(speed.value());
        let duty = speed.to_duty(self.pwm.max_duty_cycle());
        self.pwm
            .set_duty_cycle(duty)
            .map_err(|_| MotorError::PinError)?;
        self.speed = speed;
        Ok(())
    }

    /// Release the pins.
    pub fn release(self) -> (IN1, IN2, PWM) {
        (self.in1, self.in2, self.pwm)
    }
}

/// X and Y bridges as one [`MotorOutput`].
pub struct HBridgeMotors<IN1, IN2, PWM>
where
    IN1: OutputPin,
    IN2: OutputPin,
    PWM: SetDutyCycle,
{
    x: HBridge<IN1, IN2, PWM>,
    y: HBridge<IN1, IN2, PWM>,
}

impl<IN1, IN2, PWM> HBridgeMotors<IN1, IN2, PWM>
where
    IN1: OutputPin,
    IN2: OutputPin,
    PWM: SetDutyCycle,
{
    /// Combine two bridge channels.
    pub fn new(x: HBridge<IN1, IN2, PWM>, y: HBridge<IN1, IN2, PWM>) -> Self {
        Self { x, y }
    }

    /// Access one channel.
    pub fn channel(&self, axis: Axis) -> &HBridge<IN1, IN2, PWM> {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn channel_mut(&mut self, axis: Axis) -> &mut HBridge<IN1, IN2, PWM> {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// Release both channels.
    pub fn release(self) -> (HBridge<IN1, IN2, PWM>, HBridge<IN1, IN2, PWM>) {
        (self.x, self.y)
    }
}

impl<IN1, IN2, PWM> MotorOutput for HBridgeMotors<IN1, IN2, PWM>
where
    IN1: OutputPin,
    IN2: OutputPin,
    PWM: SetDutyCycle,
{
    fn set_direction(&mut self, axis: Axis, direction: Direction) -> Result<()> {
        self.channel_mut(axis).set_direction(direction)
    }

    fn set_speed(&mut self, axis: Axis, speed: Speed) -> Result<()> {
        self.channel_mut(axis).set_speed(speed)
    }

    fn direction(&self, axis: Axis) -> Direction {
        self.channel(axis).direction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    /// Records the last duty written.
    struct FakePwm {
        max: u16,
        duty: u16,
    }

    impl embedded_hal::pwm::ErrorType for FakePwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for FakePwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> core::result::Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn test_forward_reverse_stop_levels() {
        let in1 = PinMock::new(&[
            // forward
            Transaction::set(State::High),
            // reverse
            Transaction::set(State::Low),
            // stop
            Transaction::set(State::Low),
        ]);
        let in2 = PinMock::new(&[
            Transaction::set(State::Low),
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ]);
        let mut bridge = HBridge::new(in1, in2, FakePwm { max: 1000, duty: 0 });

        bridge.set_direction(Direction::Forward).unwrap();
        assert_eq!(bridge.direction(), Direction::Forward);
        bridge.set_direction(Direction::Reverse).unwrap();
        assert_eq!(bridge.direction(), Direction::Reverse);
        bridge.set_direction(Direction::Stop).unwrap();
        assert_eq!(bridge.direction(), Direction::Stop);

        let (mut in1, mut in2, _) = bridge.release();
        in1.done();
        in2.done();
    }

    #[test]
    fn test_speed_scaled_to_timer() {
        let in1 = PinMock::new(&[]);
        let in2 = PinMock::new(&[]);
        let mut bridge = HBridge::new(in1, in2, FakePwm { max: 1000, duty: 0 });

        bridge.set_speed(Speed(30.0)).unwrap();
        assert_eq!(bridge.speed(), Speed(30.0));

        let (mut in1, mut in2, pwm) = bridge.release();
        assert_eq!(pwm.duty, 300);
        in1.done();
        in2.done();
    }

    #[test]
    fn test_motor_output_tracks_direction_per_axis() {
        let x = HBridge::new(
            PinMock::new(&[Transaction::set(State::High)]),
            PinMock::new(&[Transaction::set(State::Low)]),
            FakePwm { max: 100, duty: 0 },
        );
        let y = HBridge::new(PinMock::new(&[]), PinMock::new(&[]), FakePwm { max: 100, duty: 0 });
        let mut motors = HBridgeMotors::new(x, y);

        motors
            .apply(Axis::X, crate::control::AxisCommand::new(Direction::Forward, Speed(75.0)))
            .unwrap();

        assert_eq!(motors.direction(Axis::X), Direction::Forward);
        assert_eq!(motors.direction(Axis::Y), Direction::Stop);
        assert_eq!(motors.channel(Axis::X).speed(), Speed(75.0));

        let (x, y) = motors.release();
        let (mut x1, mut x2, x_pwm) = x.release();
        let (mut y1, mut y2, _) = y.release();
        assert_eq!(x_pwm.duty, 75);
        x1.done();
        x2.done();
        y1.done();
        y2.done();
    }
}
