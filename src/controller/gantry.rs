//! The motion controller facade and its control loop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::config::units::{Meters, MetersPerSecond, Speed};
use crate::config::{validate_config, GantryConfig};
use crate::control::{
    Axis, AxisCommand, Direction, LimitState, ManualCommand, PidController, SafetyMonitor,
    SpeedEstimator,
};
use crate::encoder::{EdgeEventSource, PositionTracker};
use crate::error::{ControllerError, Result};
use crate::hal::{ButtonState, ImagingTrigger, LimitSwitchInput, MotorOutput};

use super::hardware::Hardware;
use super::mode::{CalibrationOutcome, MotionMode};
use super::shutdown::ShutdownToken;
use super::slots::SavedPositions;

/// Interval between liveness checks while waiting for the loop to exit.
const JOIN_POLL: Duration = Duration::from_millis(1);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Point-in-time view of the controller for status displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerStatus {
    /// Current mode.
    pub mode: MotionMode,
    /// Whether the control loop thread is alive.
    pub running: bool,
    /// Whether a zero has been established.
    pub calibrated: bool,
    /// Encoder counts.
    pub position: (i32, i32),
    /// PID setpoints.
    pub target: (i32, i32),
    /// Counts per second, as of the last tick.
    pub speed: (f32, f32),
    /// Switch states as of the last successful read.
    pub limits: LimitState,
}

/// State guarded by the controller's main lock.
struct Core<M, L> {
    motors: M,
    limits: L,
    pid: PidController,
    mode: MotionMode,
    slots: SavedPositions,
    speed: SpeedEstimator,
    calibrated: bool,
    last_limits: LimitState,
}

impl<M: MotorOutput, L: LimitSwitchInput> Core<M, L> {
    /// Switch to Automatic, holding the current position on every axis.
    fn enter_automatic(&mut self, position: (i32, i32), now: f64) {
        if self.mode != MotionMode::Automatic {
            self.pid.set_target_position(Some(position.0), Some(position.1));
            self.pid.restart(now);
            self.mode = MotionMode::Automatic;
            info!(x = position.0, y = position.1, "entering automatic mode");
        }
    }

    fn go_to(&mut self, x: Option<i32>, y: Option<i32>, position: (i32, i32), now: f64) {
        if self.mode == MotionMode::Calibrating {
            debug!("go_to_position ignored during calibration");
            return;
        }
        self.enter_automatic(position, now);
        self.pid.set_target_position(x, y);
        let (tx, ty) = self.pid.target();
        debug!(x = tx, y = ty, "target set");
    }

    fn stop_motors(&mut self) {
        if let Err(e) = self.motors.stop_all() {
            warn!(error = %e, "failed to stop motors");
        }
    }
}

struct Shared<M, L, T> {
    core: Mutex<Core<M, L>>,
    trigger: Mutex<T>,
    tracker: Arc<PositionTracker>,
    config: GantryConfig,
    epoch: Instant,
}

impl<M, L, T> Shared<M, L, T>
where
    M: MotorOutput,
    L: LimitSwitchInput,
    T: ImagingTrigger,
{
    /// Monotonic seconds since construction.
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn core(&self) -> MutexGuard<'_, Core<M, L>> {
        lock(&self.core)
    }

    /// One control-loop iteration.
    fn tick(&self) {
        let mut guard = self.core();
        let core = &mut *guard;
        // Sampled under the lock so a calibration reset cannot slip in between.
        let now = self.now();
        let position = self.tracker.get();

        let limits = match core.limits.read() {
            Ok(limits) => limits,
            Err(e) => {
                warn!(error = %e, "limit switch read failed; stopping motors");
                core.stop_motors();
                return;
            }
        };
        core.last_limits = limits;
        core.speed.update(position, now);

        if core.mode == MotionMode::Automatic {
            let commands = core.pid.update(position, now);
            for axis in Axis::ALL {
                let command = SafetyMonitor::interlock(&limits, axis, commands[axis.index()]);
                if let Err(e) = core.motors.apply(axis, command) {
                    warn!(axis = axis.name(), error = %e, "failed to apply PID output");
                }
            }
            if core.pid.is_target_reached(position) {
                trace!(x = position.0, y = position.1, "target reached");
                core.stop_motors();
            }
        }

        if let Err(e) = SafetyMonitor::enforce(&limits, &mut core.motors) {
            warn!(error = %e, "failed to enforce limit lockout");
        }
    }

    /// Fixed-cadence loop until the token is cancelled.
    fn run(&self, token: &ShutdownToken) {
        let period = self.config.timing.loop_period();
        info!(period_ms = period.as_millis() as u64, "control loop running");

        let mut deadline = Instant::now();
        loop {
            self.tick();

            deadline += period;
            let now = Instant::now();
            if deadline < now {
                trace!("control loop overran its period");
                deadline = now;
            }
            if token.wait(deadline - now) {
                break;
            }
        }

        info!("control loop exited");
    }
}

/// Two-axis gantry controller.
///
/// Owns the hardware, the shared position tracker and a background control
/// loop started by [`start`](Self::start). Every method takes `&self`, so the
/// controller can be shared between a UI thread, a button poller and a
/// calibration caller behind an [`Arc`].
///
/// # Example
///
/// ```rust,ignore
/// use gantry_motion::{GantryConfig, Hardware, MotionController};
///
/// let hardware = Hardware::new(motors, limits, trigger);
/// let controller = MotionController::new(GantryConfig::default(), hardware)?;
/// controller.attach_edge_source(&mut gpio_interrupts)?;
/// controller.start()?;
///
/// controller.calibrate()?;
/// controller.go_to_position(Some(1_000), Some(500));
/// ```
pub struct MotionController<M, L, T>
where
    M: MotorOutput + Send + 'static,
    L: LimitSwitchInput + Send + 'static,
    T: ImagingTrigger + Send + 'static,
{
    shared: Arc<Shared<M, L, T>>,
    token: Mutex<ShutdownToken>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<M, L, T> MotionController<M, L, T>
where
    M: MotorOutput + Send + 'static,
    L: LimitSwitchInput + Send + 'static,
    T: ImagingTrigger + Send + 'static,
{
    /// Create a controller with a fresh position tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: GantryConfig, hardware: Hardware<M, L, T>) -> Result<Self> {
        Self::with_tracker(config, hardware, Arc::new(PositionTracker::new()))
    }

    /// Create a controller around an existing tracker (already wired to an
    /// edge source, for instance).
    pub fn with_tracker(
        config: GantryConfig,
        hardware: Hardware<M, L, T>,
        tracker: Arc<PositionTracker>,
    ) -> Result<Self> {
        validate_config(&config)?;

        let Hardware {
            motors,
            limits,
            trigger,
        } = hardware;
        let position = tracker.get();

        let core = Core {
            motors,
            limits,
            pid: PidController::new(config.pid, 0.0),
            mode: MotionMode::Manual,
            slots: SavedPositions::new(),
            speed: SpeedEstimator::new(position, 0.0),
            calibrated: false,
            last_limits: LimitState::CLEAR,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                core: Mutex::new(core),
                trigger: Mutex::new(trigger),
                tracker,
                config,
                epoch: Instant::now(),
            }),
            token: Mutex::new(ShutdownToken::cancelled()),
            worker: Mutex::new(None),
        })
    }

    /// Start building a controller.
    pub fn builder() -> super::MotionControllerBuilder<M, L, T> {
        super::MotionControllerBuilder::new()
    }

    /// Route encoder edges from `source` into this controller's tracker.
    pub fn attach_edge_source<S>(&self, source: &mut S) -> Result<()>
    where
        S: EdgeEventSource + ?Sized,
    {
        self.shared.tracker.attach(source)
    }

    /// The configuration in effect.
    pub fn config(&self) -> &GantryConfig {
        &self.shared.config
    }

    /// Shared handle to the position tracker.
    pub fn tracker(&self) -> Arc<PositionTracker> {
        Arc::clone(&self.shared.tracker)
    }

    fn current_token(&self) -> ShutdownToken {
        lock(&self.token).clone()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Initialize the motors and launch the control loop thread.
    ///
    /// # Errors
    ///
    /// [`ControllerError::AlreadyRunning`] if the loop is already running,
    /// or the motor error if initialization fails.
    pub fn start(&self) -> Result<()> {
        let mut worker = lock(&self.worker);
        if worker.is_some() {
            return Err(ControllerError::AlreadyRunning.into());
        }

        {
            let now = self.shared.now();
            let position = self.shared.tracker.get();
            let mut core = self.shared.core();
            core.motors.initialize()?;
            core.mode = MotionMode::Manual;
            core.speed.rebase(position, now);
            core.pid.restart(now);
        }

        let token = ShutdownToken::new();
        *lock(&self.token) = token.clone();

        let shared = Arc::clone(&self.shared);
        let loop_token = token.clone();
        let spawned = thread::Builder::new()
            .name("gantry-control".into())
            .spawn(move || shared.run(&loop_token));

        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                info!("controller started");
                Ok(())
            }
            Err(e) => {
                token.cancel();
                warn!(error = %e, "failed to spawn control loop");
                Err(ControllerError::SpawnFailed.into())
            }
        }
    }

    /// Request shutdown, wait (bounded) for the loop to exit, and force both
    /// motors to zero whatever the join outcome.
    ///
    /// Calling `stop` on a stopped controller only re-stops the motors.
    pub fn stop(&self) -> Result<()> {
        self.current_token().cancel();
        let handle = lock(&self.worker).take();

        if let Some(handle) = handle {
            let timeout = self.shared.config.timing.shutdown_timeout();
            let deadline = Instant::now() + timeout;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(JOIN_POLL);
            }
            if handle.is_finished() {
                if handle.join().is_err() {
                    warn!("control loop panicked");
                }
            } else {
                warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "control loop did not exit in time; detaching"
                );
            }
        }

        let result = self.shared.core().motors.stop_all();
        info!("controller stopped");
        result
    }

    /// Whether the control loop thread is alive.
    pub fn is_running(&self) -> bool {
        lock(&self.worker)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // ------------------------------------------------------------------
    // Mode and targets
    // ------------------------------------------------------------------

    /// Select Manual (`true`) or Automatic (`false`). Ignored while calibrating.
    ///
    /// Entering Manual stops both motors. Entering Automatic holds the
    /// current position.
    pub fn set_mode(&self, manual: bool) -> Result<()> {
        let now = self.shared.now();
        let position = self.shared.tracker.get();
        let mut core = self.shared.core();

        match core.mode {
            MotionMode::Calibrating => {
                debug!(manual, "set_mode ignored during calibration");
                Ok(())
            }
            _ if manual => {
                if core.mode != MotionMode::Manual {
                    info!("entering manual mode");
                }
                core.mode = MotionMode::Manual;
                core.motors.stop_all()
            }
            _ => {
                core.enter_automatic(position, now);
                Ok(())
            }
        }
    }

    /// Drive to a target in Automatic mode. `None` keeps that axis's setpoint.
    ///
    /// Switches to Automatic if needed; ignored while calibrating.
    pub fn go_to_position(&self, x: Option<i32>, y: Option<i32>) {
        let now = self.shared.now();
        let position = self.shared.tracker.get();
        self.shared.core().go_to(x, y, position, now);
    }

    /// Drive to a saved slot (`1..=4`). Other slot numbers are ignored.
    pub fn go_to_saved_position(&self, slot: u8) {
        let now = self.shared.now();
        let position = self.shared.tracker.get();
        let mut core = self.shared.core();
        match core.slots.get(slot) {
            Some((x, y)) => core.go_to(Some(x), Some(y), position, now),
            None => debug!(slot, "no such saved position"),
        }
    }

    /// Save the current position to a slot (`1..=4`). Other slot numbers are ignored.
    pub fn save_current_position(&self, slot: u8) {
        let position = self.shared.tracker.get();
        if self.shared.core().slots.save(slot, position) {
            info!(slot, x = position.0, y = position.1, "position saved");
        } else {
            debug!(slot, "no such saved position");
        }
    }

    /// A saved slot, or `None` for an invalid slot number.
    pub fn saved_position(&self, slot: u8) -> Option<(i32, i32)> {
        self.shared.core().slots.get(slot)
    }

    // ------------------------------------------------------------------
    // Manual control
    // ------------------------------------------------------------------

    /// Jog one axis at its configured manual speed. Only honored in Manual
    /// mode; a limit in the commanded direction turns it into a stop.
    pub fn move_manual(&self, command: ManualCommand) -> Result<()> {
        let mut guard = self.shared.core();
        let core = &mut *guard;

        if core.mode != MotionMode::Manual {
            debug!(mode = core.mode.name(), "manual command ignored");
            return Ok(());
        }

        let Some((axis, direction)) = command.motion() else {
            return core.motors.stop_all();
        };

        let limits = match core.limits.read() {
            Ok(limits) => limits,
            Err(e) => {
                core.stop_motors();
                return Err(e);
            }
        };
        core.last_limits = limits;

        let motion = &self.shared.config.motion;
        let speed = match axis {
            Axis::X => motion.manual_speed_x,
            Axis::Y => motion.manual_speed_y,
        };
        let command = SafetyMonitor::interlock(&limits, axis, AxisCommand::new(direction, speed));
        trace!(axis = axis.name(), direction = ?command.direction, "manual command");
        core.motors.apply(axis, command)
    }

    /// Stop both motors immediately, in any mode.
    pub fn stop_movement(&self) -> Result<()> {
        self.shared.core().motors.stop_all()
    }

    /// React to a sampled jog panel: emergency stops everything, otherwise
    /// the highest-priority pressed direction is jogged.
    ///
    /// Releasing every button does not stop the motors.
    pub fn handle_buttons(&self, buttons: ButtonState) -> Result<()> {
        if buttons.is_emergency() {
            warn!("emergency stop pressed");
            return self.stop_movement();
        }
        match buttons.manual_command() {
            Some(command) => self.move_manual(command),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Calibration
    // ------------------------------------------------------------------

    /// Home both axes and establish the zero.
    ///
    /// Blocks the calling thread. Each axis is driven toward its min switch
    /// at calibration speed; once both are home the tracker is reset and the
    /// axes back off the switches. On success the controller holds the new
    /// position in Automatic mode.
    ///
    /// Returns [`CalibrationOutcome::Aborted`] promptly if [`stop`](Self::stop)
    /// is called (or the loop is not running). The motors are then stopped
    /// and the controller left in Manual mode, uncalibrated.
    pub fn calibrate(&self) -> Result<CalibrationOutcome> {
        let token = self.current_token();
        {
            let mut core = self.shared.core();
            if core.mode == MotionMode::Calibrating {
                debug!("calibration already in progress");
                return Ok(CalibrationOutcome::Busy);
            }
            core.mode = MotionMode::Calibrating;
            core.calibrated = false;
            core.stop_motors();
        }
        info!("calibration started");

        let outcome = self.run_calibration(&token);
        match outcome {
            Ok(CalibrationOutcome::Completed) => {
                info!("calibration complete");
            }
            Ok(_) | Err(_) => {
                let mut core = self.shared.core();
                core.stop_motors();
                core.mode = MotionMode::Manual;
                match &outcome {
                    Err(e) => warn!(error = %e, "calibration failed"),
                    Ok(_) => info!("calibration aborted"),
                }
            }
        }
        outcome
    }

    fn run_calibration(&self, token: &ShutdownToken) -> Result<CalibrationOutcome> {
        let timing = self.shared.config.timing;
        let speed = self.shared.config.motion.calibration_speed;

        // Seek each min switch in turn.
        for axis in Axis::ALL {
            if token.is_cancelled() {
                return Ok(CalibrationOutcome::Aborted);
            }
            debug!(axis = axis.name(), "seeking min limit");
            self.shared
                .core()
                .motors
                .apply(axis, AxisCommand::new(Direction::Reverse, speed))?;

            if !self.wait_for_min_limit(axis, token, timing.calibration_poll())? {
                return Ok(CalibrationOutcome::Aborted);
            }
            self.shared.core().motors.set_speed(axis, Speed::ZERO)?;
        }

        {
            let mut core = self.shared.core();
            self.shared.tracker.reset();
            core.speed.rebase((0, 0), self.shared.now());
        }
        debug!("zero established");

        // Back off the switches.
        for axis in Axis::ALL {
            self.shared
                .core()
                .motors
                .apply(axis, AxisCommand::new(Direction::Forward, speed))?;
            if token.wait(timing.calibration_backoff()) {
                return Ok(CalibrationOutcome::Aborted);
            }
        }

        let mut core = self.shared.core();
        let now = self.shared.now();
        let position = self.shared.tracker.get();
        core.motors.stop_all()?;
        core.calibrated = true;
        core.enter_automatic(position, now);
        Ok(CalibrationOutcome::Completed)
    }

    /// Poll until the axis's min switch trips. `false` if cancelled first.
    fn wait_for_min_limit(
        &self,
        axis: Axis,
        token: &ShutdownToken,
        poll: Duration,
    ) -> Result<bool> {
        loop {
            if token.is_cancelled() {
                return Ok(false);
            }
            let limits = {
                let mut core = self.shared.core();
                let limits = core.limits.read()?;
                core.last_limits = limits;
                limits
            };
            if limits.min(axis) {
                debug!(axis = axis.name(), "min limit reached");
                return Ok(true);
            }
            if token.wait(poll) {
                return Ok(false);
            }
        }
    }

    // ------------------------------------------------------------------
    // Imaging
    // ------------------------------------------------------------------

    /// Pulse the imaging trigger for the configured dwell. Blocks the caller.
    ///
    /// The trigger is released even if the dwell is interrupted by an error
    /// on assertion.
    pub fn capture_image(&self) -> Result<()> {
        let dwell = self.shared.config.timing.capture_dwell();
        let mut trigger = lock(&self.shared.trigger);

        let asserted = trigger.set(true);
        if asserted.is_ok() {
            debug!(dwell_ms = dwell.as_millis() as u64, "trigger asserted");
            thread::sleep(dwell);
        }
        let released = trigger.set(false);
        asserted.and(released)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Encoder counts `(x, y)`.
    pub fn position(&self) -> (i32, i32) {
        self.shared.tracker.get()
    }

    /// Position scaled to meters.
    pub fn position_meters(&self) -> (Meters, Meters) {
        let scale = self.shared.config.motion.meters_per_count;
        let (x, y) = self.position();
        (scale.position(x), scale.position(y))
    }

    /// Speed in counts per second, as of the last tick.
    pub fn speed(&self) -> (f32, f32) {
        self.shared.core().speed.speed()
    }

    /// Speed scaled to meters per second.
    pub fn speed_meters_per_second(&self) -> (MetersPerSecond, MetersPerSecond) {
        let scale = self.shared.config.motion.meters_per_count;
        let (x, y) = self.speed();
        (scale.speed(x), scale.speed(y))
    }

    /// Current mode.
    pub fn mode(&self) -> MotionMode {
        self.shared.core().mode
    }

    /// Whether operator jog commands are honored.
    pub fn is_manual_mode(&self) -> bool {
        self.mode() == MotionMode::Manual
    }

    /// Whether a zero has been established since the last calibration started.
    pub fn is_calibrated(&self) -> bool {
        self.shared.core().calibrated
    }

    /// PID setpoints.
    pub fn target(&self) -> (i32, i32) {
        self.shared.core().pid.target()
    }

    /// Switch states as of the last successful read.
    pub fn limit_state(&self) -> LimitState {
        self.shared.core().last_limits
    }

    /// Direction currently applied to an axis.
    pub fn direction(&self, axis: Axis) -> Direction {
        self.shared.core().motors.direction(axis)
    }

    /// Everything a status display needs, read under one lock.
    pub fn status(&self) -> ControllerStatus {
        let running = self.is_running();
        let position = self.shared.tracker.get();
        let core = self.shared.core();
        ControllerStatus {
            mode: core.mode,
            running,
            calibrated: core.calibrated,
            position,
            target: core.pid.target(),
            speed: core.speed.speed(),
            limits: core.last_limits,
        }
    }
}

impl<M, L, T> Drop for MotionController<M, L, T>
where
    M: MotorOutput + Send + 'static,
    L: LimitSwitchInput + Send + 'static,
    T: ImagingTrigger + Send + 'static,
{
    fn drop(&mut self) {
        if lock(&self.worker).is_some() {
            if let Err(e) = self.stop() {
                warn!(error = %e, "failed to stop motors on drop");
            }
        }
    }
}
