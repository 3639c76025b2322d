//! Shared fakes for controller-level tests.
//!
//! Every fake is a cheap clone around shared state so the test keeps a handle
//! after moving one into the controller.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use gantry_motion::config::{GantryConfig, TimingConfig};
use gantry_motion::encoder::{EdgeEvent, EdgeEventSource, EdgeHandler};
use gantry_motion::{
    Axis, Direction, Hardware, ImagingTrigger, LimitState, LimitSwitchInput, MotionController,
    MotorOutput, PositionTracker, Result, Speed,
};

/// A single write seen by [`FakeMotors`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Write {
    Direction(Axis, Direction),
    Speed(Axis, Speed),
}

/// A write plus the tracker position at the moment it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub write: Write,
    pub position: (i32, i32),
}

#[derive(Default)]
struct MotorState {
    direction: [Direction; 2],
    speed: [Speed; 2],
    log: Vec<Record>,
    tracker: Option<Arc<PositionTracker>>,
    homing: Option<FakeLimits>,
}

/// Motor outputs that remember every write.
#[derive(Clone, Default)]
pub struct FakeMotors {
    state: Arc<Mutex<MotorState>>,
}

impl FakeMotors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp each record with this tracker's position.
    pub fn with_tracker(self, tracker: Arc<PositionTracker>) -> Self {
        self.state.lock().unwrap().tracker = Some(tracker);
        self
    }

    /// Simulate a carriage that parks on its min switch whenever the axis is
    /// driven in reverse, and leaves it once driven forward.
    pub fn with_homing(self, limits: FakeLimits) -> Self {
        self.state.lock().unwrap().homing = Some(limits);
        self
    }

    pub fn direction_of(&self, axis: Axis) -> Direction {
        self.state.lock().unwrap().direction[axis.index()]
    }

    pub fn speed_of(&self, axis: Axis) -> Speed {
        self.state.lock().unwrap().speed[axis.index()]
    }

    pub fn log(&self) -> Vec<Record> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn log_len(&self) -> usize {
        self.state.lock().unwrap().log.len()
    }

    /// True if any write after `from` drove a motor (non-stop direction).
    pub fn drove_since(&self, from: usize) -> bool {
        self.log()[from..]
            .iter()
            .any(|r| matches!(r.write, Write::Direction(_, d) if d != Direction::Stop))
    }

    fn record(state: &mut MotorState, write: Write) {
        let position = state.tracker.as_ref().map_or((0, 0), |t| t.get());
        state.log.push(Record { write, position });
    }
}

impl MotorOutput for FakeMotors {
    fn set_direction(&mut self, axis: Axis, direction: Direction) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.direction[axis.index()] = direction;
        Self::record(&mut state, Write::Direction(axis, direction));

        if let Some(limits) = &state.homing {
            match direction {
                Direction::Reverse => limits.set_min(axis, true),
                Direction::Forward => limits.set_min(axis, false),
                Direction::Stop => {}
            }
        }
        Ok(())
    }

    fn set_speed(&mut self, axis: Axis, speed: Speed) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.speed[axis.index()] = speed;
        Self::record(&mut state, Write::Speed(axis, speed));
        Ok(())
    }

    fn direction(&self, axis: Axis) -> Direction {
        self.direction_of(axis)
    }
}

/// Limit switches whose state the test sets directly.
#[derive(Clone, Default)]
pub struct FakeLimits {
    state: Arc<Mutex<LimitState>>,
}

impl FakeLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, state: LimitState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn set_min(&self, axis: Axis, tripped: bool) {
        let mut state = self.state.lock().unwrap();
        match axis {
            Axis::X => state.x_min = tripped,
            Axis::Y => state.y_min = tripped,
        }
    }

    pub fn set_max(&self, axis: Axis, tripped: bool) {
        let mut state = self.state.lock().unwrap();
        match axis {
            Axis::X => state.x_max = tripped,
            Axis::Y => state.y_max = tripped,
        }
    }

    pub fn get(&self) -> LimitState {
        *self.state.lock().unwrap()
    }
}

impl LimitSwitchInput for FakeLimits {
    fn read(&mut self) -> Result<LimitState> {
        Ok(self.get())
    }
}

/// Trigger that logs each level with a timestamp.
#[derive(Clone, Default)]
pub struct FakeTrigger {
    events: Arc<Mutex<Vec<(bool, Instant)>>>,
}

impl FakeTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(bool, Instant)> {
        self.events.lock().unwrap().clone()
    }
}

impl ImagingTrigger for FakeTrigger {
    fn set(&mut self, active: bool) -> Result<()> {
        self.events.lock().unwrap().push((active, Instant::now()));
        Ok(())
    }
}

/// Edge source the test fires by hand.
#[derive(Default)]
pub struct ManualEdges {
    handlers: [Option<EdgeHandler>; 2],
}

impl ManualEdges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&self, axis: Axis, phase_b_high: bool) {
        if let Some(handler) = &self.handlers[axis.index()] {
            handler(EdgeEvent::new(axis, phase_b_high));
        }
    }

    pub fn fire_n(&self, axis: Axis, phase_b_high: bool, n: usize) {
        for _ in 0..n {
            self.fire(axis, phase_b_high);
        }
    }
}

impl EdgeEventSource for ManualEdges {
    fn register(&mut self, axis: Axis, handler: EdgeHandler) -> Result<()> {
        self.handlers[axis.index()] = Some(handler);
        Ok(())
    }
}

pub type TestController = MotionController<FakeMotors, FakeLimits, FakeTrigger>;

/// Everything a controller test needs to poke at.
pub struct Rig {
    pub controller: TestController,
    pub motors: FakeMotors,
    pub limits: FakeLimits,
    pub trigger: FakeTrigger,
    pub edges: ManualEdges,
    pub tracker: Arc<PositionTracker>,
}

/// Short timings so loop and calibration tests finish quickly.
pub fn fast_config() -> GantryConfig {
    GantryConfig {
        timing: TimingConfig {
            loop_period_ms: 2,
            calibration_poll_ms: 2,
            calibration_backoff_ms: 20,
            capture_dwell_ms: 30,
            shutdown_timeout_ms: 500,
        },
        ..GantryConfig::default()
    }
}

fn build(config: GantryConfig, homing: bool) -> Rig {
    let tracker = Arc::new(PositionTracker::new());
    let limits = FakeLimits::new();
    let mut motors = FakeMotors::new().with_tracker(Arc::clone(&tracker));
    if homing {
        motors = motors.with_homing(limits.clone());
    }
    let trigger = FakeTrigger::new();

    let hardware = Hardware::new(motors.clone(), limits.clone(), trigger.clone());
    let controller = MotionController::with_tracker(config, hardware, Arc::clone(&tracker))
        .expect("valid config");

    let mut edges = ManualEdges::new();
    controller
        .attach_edge_source(&mut edges)
        .expect("edge registration");

    Rig {
        controller,
        motors,
        limits,
        trigger,
        edges,
        tracker,
    }
}

/// Rig with inert limits.
pub fn rig() -> Rig {
    build(fast_config(), false)
}

/// Rig whose min switches follow the motors (see [`FakeMotors::with_homing`]).
pub fn homing_rig() -> Rig {
    build(fast_config(), true)
}

/// Poll `condition` until true or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}
