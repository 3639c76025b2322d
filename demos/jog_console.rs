//! Interactive console against a simulated gantry.
//!
//! A plant thread moves a virtual carriage according to the motor outputs,
//! fires encoder edges into the controller and trips the limit switches at
//! the ends of travel.
//!
//! ```text
//! cargo run --example jog_console
//! > cal
//! > right
//! > stop
//! > save 1
//! > goto 1200 300
//! > status
//! ```

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use gantry_motion::encoder::{EdgeEvent, EdgeEventSource, EdgeHandler};
use gantry_motion::{
    Axis, CalibrationOutcome, Direction, GantryConfig, Hardware, ImagingTrigger, LimitState,
    LimitSwitchInput, ManualCommand, MotionController, MotorOutput, Result, Speed,
};

/// Travel of the virtual carriage, in counts.
const TRAVEL: i32 = 4_000;

/// Counts moved per plant step at full duty.
const COUNTS_PER_STEP_AT_MAX: f32 = 10.0;

#[derive(Default)]
struct Plant {
    outputs: [(Direction, Speed); 2],
    carriage: [i32; 2],
    handlers: [Option<EdgeHandler>; 2],
}

type SharedPlant = Arc<Mutex<Plant>>;

struct SimMotors(SharedPlant);

impl MotorOutput for SimMotors {
    fn set_direction(&mut self, axis: Axis, direction: Direction) -> Result<()> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).outputs[axis.index()].0 = direction;
        Ok(())
    }

    fn set_speed(&mut self, axis: Axis, speed: Speed) -> Result<()> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).outputs[axis.index()].1 = speed;
        Ok(())
    }

    fn direction(&self, axis: Axis) -> Direction {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).outputs[axis.index()].0
    }
}

struct SimLimits(SharedPlant);

impl LimitSwitchInput for SimLimits {
    fn read(&mut self) -> Result<LimitState> {
        let plant = self.0.lock().unwrap_or_else(|e| e.into_inner());
        let [x, y] = plant.carriage;
        Ok(LimitState {
            x_min: x <= 0,
            x_max: x >= TRAVEL,
            y_min: y <= 0,
            y_max: y >= TRAVEL,
        })
    }
}

struct SimEdges(SharedPlant);

impl EdgeEventSource for SimEdges {
    fn register(&mut self, axis: Axis, handler: EdgeHandler) -> Result<()> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).handlers[axis.index()] = Some(handler);
        Ok(())
    }
}

struct ConsoleTrigger;

impl ImagingTrigger for ConsoleTrigger {
    fn set(&mut self, active: bool) -> Result<()> {
        println!("  [trigger {}]", if active { "on" } else { "off" });
        Ok(())
    }
}

/// Advance the carriage one step and emit the matching encoder edges.
fn step(plant: &SharedPlant) {
    let mut plant = plant.lock().unwrap_or_else(|e| e.into_inner());
    for axis in Axis::ALL {
        let i = axis.index();
        let (direction, speed) = plant.outputs[i];
        let counts = (speed.value() / 100.0 * COUNTS_PER_STEP_AT_MAX) as i32;
        let sign = direction.sign() as i32;
        if counts == 0 || sign == 0 {
            continue;
        }

        let before = plant.carriage[i];
        let after = (before + sign * counts).clamp(0, TRAVEL);
        plant.carriage[i] = after;

        if let Some(handler) = &plant.handlers[i] {
            for _ in 0..(after - before).abs() {
                handler(EdgeEvent::new(axis, sign > 0));
            }
        }
    }
}

fn print_help() {
    println!("commands: up | down | left | right | stop");
    println!("          goto <x> <y> | manual | auto | cal");
    println!("          save <n> | recall <n> | snap | status | quit");
}

fn main() -> Result<()> {
    let plant: SharedPlant = Arc::new(Mutex::new(Plant {
        carriage: [1_500, 900],
        ..Plant::default()
    }));

    let hardware = Hardware::new(
        SimMotors(Arc::clone(&plant)),
        SimLimits(Arc::clone(&plant)),
        ConsoleTrigger,
    );
    let controller = MotionController::new(GantryConfig::default(), hardware)?;
    controller.attach_edge_source(&mut SimEdges(Arc::clone(&plant)))?;
    controller.start()?;

    {
        let plant = Arc::clone(&plant);
        thread::spawn(move || loop {
            step(&plant);
            thread::sleep(Duration::from_millis(2));
        });
    }

    print_help();
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let number = |i: usize| words.get(i).and_then(|w| w.parse::<i32>().ok());

        match words.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["help"] => print_help(),
            ["manual"] => controller.set_mode(true)?,
            ["auto"] => controller.set_mode(false)?,
            ["goto", ..] => controller.go_to_position(number(1), number(2)),
            ["save", _] => match number(1).and_then(|n| u8::try_from(n).ok()) {
                Some(slot) => controller.save_current_position(slot),
                None => println!("  slot must be 1-4"),
            },
            ["recall", _] => match number(1).and_then(|n| u8::try_from(n).ok()) {
                Some(slot) => controller.go_to_saved_position(slot),
                None => println!("  slot must be 1-4"),
            },
            ["cal"] => match controller.calibrate()? {
                CalibrationOutcome::Completed => println!("  calibrated"),
                outcome => println!("  calibration {:?}", outcome),
            },
            ["snap"] => controller.capture_image()?,
            ["status"] => {
                let status = controller.status();
                let (x, y) = controller.position_meters();
                println!(
                    "  {} running={} calibrated={} pos={:?} ({:.3} m, {:.3} m) target={:?} limits={:?}",
                    status.mode,
                    status.running,
                    status.calibrated,
                    status.position,
                    x.value(),
                    y.value(),
                    status.target,
                    status.limits,
                );
            }
            [word] => match word.parse::<ManualCommand>() {
                Ok(command) => {
                    if !controller.is_manual_mode() {
                        println!("  not in manual mode");
                    }
                    controller.move_manual(command)?;
                }
                Err(e) => println!("  {}", e),
            },
            _ => println!("  unknown command (try `help`)"),
        }
    }

    controller.stop()
}
