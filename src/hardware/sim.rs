//! In-memory ports. Each handle is cheap to clone; clones share state, so a
//! test keeps one clone to inject readings and inspect setpoints while the
//! subsystem owns the other. Setpoints are recorded, nothing moves on its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::constants::robotmap::{intakeshooter, swerve};
use crate::hardware::{
    AbsoluteEncoder, ControlMode, DigitalInput, Gyro, Hardware, ModuleHardware, MotorController,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default, Debug)]
struct MotorState {
    setpoint: Option<(ControlMode, f64)>,
    position: f64,
    velocity: f64,
    reseeds: u32,
}

#[derive(Clone, Debug)]
pub struct SimMotor {
    id: i32,
    state: Arc<Mutex<MotorState>>,
}

impl SimMotor {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            state: Default::default(),
        }
    }

    /// Last commanded mode and value, `None` after `stop`.
    pub fn setpoint(&self) -> Option<(ControlMode, f64)> {
        lock(&self.state).setpoint
    }

    pub fn position(&self) -> f64 {
        lock(&self.state).position
    }

    pub fn set_position(&self, position: f64) {
        lock(&self.state).position = position;
    }

    pub fn set_velocity(&self, velocity: f64) {
        lock(&self.state).velocity = velocity;
    }

    /// How many times the encoder position was re-seeded.
    pub fn reseeds(&self) -> u32 {
        lock(&self.state).reseeds
    }
}

impl MotorController for SimMotor {
    fn set(&mut self, mode: ControlMode, value: f64) {
        lock(&self.state).setpoint = Some((mode, value));
    }

    fn set_encoder_position(&mut self, position: f64) {
        let mut state = lock(&self.state);
        state.position = position;
        state.reseeds += 1;
    }

    fn get_position(&self) -> f64 {
        lock(&self.state).position
    }

    fn get_velocity(&self) -> f64 {
        lock(&self.state).velocity
    }

    fn stop(&mut self) {
        lock(&self.state).setpoint = None;
    }

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Clone, Debug, Default)]
pub struct SimEncoder {
    rotations: Arc<Mutex<f64>>,
}

impl SimEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rotations(&self, rotations: f64) {
        *lock(&self.rotations) = rotations;
    }

    pub fn set_degrees(&self, degrees: f64) {
        self.set_rotations(degrees / crate::constants::drivetrain::ROTATIONS_TO_DEGREES);
    }
}

impl AbsoluteEncoder for SimEncoder {
    fn get_absolute(&self) -> f64 {
        *lock(&self.rotations)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SimGyro {
    degrees: Arc<Mutex<f64>>,
}

impl SimGyro {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_angle(&self, degrees: f64) {
        *lock(&self.degrees) = degrees;
    }
}

impl Gyro for SimGyro {
    fn get_angle(&self) -> f64 {
        *lock(&self.degrees)
    }

    fn reset_angle(&mut self) {
        *lock(&self.degrees) = 0.;
    }
}

#[derive(Clone, Debug, Default)]
pub struct SimDigitalInput {
    value: Arc<AtomicBool>,
}

impl SimDigitalInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::SeqCst);
    }
}

impl DigitalInput for SimDigitalInput {
    fn get(&self) -> bool {
        self.value.load(Ordering::SeqCst)
    }
}

fn module(drive: i32, turn: i32) -> ModuleHardware {
    ModuleHardware {
        drive: Box::new(SimMotor::new(drive)),
        turn: Box::new(SimMotor::new(turn)),
        encoder: Box::new(SimEncoder::new()),
    }
}

/// A full robot's worth of sim ports, with the robotmap ids.
pub fn hardware() -> Hardware {
    Hardware {
        gyro: Box::new(SimGyro::new()),
        modules: [
            module(swerve::FR_DRIVE, swerve::FR_TURN),
            module(swerve::FL_DRIVE, swerve::FL_TURN),
            module(swerve::BL_DRIVE, swerve::BL_TURN),
            module(swerve::BR_DRIVE, swerve::BR_TURN),
        ],
        intake: Box::new(SimMotor::new(intakeshooter::INTAKE_LEFT)),
        shooter: Box::new(SimMotor::new(intakeshooter::SHOOTER_LEFT)),
        rotation: Box::new(SimMotor::new(intakeshooter::ROTATION)),
        beam_break_front: Box::new(SimDigitalInput::new()),
        beam_break_rear: Box::new(SimDigitalInput::new()),
    }
}
