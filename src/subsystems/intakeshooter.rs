//! Intake and shooter, driven by a small state machine.
//!
//! The transition logic lives in [`step`], a pure function of the current
//! state and the beam-break readings. [`IntakeShooter`] applies its outputs to
//! the motors once per tick. Trigger calls may arrive from another thread
//! through an [`IntakeShooterHandle`]; the state and shoot target share one
//! atomic so a trigger always lands whole.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::constants::intakeshooter::*;
use crate::error::RobotError;
use crate::hardware::{ControlMode, DigitalInput, MotorController};
use crate::telemetry::Telemetry;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShootTarget {
    Speaker,
    Amp,
}

impl FromStr for ShootTarget {
    type Err = RobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "speaker" => Ok(ShootTarget::Speaker),
            "amp" => Ok(ShootTarget::Amp),
            _ => Err(RobotError::InvalidShootTarget(s.to_owned())),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntakeShooterState {
    Idle,
    Intaking,
    Holding,
    Spinup(ShootTarget),
    Fire(ShootTarget),
    Nothing,
}

impl IntakeShooterState {
    fn encode(self) -> u8 {
        match self {
            IntakeShooterState::Idle => 0,
            IntakeShooterState::Intaking => 1,
            IntakeShooterState::Holding => 2,
            IntakeShooterState::Spinup(ShootTarget::Speaker) => 3,
            IntakeShooterState::Spinup(ShootTarget::Amp) => 4,
            IntakeShooterState::Fire(ShootTarget::Speaker) => 5,
            IntakeShooterState::Fire(ShootTarget::Amp) => 6,
            IntakeShooterState::Nothing => 7,
        }
    }

    fn decode(raw: u8) -> Self {
        match raw {
            0 => IntakeShooterState::Idle,
            1 => IntakeShooterState::Intaking,
            2 => IntakeShooterState::Holding,
            3 => IntakeShooterState::Spinup(ShootTarget::Speaker),
            4 => IntakeShooterState::Spinup(ShootTarget::Amp),
            5 => IntakeShooterState::Fire(ShootTarget::Speaker),
            6 => IntakeShooterState::Fire(ShootTarget::Amp),
            _ => IntakeShooterState::Nothing,
        }
    }
}

impl Display for IntakeShooterState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IntakeShooterState::Idle => write!(f, "IDLE"),
            IntakeShooterState::Intaking => write!(f, "INTAKING"),
            IntakeShooterState::Holding => write!(f, "HOLDING"),
            IntakeShooterState::Spinup(ShootTarget::Speaker) => write!(f, "SPINUP SPEAKER"),
            IntakeShooterState::Spinup(ShootTarget::Amp) => write!(f, "SPINUP AMP"),
            IntakeShooterState::Fire(ShootTarget::Speaker) => write!(f, "FIRE SPEAKER"),
            IntakeShooterState::Fire(ShootTarget::Amp) => write!(f, "FIRE AMP"),
            IntakeShooterState::Nothing => write!(f, "NOTHING"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BeamBreaks {
    pub front: bool,
    pub rear: bool,
}

/// Setpoints for one tick. `None` leaves the actuator on its previous setpoint.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Outputs {
    /// Intake roller velocity, turns per second
    pub intake_velocity: Option<f64>,
    /// Pivot position, degrees
    pub rotation_degrees: Option<f64>,
    /// Flywheel duty cycle
    pub shooter_duty: Option<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Step {
    pub next: IntakeShooterState,
    pub outputs: Outputs,
}

pub fn step(state: IntakeShooterState, sensors: BeamBreaks) -> Step {
    match state {
        IntakeShooterState::Idle => Step {
            next: if sensors.front {
                IntakeShooterState::Holding
            } else {
                state
            },
            outputs: Outputs {
                intake_velocity: Some(IDLE_INTAKE_SPEED),
                rotation_degrees: Some(IDLE_ANGLE_DEGREES),
                shooter_duty: Some(IDLE_SHOOTER_DUTY),
            },
        },
        IntakeShooterState::Intaking => Step {
            next: if sensors.front {
                IntakeShooterState::Holding
            } else {
                state
            },
            outputs: Outputs {
                intake_velocity: Some(INTAKING_INTAKE_SPEED),
                rotation_degrees: Some(INTAKING_ANGLE_DEGREES),
                shooter_duty: None,
            },
        },
        IntakeShooterState::Holding => Step {
            next: state,
            outputs: Outputs {
                intake_velocity: Some(HOLDING_INTAKE_SPEED),
                rotation_degrees: Some(HOLDING_ANGLE_DEGREES),
                shooter_duty: None,
            },
        },
        IntakeShooterState::Spinup(target) => Step {
            next: state,
            outputs: Outputs {
                intake_velocity: None,
                rotation_degrees: Some(match target {
                    ShootTarget::Speaker => SPEAKER_ANGLE_DEGREES,
                    ShootTarget::Amp => AMP_ANGLE_DEGREES,
                }),
                shooter_duty: Some(SPINUP_SHOOTER_DUTY),
            },
        },
        IntakeShooterState::Fire(_) => Step {
            next: if sensors.rear {
                IntakeShooterState::Idle
            } else {
                state
            },
            outputs: Outputs {
                intake_velocity: Some(FIRE_INTAKE_SPEED),
                rotation_degrees: Some(FIRE_ANGLE_DEGREES),
                shooter_duty: None,
            },
        },
        IntakeShooterState::Nothing => Step {
            next: state,
            outputs: Outputs::default(),
        },
    }
}

/// Sequentially consistent home of the current state.
#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    fn new(state: IntakeShooterState) -> Self {
        Self(AtomicU8::new(state.encode()))
    }

    fn load(&self) -> IntakeShooterState {
        IntakeShooterState::decode(self.0.load(Ordering::SeqCst))
    }

    fn store(&self, state: IntakeShooterState) {
        self.0.store(state.encode(), Ordering::SeqCst);
    }

    /// Publishes `next` only if nothing was written since `seen` was loaded.
    fn advance(&self, seen: IntakeShooterState, next: IntakeShooterState) -> bool {
        self.0
            .compare_exchange(seen.encode(), next.encode(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// External trigger surface. Every call overwrites the state immediately.
#[derive(Clone, Debug)]
pub struct IntakeShooterHandle {
    state: Arc<StateCell>,
}

impl IntakeShooterHandle {
    pub fn state(&self) -> IntakeShooterState {
        self.state.load()
    }

    pub fn intake_activate(&self) {
        self.state.store(IntakeShooterState::Intaking);
    }

    pub fn spinup(&self, target: ShootTarget) {
        self.state.store(IntakeShooterState::Spinup(target));
    }

    pub fn fire_speaker(&self) {
        self.state.store(IntakeShooterState::Fire(ShootTarget::Speaker));
    }

    pub fn fire_amp(&self) {
        self.state.store(IntakeShooterState::Fire(ShootTarget::Amp));
    }

    pub fn fire(&self, target: ShootTarget) {
        match target {
            ShootTarget::Speaker => self.fire_speaker(),
            ShootTarget::Amp => self.fire_amp(),
        }
    }

    /// Pulls the intake in and keeps the note.
    pub fn retract(&self) {
        self.state.store(IntakeShooterState::Holding);
    }

    /// Stops commanding the mechanism until the next trigger.
    pub fn disable(&self) {
        self.state.store(IntakeShooterState::Nothing);
    }

    pub fn reset(&self) {
        self.state.store(IntakeShooterState::Idle);
    }
}

/// Counts consecutive `true` ticks and complains once when it looks stuck.
#[derive(Debug)]
struct StuckDetector {
    name: &'static str,
    ticks: u32,
    flagged: bool,
}

impl StuckDetector {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            ticks: 0,
            flagged: false,
        }
    }

    fn update(&mut self, value: bool, telemetry: &Telemetry) {
        if !value {
            if self.flagged {
                info!("{} released", self.name);
                telemetry.put_number(&format!("{} stuck", self.name), 0.);
            }
            self.ticks = 0;
            self.flagged = false;
            return;
        }

        self.ticks = self.ticks.saturating_add(1);
        if self.ticks > SENSOR_STUCK_TICKS && !self.flagged {
            warn!("{} has read true for {} ticks, sensor may be stuck", self.name, self.ticks);
            telemetry.put_number(&format!("{} stuck", self.name), 1.);
            self.flagged = true;
        }
    }
}

pub struct IntakeShooter {
    intake: Box<dyn MotorController>,
    shooter: Box<dyn MotorController>,
    rotation: Box<dyn MotorController>,

    beam_break_front: Box<dyn DigitalInput>,
    beam_break_rear: Box<dyn DigitalInput>,

    front_stuck: StuckDetector,
    rear_stuck: StuckDetector,

    state: Arc<StateCell>,
    telemetry: Telemetry,
}

impl IntakeShooter {
    pub fn new(
        intake: Box<dyn MotorController>,
        shooter: Box<dyn MotorController>,
        rotation: Box<dyn MotorController>,
        beam_break_front: Box<dyn DigitalInput>,
        beam_break_rear: Box<dyn DigitalInput>,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            intake,
            shooter,
            rotation,
            beam_break_front,
            beam_break_rear,
            front_stuck: StuckDetector::new("beam break front"),
            rear_stuck: StuckDetector::new("beam break rear"),
            state: Arc::new(StateCell::new(IntakeShooterState::Idle)),
            telemetry,
        }
    }

    pub fn handle(&self) -> IntakeShooterHandle {
        IntakeShooterHandle {
            state: Arc::clone(&self.state),
        }
    }

    pub fn state(&self) -> IntakeShooterState {
        self.state.load()
    }

    pub fn periodic(&mut self) {
        let sensors = BeamBreaks {
            front: self.beam_break_front.get(),
            rear: self.beam_break_rear.get(),
        };
        self.front_stuck.update(sensors.front, &self.telemetry);
        self.rear_stuck.update(sensors.rear, &self.telemetry);

        let current = self.state.load();
        let Step { next, outputs } = step(current, sensors);

        self.apply(outputs);

        // A trigger that landed during this tick wins over the auto-transition
        if next != current && self.state.advance(current, next) {
            info!("intakeshooter {} -> {}", current, next);
        }

        self.telemetry
            .put_string("intakeshooter state", self.state.load().to_string());
    }

    fn apply(&mut self, outputs: Outputs) {
        if let Some(velocity) = outputs.intake_velocity {
            self.intake.set(ControlMode::Velocity, velocity);
        }
        if let Some(degrees) = outputs.rotation_degrees {
            self.rotation.set(ControlMode::Position, degrees);
        }
        if let Some(duty) = outputs.shooter_duty {
            self.shooter.set(ControlMode::Percent, duty);
        }
    }

    pub fn stop(&mut self) {
        self.intake.stop();
        self.shooter.stop();
        self.rotation.stop();
    }
}
