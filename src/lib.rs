pub mod config;
pub mod constants;
pub mod container;
pub mod error;
pub mod hardware;
pub mod math;
pub mod remote;
pub mod subsystems;
pub mod swerve;
pub mod telemetry;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::RobotConfig;
use crate::container::{control_drivetrain, DriveInput, DrivetrainControlState};
use crate::error::RobotError;
use crate::hardware::{Hardware, ModuleHardware};
use crate::subsystems::{Drivetrain, IntakeShooter};
use crate::swerve::SwerveModule;
use crate::telemetry::Telemetry;

/// Robots boot disabled and only drive once the driver station enables them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotMode {
    #[default]
    Disabled,
    Teleop,
}

impl FromStr for RobotMode {
    type Err = RobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disabled" => Ok(RobotMode::Disabled),
            "teleop" => Ok(RobotMode::Teleop),
            _ => Err(RobotError::InvalidMode(s.to_owned())),
        }
    }
}

impl Display for RobotMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RobotMode::Disabled => write!(f, "disabled"),
            RobotMode::Teleop => write!(f, "teleop"),
        }
    }
}

pub struct Robot {
    pub drivetrain: Drivetrain,
    pub intakeshooter: IntakeShooter,

    drivetrain_state: DrivetrainControlState,
    telemetry: Telemetry,
}

impl Robot {
    pub fn new(hardware: Hardware, config: &RobotConfig, telemetry: Telemetry) -> Self {
        let Hardware {
            gyro,
            modules,
            intake,
            shooter,
            rotation,
            beam_break_front,
            beam_break_rear,
        } = hardware;

        let mut offsets = config.module_offsets_degrees.iter();
        let modules = modules.map(|ModuleHardware { drive, turn, encoder }| {
            let offset = offsets.next().copied().unwrap_or_default();
            SwerveModule::new(drive, turn, encoder, offset, telemetry.clone())
        });

        Self {
            drivetrain: Drivetrain::new(gyro, modules, config, telemetry.clone()),
            intakeshooter: IntakeShooter::new(
                intake,
                shooter,
                rotation,
                beam_break_front,
                beam_break_rear,
                telemetry.clone(),
            ),
            drivetrain_state: Default::default(),
            telemetry,
        }
    }

    pub fn robot_init(&mut self) {
        info!("Robot init");
        self.telemetry.put_string("intakeshooter state", self.intakeshooter.state().to_string());
    }

    /// One enabled control tick. Every output is recomputed from the current
    /// inputs, so a failed tick is followed by a normal one.
    pub fn teleop_periodic(&mut self, input: &DriveInput) -> Result<(), RobotError> {
        control_drivetrain(&mut self.drivetrain, input, &mut self.drivetrain_state);
        self.intakeshooter.periodic();
        self.drivetrain.post_odo()
    }

    pub fn periodic(&mut self, mode: RobotMode, input: &DriveInput) -> Result<(), RobotError> {
        match mode {
            RobotMode::Teleop => self.teleop_periodic(input),
            RobotMode::Disabled => self.disabled_periodic(),
        }
    }

    pub fn disabled_periodic(&mut self) -> Result<(), RobotError> {
        self.drivetrain.stop();
        self.intakeshooter.stop();
        self.drivetrain.post_odo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystems::IntakeShooterState;

    #[test]
    fn teleop_tick_runs_both_subsystems() {
        let telemetry = Telemetry::new();
        let mut robot = Robot::new(hardware::sim::hardware(), &RobotConfig::default(), telemetry.clone());
        robot.robot_init();

        let handle = robot.intakeshooter.handle();
        handle.intake_activate();

        let input = DriveInput {
            fwd: 1.,
            ..Default::default()
        };
        robot.teleop_periodic(&input).unwrap();

        assert_eq!(robot.intakeshooter.state(), IntakeShooterState::Intaking);
        assert!(telemetry.get_number("odo_x").is_some());
        assert!(telemetry.get_number("fr target_angle").is_some());
        assert!(telemetry.get_number("Target Wheel Speed2").is_some());
    }

    #[test]
    fn disabled_mode_ignores_sticks() {
        let telemetry = Telemetry::new();
        let mut robot = Robot::new(hardware::sim::hardware(), &RobotConfig::default(), telemetry.clone());

        let input = DriveInput {
            fwd: 1.,
            ..Default::default()
        };
        robot.periodic(RobotMode::Disabled, &input).unwrap();
        assert!(telemetry.get_number("Target Wheel Speed2").is_none());
        assert!(telemetry.get_number("odo_x").is_some());

        robot.periodic(RobotMode::Teleop, &input).unwrap();
        assert!(telemetry.get_number("Target Wheel Speed2").is_some());
    }

    #[test]
    fn mode_parses_from_name() {
        assert_eq!("Teleop".parse::<RobotMode>().unwrap(), RobotMode::Teleop);
        assert_eq!("disabled".parse::<RobotMode>().unwrap(), RobotMode::Disabled);
        assert!(matches!("auto".parse::<RobotMode>(), Err(RobotError::InvalidMode(_))));
        assert_eq!(RobotMode::default(), RobotMode::Disabled);
    }

    #[test]
    fn bad_dashboard_field_fails_only_that_tick() {
        let config = RobotConfig {
            dashboard_fields: vec!["current_angle".to_owned(), "bogus".to_owned()],
            ..RobotConfig::default()
        };
        let mut robot = Robot::new(hardware::sim::hardware(), &config, Telemetry::new());

        assert!(robot.teleop_periodic(&DriveInput::default()).is_err());
        // Outputs were still written before the failing publish
        assert_eq!(robot.intakeshooter.state(), IntakeShooterState::Idle);
        assert!(robot.disabled_periodic().is_err());
    }
}
