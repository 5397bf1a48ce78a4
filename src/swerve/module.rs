use std::str::FromStr;

use uom::si::angle::degree;
use uom::si::f64::{Angle, Length, Velocity};
use uom::si::length::meter;
use uom::si::velocity::meter_per_second;

use crate::constants::drivetrain::ROTATIONS_TO_DEGREES;
use crate::error::RobotError;
use crate::hardware::{AbsoluteEncoder, ControlMode, MotorController};
use crate::math::angle_modulus;
use crate::telemetry::Telemetry;

/// Speed in meters per second and heading in degrees. The heading is
/// continuous when commanded and wrapped when read back.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WheelState {
    pub speed: f64,
    pub angle: f64,
}

impl WheelState {
    pub fn new(speed: f64, angle: f64) -> Self {
        Self { speed, angle }
    }

    pub fn from_units(speed: Velocity, angle: Angle) -> Self {
        Self {
            speed: speed.get::<meter_per_second>(),
            angle: angle.get::<degree>(),
        }
    }

    pub fn velocity(&self) -> Velocity {
        Velocity::new::<meter_per_second>(self.speed)
    }

    pub fn angle(&self) -> Angle {
        Angle::new::<degree>(self.angle)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct ModulePosition {
    pub distance: Length,
    pub angle: Angle,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DataType {
    CurrentAngle,
    TargetAngle,
}

impl FromStr for DataType {
    type Err = RobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current_angle" => Ok(DataType::CurrentAngle),
            "target_angle" => Ok(DataType::TargetAngle),
            _ => Err(RobotError::InvalidDataType(s.to_owned())),
        }
    }
}

/// Picks the equivalent target that needs the least steering travel.
///
/// `current_angle` is the raw absolute reading. The returned angle is
/// `current_angle` plus the folded difference and is left unwrapped, since the
/// turn motor's position reference accumulates.
pub fn custom_optimize(desired: WheelState, current_angle: f64) -> WheelState {
    let modulus_angle = angle_modulus(current_angle);
    let mut speed = desired.speed;

    let mut difference = desired.angle - modulus_angle;

    if difference >= 270. {
        difference -= 360.;
    } else if difference <= -270. {
        difference += 360.;
    }

    if difference.abs() > 90. {
        speed = -desired.speed;
        if difference > 0. {
            difference -= 180.;
        } else {
            difference += 180.;
        }
    }

    WheelState {
        speed,
        angle: current_angle + difference,
    }
}

pub struct SwerveModule {
    drive: Box<dyn MotorController>,
    turn: Box<dyn MotorController>,
    encoder: Box<dyn AbsoluteEncoder>,

    /// Subtracted from the raw absolute reading so that zero points forward
    offset_degrees: f64,

    target_angle: f64,
    telemetry: Telemetry,
}

impl SwerveModule {
    pub fn new(
        drive: Box<dyn MotorController>,
        turn: Box<dyn MotorController>,
        encoder: Box<dyn AbsoluteEncoder>,
        offset_degrees: f64,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            drive,
            turn,
            encoder,
            offset_degrees,
            target_angle: 0.,
            telemetry,
        }
    }

    /// Absolute heading in degrees, as read; not wrapped beyond the sensor's own range.
    pub fn absolute_angle(&self) -> f64 {
        self.encoder.get_absolute() * ROTATIONS_TO_DEGREES - self.offset_degrees
    }

    pub fn set_desired_state(&mut self, desired: WheelState) -> WheelState {
        let current = self.absolute_angle();
        let state = custom_optimize(desired, current);

        self.target_angle = state.angle;

        self.drive.set(ControlMode::Velocity, state.speed);

        // Keep the integrated encoder in the same frame as the absolute one
        self.turn.set_encoder_position(current);
        self.turn.set(ControlMode::Position, state.angle);

        self.telemetry.put_number(
            &format!("Target Wheel Speed{}", self.turn.id()),
            state.speed,
        );

        state
    }

    pub fn get_position(&self) -> ModulePosition {
        ModulePosition {
            distance: Length::new::<meter>(self.drive.get_position()),
            angle: Angle::new::<degree>(angle_modulus(self.absolute_angle())),
        }
    }

    pub fn get_state(&self) -> WheelState {
        WheelState::new(self.drive.get_velocity(), angle_modulus(self.absolute_angle()))
    }

    pub fn dashboard_info(&self, kind: DataType) -> f64 {
        match kind {
            DataType::CurrentAngle => angle_modulus(self.absolute_angle()),
            DataType::TargetAngle => self.target_angle,
        }
    }

    pub fn stop(&mut self) {
        self.drive.stop();
        self.turn.stop();
    }
}
