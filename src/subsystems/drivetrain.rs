use nalgebra::{Rotation2, Vector2};
use uom::si::angle::{degree, radian};
use uom::si::f64::{Angle, Length};
use uom::si::length::inch;

use crate::config::RobotConfig;
use crate::error::RobotError;
use crate::hardware::Gyro;
use crate::math::angle_modulus;
use crate::swerve::{DataType, ModulePosition, Odometry, Swerve, SwerveModule, WheelState};
use crate::telemetry::Telemetry;

pub const MODULE_NAMES: [&str; 4] = ["fr", "fl", "bl", "br"];

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SwerveControlStyle {
    FieldOriented,
    RobotOriented,
}

pub struct Drivetrain {
    gyro: Box<dyn Gyro>,

    /// FR, FL, BL, BR
    modules: [SwerveModule; 4],

    kinematics: Swerve,
    pub odometry: Odometry,

    /// Gyro reading that counts as "downfield"
    pub offset: Angle,

    max_speed: f64,
    max_angular_speed: f64,
    slow_factor: f64,
    slow: bool,

    dashboard_fields: Vec<String>,
    telemetry: Telemetry,
}

impl Drivetrain {
    pub fn new(
        gyro: Box<dyn Gyro>,
        modules: [SwerveModule; 4],
        config: &RobotConfig,
        telemetry: Telemetry,
    ) -> Self {
        Self {
            gyro,
            modules,
            kinematics: Swerve::rectangle(
                Length::new::<inch>(config.track_width_inches),
                Length::new::<inch>(config.wheelbase_inches),
            ),
            odometry: Odometry::new(),
            offset: Angle::new::<degree>(0.),
            max_speed: config.max_speed_meters_per_second,
            max_angular_speed: config.max_angular_speed_radians_per_second,
            slow_factor: config.slow_factor,
            slow: false,
            dashboard_fields: config.dashboard_fields.clone(),
            telemetry,
        }
    }

    pub fn get_angle(&self) -> Angle {
        Angle::new::<degree>(self.gyro.get_angle())
    }

    /// Heading relative to the last `reset_heading`, wrapped to [-180, 180).
    pub fn get_offset(&self) -> Angle {
        let difference = (self.get_angle() - self.offset).get::<degree>();
        Angle::new::<degree>(angle_modulus(difference))
    }

    pub fn reset_heading(&mut self) {
        self.offset = self.get_angle();
    }

    pub fn reset_angle(&mut self) {
        self.gyro.reset_angle();
        self.offset = Angle::new::<degree>(0.);
    }

    pub fn set_slow(&mut self, slow: bool) {
        self.slow = slow;
    }

    /// Stick inputs in [-1, 1]: `fwd` away from the driver, `str` to the left,
    /// `rot` counterclockwise.
    pub fn set_speeds(&mut self, fwd: f64, str: f64, rot: f64, style: SwerveControlStyle) {
        let scale = if self.slow { self.slow_factor } else { 1. };

        let mut transform = Vector2::new(fwd, str) * self.max_speed * scale;
        if style == SwerveControlStyle::FieldOriented {
            transform = Rotation2::new(-self.get_offset().get::<radian>()) * transform;
        }
        let rotation = rot * self.max_angular_speed * scale;

        let mut wheel_speeds = self.kinematics.calculate(transform, rotation);
        Swerve::desaturate(&mut wheel_speeds, self.max_speed);

        self.update_odometry();

        for (module, state) in self.modules.iter_mut().zip(wheel_speeds) {
            module.set_desired_state(state);
        }
    }

    /// Points every wheel at the center so the robot resists being pushed.
    pub fn x_stance(&mut self) {
        self.update_odometry();

        let angle = crate::constants::drivetrain::X_STANCE_DEGREES;
        let angles = [-angle, angle, -angle, angle];
        for (module, angle) in self.modules.iter_mut().zip(angles) {
            module.set_desired_state(WheelState::new(0., angle));
        }
    }

    pub fn stop(&mut self) {
        for module in self.modules.iter_mut() {
            module.stop();
        }
    }

    pub fn get_positions(&self) -> Vec<ModulePosition> {
        self.modules.iter().map(SwerveModule::get_position).collect()
    }

    pub fn get_states(&self) -> Vec<WheelState> {
        self.modules.iter().map(SwerveModule::get_state).collect()
    }

    fn update_odometry(&mut self) {
        let positions = self.get_positions();
        let heading = self.get_offset();
        self.odometry.calculate(positions, heading);
    }

    pub fn dashboard_info(&self, index: usize, kind: &str) -> Result<f64, RobotError> {
        let module = self.modules.get(index).ok_or(RobotError::ModuleIndex(index))?;
        Ok(module.dashboard_info(kind.parse::<DataType>()?))
    }

    pub fn post_odo(&self) -> Result<(), RobotError> {
        self.telemetry.put_number("odo_x", self.odometry.position.x);
        self.telemetry.put_number("odo_y", self.odometry.position.y);
        self.telemetry
            .put_number("angle", self.get_offset().get::<radian>());

        for (index, name) in MODULE_NAMES.iter().enumerate() {
            for field in &self.dashboard_fields {
                let value = self.dashboard_info(index, field)?;
                self.telemetry.put_number(&format!("{name} {field}"), value);
            }
        }

        Ok(())
    }
}
