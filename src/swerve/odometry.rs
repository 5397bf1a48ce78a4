use std::ops::Sub;

use nalgebra::{Rotation2, Vector2};
use uom::si::{
    angle::radian,
    f64::Angle,
    length::meter,
};

use crate::swerve::module::ModulePosition;

impl From<ModulePosition> for Vector2<f64> {
    fn from(val: ModulePosition) -> Self {
        let angle = val.angle.get::<radian>();
        let distance = val.distance.get::<meter>();

        Rotation2::new(angle) * Vector2::x() * distance
    }
}

impl Sub for ModulePosition {
    type Output = Self;

    /// Distance delta, keeping the newer heading.
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            distance: self.distance - rhs.distance,
            angle: self.angle,
        }
    }
}

/// Dead-reckoned field position in meters.
#[derive(Default)]
pub struct Odometry {
    last_modules: Vec<ModulePosition>,
    pub position: Vector2<f64>,
}

impl Odometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `heading` is the robot's field heading, counterclockwise positive.
    /// The first call only records a baseline.
    pub fn calculate(&mut self, positions: Vec<ModulePosition>, heading: Angle) {
        if positions.len() != self.last_modules.len() || positions.is_empty() {
            self.last_modules = positions;
            return;
        }

        let delta: Vector2<f64> = positions
            .iter()
            .zip(self.last_modules.iter())
            .map(|(new, old)| {
                let mut module = *new - *old;
                module.angle += heading;
                Vector2::from(module)
            })
            .sum();

        self.position += delta / positions.len() as f64;
        self.last_modules = positions;
    }
}
