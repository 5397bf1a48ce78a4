use nalgebra::Vector2;
use uom::si::f64::Length;
use uom::si::length::meter;

use crate::constants::drivetrain::STOPPED_SPEED_METERS_PER_SECOND;
use crate::swerve::module::WheelState;

/// Inverse kinematics for a swerve chassis. Robot frame is x forward, y left,
/// rotation counterclockwise positive. Modules are ordered FR, FL, BL, BR.
pub struct Swerve {
    modules: Vec<Vector2<f64>>,
    last_angles: Vec<f64>,
}

impl Swerve {
    pub fn new(modules: Vec<Vector2<f64>>) -> Self {
        let last_angles = vec![0.; modules.len()];
        Self {
            modules,
            last_angles,
        }
    }

    pub fn rectangle(track_width: Length, wheelbase: Length) -> Self {
        let half_width = track_width.get::<meter>() / 2.;
        let half_length = wheelbase.get::<meter>() / 2.;

        Self::new(vec![
            Vector2::new(half_length, -half_width),
            Vector2::new(half_length, half_width),
            Vector2::new(-half_length, half_width),
            Vector2::new(-half_length, -half_width),
        ])
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// `translation` in meters per second, `rotation` in radians per second.
    /// Wheels that would stop keep their last heading instead of snapping to zero.
    pub fn calculate(&mut self, translation: Vector2<f64>, rotation: f64) -> Vec<WheelState> {
        self.modules
            .iter()
            .zip(self.last_angles.iter_mut())
            .map(|(position, last_angle)| {
                let velocity = translation + Vector2::new(-position.y, position.x) * rotation;
                let speed = velocity.norm();

                if speed < STOPPED_SPEED_METERS_PER_SECOND {
                    return WheelState::new(0., *last_angle);
                }

                let angle = velocity.y.atan2(velocity.x).to_degrees();
                *last_angle = angle;
                WheelState::new(speed, angle)
            })
            .collect()
    }

    /// Scales every wheel down together so none exceeds `max_speed`.
    pub fn desaturate(states: &mut [WheelState], max_speed: f64) {
        let fastest = states
            .iter()
            .map(|state| state.speed.abs())
            .fold(0., f64::max);

        if fastest > max_speed {
            let scale = max_speed / fastest;
            for state in states.iter_mut() {
                state.speed *= scale;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Swerve {
        Swerve::rectangle(Length::new::<meter>(1.), Length::new::<meter>(1.))
    }

    #[test]
    fn straight_ahead_points_every_wheel_forward() {
        let states = square().calculate(Vector2::new(2., 0.), 0.);
        assert_eq!(states.len(), 4);
        for state in states {
            assert!((state.speed - 2.).abs() < 1e-12);
            assert!(state.angle.abs() < 1e-12);
        }
    }

    #[test]
    fn strafe_left_points_wheels_left() {
        let states = square().calculate(Vector2::new(0., 1.), 0.);
        for state in states {
            assert!((state.angle - 90.).abs() < 1e-12);
        }
    }

    #[test]
    fn spin_in_place_is_tangent() {
        let states = square().calculate(Vector2::zeros(), 1.);
        let expected = [45., 135., -135., -45.];
        for (state, angle) in states.iter().zip(expected) {
            assert!((state.angle - angle).abs() < 1e-9, "{:?}", state);
            assert!((state.speed - 0.5f64.sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn stopping_keeps_last_heading() {
        let mut swerve = square();
        swerve.calculate(Vector2::new(0., 1.), 0.);
        let states = swerve.calculate(Vector2::zeros(), 0.);
        for state in states {
            assert_eq!(state.speed, 0.);
            assert!((state.angle - 90.).abs() < 1e-12);
        }
    }

    #[test]
    fn desaturate_scales_all_wheels() {
        let mut states = vec![WheelState::new(6., 0.), WheelState::new(-3., 0.)];
        Swerve::desaturate(&mut states, 3.);
        assert_eq!(states[0].speed, 3.);
        assert_eq!(states[1].speed, -1.5);

        let mut slow = vec![WheelState::new(1., 0.)];
        Swerve::desaturate(&mut slow, 3.);
        assert_eq!(slow[0].speed, 1.);
    }
}
