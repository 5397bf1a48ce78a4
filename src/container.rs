use serde::{Deserialize, Serialize};
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;

use crate::constants::drivetrain::{CONTROLLER_CURVE, JOYSTICK_DEADZONE, SWERVE_TURN_KP};
use crate::math::{angle_modulus, deadzone, joystick_curve};
use crate::subsystems::{Drivetrain, SwerveControlStyle};

/// One frame of driver input. Sticks are in [-1, 1].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveInput {
    pub fwd: f64,
    pub str: f64,
    pub rot: f64,
    pub slow: bool,
    pub hold_heading: bool,
    pub x_stance: bool,
    pub reset_heading: bool,
    pub robot_oriented: bool,
}

#[derive(Default)]
pub struct DrivetrainControlState {
    /// Unwrapped gyro angle to hold while the rotation stick is released
    pub saved_angle: Option<Angle>,
}

/// Rotation command, in stick units, that turns `current` back toward `saved`
/// the short way round.
pub fn heading_hold(current: Angle, saved: Angle) -> f64 {
    let error = angle_modulus((current - saved).get::<degree>());
    let error = Angle::new::<degree>(error).get::<radian>();

    (-error * SWERVE_TURN_KP).clamp(-1., 1.)
}

pub fn control_drivetrain(
    drivetrain: &mut Drivetrain,
    input: &DriveInput,
    state: &mut DrivetrainControlState,
) {
    if input.reset_heading {
        drivetrain.reset_heading();
    }

    if input.x_stance {
        drivetrain.x_stance();
        return;
    }

    let joystick_range = JOYSTICK_DEADZONE..1.;
    let power = 0.0..1.;
    let fwd = joystick_curve(deadzone(input.fwd, &joystick_range, &power), CONTROLLER_CURVE);
    let str = joystick_curve(deadzone(input.str, &joystick_range, &power), CONTROLLER_CURVE);
    let rot = deadzone(input.rot, &joystick_range, &power);

    let hold_angle = rot == 0. && input.hold_heading;
    let saved_angle = &mut state.saved_angle;

    if !hold_angle {
        *saved_angle = Some(drivetrain.get_angle());
    }

    let rot = match (hold_angle, saved_angle.as_ref()) {
        (true, Some(saved)) => heading_hold(drivetrain.get_angle(), *saved),
        _ => rot,
    };

    let style = if input.robot_oriented {
        SwerveControlStyle::RobotOriented
    } else {
        SwerveControlStyle::FieldOriented
    };

    drivetrain.set_slow(input.slow);
    drivetrain.set_speeds(fwd, str, rot, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobotConfig;
    use crate::hardware::sim::{SimEncoder, SimGyro, SimMotor};
    use crate::hardware::ControlMode;
    use crate::swerve::SwerveModule;
    use crate::telemetry::Telemetry;

    fn drivetrain() -> (Drivetrain, SimGyro, Vec<SimMotor>, Vec<SimMotor>) {
        let gyro = SimGyro::new();
        let telemetry = Telemetry::new();
        let drives: Vec<SimMotor> = (1..=4).map(SimMotor::new).collect();
        let turns: Vec<SimMotor> = (5..=8).map(SimMotor::new).collect();

        let module = |i: usize| {
            SwerveModule::new(
                Box::new(drives[i].clone()),
                Box::new(turns[i].clone()),
                Box::new(SimEncoder::new()),
                0.,
                telemetry.clone(),
            )
        };
        let modules = [module(0), module(1), module(2), module(3)];
        let drivetrain = Drivetrain::new(
            Box::new(gyro.clone()),
            modules,
            &RobotConfig::default(),
            telemetry,
        );

        (drivetrain, gyro, drives, turns)
    }

    #[test]
    fn sticks_inside_deadzone_do_nothing() {
        let (mut drivetrain, _, drives, _) = drivetrain();
        let mut state = DrivetrainControlState::default();

        let input = DriveInput {
            fwd: 0.05,
            str: -0.05,
            rot: 0.02,
            ..Default::default()
        };
        control_drivetrain(&mut drivetrain, &input, &mut state);

        for drive in &drives {
            assert_eq!(drive.setpoint(), Some((ControlMode::Velocity, 0.)));
        }
    }

    #[test]
    fn full_stick_is_full_speed() {
        let (mut drivetrain, _, drives, _) = drivetrain();
        let mut state = DrivetrainControlState::default();

        let input = DriveInput {
            fwd: 1.,
            ..Default::default()
        };
        control_drivetrain(&mut drivetrain, &input, &mut state);

        let max = RobotConfig::default().max_speed_meters_per_second;
        for drive in &drives {
            match drive.setpoint() {
                Some((ControlMode::Velocity, speed)) => assert!((speed - max).abs() < 1e-9),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn holding_heading_turns_back_toward_saved_angle() {
        let (mut drivetrain, gyro, drives, _) = drivetrain();
        let mut state = DrivetrainControlState::default();

        control_drivetrain(&mut drivetrain, &DriveInput::default(), &mut state);
        let saved = state.saved_angle.unwrap();
        assert!(saved.get::<degree>().abs() < 1e-9);

        gyro.set_angle(10.);
        let input = DriveInput {
            hold_heading: true,
            ..Default::default()
        };
        control_drivetrain(&mut drivetrain, &input, &mut state);

        // Saved angle is kept, and the wheels spin to correct
        assert!(state.saved_angle.unwrap().get::<degree>().abs() < 1e-9);
        assert!(drives.iter().any(|drive| match drive.setpoint() {
            Some((ControlMode::Velocity, speed)) => speed.abs() > 0.,
            _ => false,
        }));
    }

    #[test]
    fn heading_hold_takes_the_short_way_across_the_seam() {
        let (mut drivetrain, gyro, _, _) = drivetrain();
        let mut state = DrivetrainControlState::default();

        gyro.set_angle(179.);
        control_drivetrain(&mut drivetrain, &DriveInput::default(), &mut state);
        assert!((state.saved_angle.unwrap().get::<degree>() - 179.).abs() < 1e-9);

        gyro.set_angle(181.);
        let rot = heading_hold(drivetrain.get_angle(), state.saved_angle.unwrap());
        assert!(rot < 0.);
        assert!(rot.abs() < 0.1);

        // Same 2 degree drift seen through a gyro that wraps
        let rot = heading_hold(Angle::new::<degree>(-179.), Angle::new::<degree>(179.));
        assert!(rot < 0.);
        assert!(rot.abs() < 0.1);
    }

    #[test]
    fn heading_hold_stays_in_stick_range() {
        let rot = heading_hold(Angle::new::<degree>(170.), Angle::new::<degree>(0.));
        assert_eq!(rot, -1.);
        let rot = heading_hold(Angle::new::<degree>(-170.), Angle::new::<degree>(0.));
        assert_eq!(rot, 1.);
        assert_eq!(heading_hold(Angle::new::<degree>(30.), Angle::new::<degree>(30.)), 0.);
    }

    #[test]
    fn robot_oriented_ignores_heading() {
        let (mut drivetrain, gyro, _, turns) = drivetrain();
        let mut state = DrivetrainControlState::default();
        gyro.set_angle(90.);

        let input = DriveInput {
            fwd: 1.,
            robot_oriented: true,
            ..Default::default()
        };
        control_drivetrain(&mut drivetrain, &input, &mut state);

        for turn in &turns {
            assert_eq!(turn.setpoint(), Some((ControlMode::Position, 0.)));
        }
    }

    #[test]
    fn x_stance_overrides_sticks() {
        let (mut drivetrain, _, _, turns) = drivetrain();
        let mut state = DrivetrainControlState::default();

        let input = DriveInput {
            fwd: 1.,
            x_stance: true,
            ..Default::default()
        };
        control_drivetrain(&mut drivetrain, &input, &mut state);

        assert_eq!(turns[0].setpoint(), Some((ControlMode::Position, -45.)));
        assert_eq!(turns[1].setpoint(), Some((ControlMode::Position, 45.)));
    }

    #[test]
    fn drive_input_parses_partial_json() {
        let input: DriveInput = serde_json::from_str(r#"{ "fwd": 0.5, "slow": true }"#).unwrap();
        assert_eq!(input.fwd, 0.5);
        assert!(input.slow);
        assert_eq!(input.rot, 0.);
    }
}
