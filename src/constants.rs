pub const LOOP_PERIOD_MS: u64 = 20;
pub const TELEMETRY_PORT: u16 = 5807;
pub const CONFIG_PATH: &str = "/home/lvuser/robot_config.json";

pub mod robotmap {
    pub mod swerve {
        pub const FR_DRIVE: i32 = 1;
        pub const FR_TURN: i32 = 2;
        pub const FR_ENCODER: i32 = 9;

        pub const FL_DRIVE: i32 = 3;
        pub const FL_TURN: i32 = 4;
        pub const FL_ENCODER: i32 = 10;

        pub const BL_DRIVE: i32 = 5;
        pub const BL_TURN: i32 = 6;
        pub const BL_ENCODER: i32 = 11;

        pub const BR_DRIVE: i32 = 7;
        pub const BR_TURN: i32 = 8;
        pub const BR_ENCODER: i32 = 12;

        pub const GYRO: i32 = 13;
    }

    pub mod intakeshooter {
        pub const INTAKE_LEFT: i32 = 14;
        pub const INTAKE_RIGHT: i32 = 15; // follows left, inverted
        pub const SHOOTER_LEFT: i32 = 16;
        pub const SHOOTER_RIGHT: i32 = 17; // follows left, inverted
        pub const ROTATION: i32 = 18;
        pub const BEAMBREAK_CANIFIER: i32 = 19;
    }
}

pub mod drivetrain {
    /// CANcoder absolute readings are in rotations
    pub const ROTATIONS_TO_DEGREES: f64 = 360.;

    pub const TRACK_WIDTH_INCHES: f64 = 22.5;
    pub const WHEELBASE_INCHES: f64 = 22.5;

    pub const MAX_SPEED_METERS_PER_SECOND: f64 = 4.6;
    pub const MAX_ANGULAR_SPEED_RADIANS_PER_SECOND: f64 = 2. * std::f64::consts::PI;
    pub const SLOW_FACTOR: f64 = 0.3;

    // Below this a wheel is treated as stopped and keeps its heading
    pub const STOPPED_SPEED_METERS_PER_SECOND: f64 = 1e-3;

    // Heading hold, per radian of error
    pub const SWERVE_TURN_KP: f64 = 0.6;

    pub const CONTROLLER_CURVE: f64 = 2.;
    pub const JOYSTICK_DEADZONE: f64 = 0.08;

    pub const X_STANCE_DEGREES: f64 = 45.;
}

pub mod intakeshooter {
    // Intake velocities are in turns per second
    pub const IDLE_INTAKE_SPEED: f64 = 2.5;
    pub const INTAKING_INTAKE_SPEED: f64 = 7.5;
    pub const HOLDING_INTAKE_SPEED: f64 = 0.;
    pub const FIRE_INTAKE_SPEED: f64 = 1.;

    pub const IDLE_ANGLE_DEGREES: f64 = 0.;
    pub const INTAKING_ANGLE_DEGREES: f64 = 30.;
    pub const HOLDING_ANGLE_DEGREES: f64 = 15.;
    pub const SPEAKER_ANGLE_DEGREES: f64 = 40.;
    pub const AMP_ANGLE_DEGREES: f64 = 30.;
    pub const FIRE_ANGLE_DEGREES: f64 = 30.;

    pub const IDLE_SHOOTER_DUTY: f64 = 0.25;
    pub const SPINUP_SHOOTER_DUTY: f64 = 1.;

    /// 5 seconds at 50 Hz
    pub const SENSOR_STUCK_TICKS: u32 = 250;
}
