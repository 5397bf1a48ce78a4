//! Actuator and sensor ports.
//!
//! Subsystems own their hardware through these traits so the control logic
//! runs the same against CAN devices on the robot and against [`sim`] on a
//! laptop. All calls are non-blocking register reads and writes.

pub mod sim;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ControlMode {
    /// Open loop duty cycle, [-1, 1]
    Percent,
    /// Closed loop velocity in the motor's configured mechanism units
    Velocity,
    /// Closed loop position in the motor's configured mechanism units
    Position,
}

/// A motor controller with an integrated encoder. Drive motors are configured
/// in meters, turn and rotation motors in degrees, intake rollers in turns.
pub trait MotorController {
    fn set(&mut self, mode: ControlMode, value: f64);

    /// Re-seeds the integrated encoder's accumulated position.
    fn set_encoder_position(&mut self, position: f64);

    fn get_position(&self) -> f64;

    fn get_velocity(&self) -> f64;

    fn stop(&mut self);

    fn id(&self) -> i32;
}

/// Absolute magnet encoder, reports rotations in [-0.5, 0.5).
pub trait AbsoluteEncoder {
    fn get_absolute(&self) -> f64;
}

/// Yaw in degrees, counterclockwise positive, unbounded.
pub trait Gyro {
    fn get_angle(&self) -> f64;
    fn reset_angle(&mut self);
}

/// Binary detector such as a beam-break. `true` means an object is present.
pub trait DigitalInput {
    fn get(&self) -> bool;
}

pub struct ModuleHardware {
    pub drive: Box<dyn MotorController>,
    pub turn: Box<dyn MotorController>,
    pub encoder: Box<dyn AbsoluteEncoder>,
}

/// Everything the robot owns, wired up once at startup.
pub struct Hardware {
    pub gyro: Box<dyn Gyro>,

    /// FR, FL, BL, BR
    pub modules: [ModuleHardware; 4],

    pub intake: Box<dyn MotorController>,
    pub shooter: Box<dyn MotorController>,
    pub rotation: Box<dyn MotorController>,

    pub beam_break_front: Box<dyn DigitalInput>,
    pub beam_break_rear: Box<dyn DigitalInput>,
}
