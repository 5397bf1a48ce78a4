pub mod kinematics;
pub mod module;
pub mod odometry;

pub use kinematics::Swerve;
pub use module::{custom_optimize, DataType, ModulePosition, SwerveModule, WheelState};
pub use odometry::Odometry;
