mod drivetrain;
mod intakeshooter;

pub use drivetrain::*;
pub use intakeshooter::*;
