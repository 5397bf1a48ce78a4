use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum RobotError {
    /// Dashboard asked for a module value kind that does not exist
    InvalidDataType(String),

    /// Drivetrain has four modules, 0..=3
    ModuleIndex(usize),

    /// Unknown shoot target name from the remote surface
    InvalidShootTarget(String),

    /// Unknown robot mode name from the remote surface
    InvalidMode(String),

    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for RobotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RobotError::InvalidDataType(kind) => {
                write!(f, "invalid dashboard info data type: {kind}")
            }
            RobotError::ModuleIndex(index) => write!(f, "no swerve module at index {index}"),
            RobotError::InvalidShootTarget(target) => write!(f, "unknown shoot target: {target}"),
            RobotError::InvalidMode(mode) => write!(f, "unknown robot mode: {mode}"),
            RobotError::Io(err) => write!(f, "io error: {err}"),
            RobotError::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for RobotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RobotError::Io(err) => Some(err),
            RobotError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RobotError {
    fn from(err: std::io::Error) -> Self {
        RobotError::Io(err)
    }
}

impl From<serde_json::Error> for RobotError {
    fn from(err: serde_json::Error) -> Self {
        RobotError::Json(err)
    }
}
