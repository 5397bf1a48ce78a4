use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::constants::{self, drivetrain};
use crate::error::RobotError;

/// Tunables read at startup. Missing keys take their defaults, so an old file
/// keeps working after a field is added.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub loop_period_ms: u64,
    pub telemetry_port: u16,

    /// Absolute encoder reading, in degrees, of each module pointing forward.
    /// FR, FL, BL, BR
    pub module_offsets_degrees: [f64; 4],

    pub track_width_inches: f64,
    pub wheelbase_inches: f64,

    pub max_speed_meters_per_second: f64,
    pub max_angular_speed_radians_per_second: f64,
    pub slow_factor: f64,

    /// Module values published every tick, e.g. "current_angle"
    pub dashboard_fields: Vec<String>,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            loop_period_ms: constants::LOOP_PERIOD_MS,
            telemetry_port: constants::TELEMETRY_PORT,
            module_offsets_degrees: [0.; 4],
            track_width_inches: drivetrain::TRACK_WIDTH_INCHES,
            wheelbase_inches: drivetrain::WHEELBASE_INCHES,
            max_speed_meters_per_second: drivetrain::MAX_SPEED_METERS_PER_SECOND,
            max_angular_speed_radians_per_second: drivetrain::MAX_ANGULAR_SPEED_RADIANS_PER_SECOND,
            slow_factor: drivetrain::SLOW_FACTOR,
            dashboard_fields: vec!["current_angle".to_owned(), "target_angle".to_owned()],
        }
    }
}

impl RobotConfig {
    /// `ROBOT_CONFIG` overrides the on-robot default path.
    pub fn path() -> String {
        std::env::var("ROBOT_CONFIG").unwrap_or_else(|_| constants::CONFIG_PATH.to_owned())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RobotError> {
        let mut file = File::open(path)?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(serde_json::from_str(&buf)?)
    }

    /// A missing file is not an error; a malformed one is.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, RobotError> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(RobotError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                warn!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    pub fn store(&self, path: impl AsRef<Path>) -> Result<(), RobotError> {
        let mut file = File::create(path)?;
        let buf = serde_json::to_string_pretty(self)?;
        file.write_all(buf.as_bytes())?;
        Ok(())
    }
}
