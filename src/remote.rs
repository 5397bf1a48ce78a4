//! HTTP trigger surface for the driver station side. Requests only overwrite
//! shared state; the robot loop picks it up on its next tick.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::watch;

use crate::container::DriveInput;
use crate::error::RobotError;
use crate::subsystems::{IntakeShooterHandle, ShootTarget};
use crate::RobotMode;

#[derive(Clone)]
pub struct RemoteState {
    pub intakeshooter: IntakeShooterHandle,
    pub drive: Arc<watch::Sender<DriveInput>>,
    pub mode: Arc<watch::Sender<RobotMode>>,
}

pub fn router(state: RemoteState) -> Router {
    Router::new()
        .route("/intakeshooter", get(intakeshooter_state))
        .route("/intakeshooter/intake", post(intake))
        .route("/intakeshooter/retract", post(retract))
        .route("/intakeshooter/disable", post(disable))
        .route("/intakeshooter/reset", post(reset))
        .route("/intakeshooter/spinup/:target", post(spinup))
        .route("/intakeshooter/fire/:target", post(fire))
        .route("/drive", post(drive))
        .route("/mode", get(mode))
        .route("/mode/:mode", post(set_mode))
        .with_state(state)
}

type Rejection = (StatusCode, String);

fn parse_target(target: &str) -> Result<ShootTarget, Rejection> {
    target
        .parse()
        .map_err(|err: RobotError| (StatusCode::BAD_REQUEST, err.to_string()))
}

async fn intakeshooter_state(State(state): State<RemoteState>) -> String {
    state.intakeshooter.state().to_string()
}

async fn intake(State(state): State<RemoteState>) -> StatusCode {
    state.intakeshooter.intake_activate();
    StatusCode::NO_CONTENT
}

async fn retract(State(state): State<RemoteState>) -> StatusCode {
    state.intakeshooter.retract();
    StatusCode::NO_CONTENT
}

async fn disable(State(state): State<RemoteState>) -> StatusCode {
    state.intakeshooter.disable();
    StatusCode::NO_CONTENT
}

async fn reset(State(state): State<RemoteState>) -> StatusCode {
    state.intakeshooter.reset();
    StatusCode::NO_CONTENT
}

async fn spinup(
    State(state): State<RemoteState>,
    Path(target): Path<String>,
) -> Result<StatusCode, Rejection> {
    state.intakeshooter.spinup(parse_target(&target)?);
    Ok(StatusCode::NO_CONTENT)
}

async fn fire(
    State(state): State<RemoteState>,
    Path(target): Path<String>,
) -> Result<StatusCode, Rejection> {
    state.intakeshooter.fire(parse_target(&target)?);
    Ok(StatusCode::NO_CONTENT)
}

async fn drive(State(state): State<RemoteState>, Json(input): Json<DriveInput>) -> StatusCode {
    state.drive.send_replace(input);
    StatusCode::NO_CONTENT
}

async fn mode(State(state): State<RemoteState>) -> String {
    state.mode.borrow().to_string()
}

async fn set_mode(
    State(state): State<RemoteState>,
    Path(mode): Path<String>,
) -> Result<StatusCode, Rejection> {
    let mode = mode
        .parse::<RobotMode>()
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;
    state.mode.send_replace(mode);
    Ok(StatusCode::NO_CONTENT)
}
