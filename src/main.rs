#![warn(non_snake_case)]

use std::sync::Arc;

use log::{error, info};
use tokio::sync::watch;
use tokio::task;
use tokio::time::{sleep, Duration, Instant};
use RobotCode2024::config::RobotConfig;
use RobotCode2024::container::DriveInput;
use RobotCode2024::error::RobotError;
use RobotCode2024::hardware::sim;
use RobotCode2024::remote::{self, RemoteState};
use RobotCode2024::telemetry::Telemetry;
use RobotCode2024::{Robot, RobotMode};

fn main() -> Result<(), RobotError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RobotConfig::load_or_default(RobotConfig::path())?;
    let runtime = tokio::runtime::Runtime::new()?;
    let local = task::LocalSet::new();

    let addr = Telemetry::addr(config.telemetry_port);
    let listener = runtime.block_on(tokio::net::TcpListener::bind(addr))?;
    info!("Dashboard listening on {}", addr);

    runtime.block_on(local.run_until(async move {
        let telemetry = Telemetry::new();

        // No CAN bus off the robot; run the control code against sim ports
        let mut robot = Robot::new(sim::hardware(), &config, telemetry.clone());
        robot.robot_init();

        let (drive_tx, drive_rx) = watch::channel(DriveInput::default());
        let (mode_tx, mut mode_rx) = watch::channel(RobotMode::default());
        let app = telemetry.router().merge(remote::router(RemoteState {
            intakeshooter: robot.intakeshooter.handle(),
            drive: Arc::new(drive_tx),
            mode: Arc::new(mode_tx),
        }));

        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                error!("Dashboard server stopped: {}", err);
            }
        });

        let period = Duration::from_millis(config.loop_period_ms);
        let mut last_loop = Instant::now();

        loop {
            if mode_rx.has_changed().unwrap_or(false) {
                info!("Robot {}", *mode_rx.borrow_and_update());
            }
            let mode = *mode_rx.borrow();
            let input = *drive_rx.borrow();

            if let Err(err) = robot.periodic(mode, &input) {
                error!("Tick failed: {}", err);
            }

            let elapsed = last_loop.elapsed();
            telemetry.put_number("Loop Rate", 1. / elapsed.as_secs_f64().max(f64::EPSILON));

            sleep(period.saturating_sub(elapsed)).await;
            last_loop = Instant::now();
        }
    }));

    Ok(())
}
