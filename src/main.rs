//! PiBot: Main Entry Point
//!
//! Hexagonal architecture with a cooperative, timer-driven main loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimGpio / RpiGpio   SimStrip / SpiStrip   LogEventSink        │
//! │  (GpioPort)          (StripPort)           (EventSink)         │
//! │  SimMotors / HBridge SimDistance / Hcsr04  JsonConfigFile      │
//! │  (MotorPort)         (DistanceSensor)      (ConfigSource)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │                Robot (orchestration)                   │    │
//! │  │  LedStripController · ServoCam · Buzzer · self-test    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  LocalExecutor + async-io-mini Timer · Ctrl-C → Signal         │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every way out of the loop (Ctrl-C, a hardware error) runs the idle
//! sweep before the process exits with status 1.

use std::time::Duration;

use anyhow::{Context, Result};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use futures_lite::future;
use log::{error, info, warn};
use serde::Serialize;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use pibot::adapters::config_file::JsonConfigFile;
use pibot::adapters::log_sink::LogEventSink;
use pibot::adapters::time::MonotonicClock;
use pibot::app::events::ShutdownReason;
use pibot::app::ports::{Clock, ConfigSource, DistanceSensor, GpioPort, MotorPort, StripPort};
use pibot::app::service::{Robot, RobotParts};
use pibot::config::RobotConfig;
use pibot::status::Listener;

/// Environment variable selecting the log level (`error` … `trace`).
const LOG_ENV: &str = "PIBOT_LOG";

/// Raised by the Ctrl-C handler, awaited by the main loop.
static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    TermLogger::init(
        level,
        ConfigBuilder::new().build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PiBot v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config (or defaults) ──────────────────────────
    let config = match JsonConfigFile::from_env().load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            RobotConfig::default()
        }
    };

    // ── 3. Ctrl-C → shutdown signal ───────────────────────────
    ctrlc::set_handler(|| SHUTDOWN.signal(())).context("installing SIGINT handler")?;

    // ── 4+. Backends, controllers, main loop ──────────────────
    run_with_backends(&config)
}

// ── Backend selection ─────────────────────────────────────────

#[cfg(not(all(feature = "rpi", target_os = "linux")))]
fn run_with_backends(config: &RobotConfig) -> Result<()> {
    use pibot::adapters::sim::{SimDistanceSensor, SimGpio, SimMotors, SimStrip};

    info!("Backend: simulation");
    let parts = RobotParts {
        gpio: SimGpio::new(),
        strip: SimStrip::new(),
        motors: SimMotors::new(),
    };
    run(parts, Ok(SimDistanceSensor::new(42.0)), config)
}

#[cfg(all(feature = "rpi", target_os = "linux"))]
fn run_with_backends(config: &RobotConfig) -> Result<()> {
    use pibot::adapters::rpi::{HBridgeMotors, Hcsr04, RpiGpio, SpiStrip};

    info!("Backend: Raspberry Pi (rppal)");
    let mut gpio = RpiGpio::new().context("opening GPIO")?;
    let motors = match HBridgeMotors::new() {
        Ok(m) => m,
        Err(e) => {
            gpio.terminate();
            return Err(e).context("opening motor driver");
        }
    };
    let parts = RobotParts {
        gpio,
        strip: SpiStrip::new(),
        motors,
    };
    run(parts, Hcsr04::new(&config.sensor), config)
}

// ── Bootstrap + loop (backend-agnostic) ───────────────────────

fn run<G, S, M, D>(
    parts: RobotParts<G, S, M>,
    sensor: pibot::error::Result<D>,
    config: &RobotConfig,
) -> Result<()>
where
    G: GpioPort,
    S: StripPort,
    M: MotorPort,
    D: DistanceSensor,
{
    let mut sink = LogEventSink::new();
    let clock = MonotonicClock::new();

    // ── 4. Controllers ────────────────────────────────────────
    let mut gpio = parts.gpio.clone();
    let mut robot: Robot<G, S, M, D> = match Robot::new(parts, config, &mut sink) {
        Ok(r) => r,
        Err(e) => {
            error!("[ROBOT] controller setup failed: {}", e);
            gpio.terminate();
            return Err(e).context("building controllers");
        }
    };

    // ── 5. Status listeners ───────────────────────────────────
    robot.leds_mut().set_on_status_change(Some(json_listener("LED")));
    robot.servo_mut().set_on_status_change(Some(json_listener("SERVO")));

    // ── 6. Distance sensor (optional) ─────────────────────────
    robot.attach_distance_sensor(sensor);
    robot.read_distance(&mut sink);

    // ── 7. Self-test + cooperative loop until Ctrl-C or error ─
    let tick = Duration::from_millis(u64::from(config.loop_interval_ms));
    let outcome = {
        let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();
        future::block_on(executor.run(future::or(
            drive(&mut robot, &clock, &mut sink, tick),
            async {
                SHUTDOWN.wait().await;
                Ok(())
            },
        )))
    };

    // ── 8. Idle sweep, then exit non-zero ─────────────────────
    let reason = match &outcome {
        Ok(()) => ShutdownReason::Interrupted,
        Err(_) => ShutdownReason::Failure,
    };
    future::block_on(robot.shutdown(reason, &mut sink));

    outcome.context("robot loop failed")?;
    std::process::exit(1);
}

/// Start the self-test, then poll every timer at `tick` cadence.
/// Only returns on a hardware error.
async fn drive<G, S, M, D>(
    robot: &mut Robot<G, S, M, D>,
    clock: &MonotonicClock,
    sink: &mut LogEventSink,
    tick: Duration,
) -> pibot::error::Result<()>
where
    G: GpioPort,
    S: StripPort,
    M: MotorPort,
    D: DistanceSensor,
{
    robot.start_self_test(clock, sink).await?;

    let mut ready = false;
    loop {
        async_io_mini::Timer::after(tick).await;
        robot.poll(clock.now_ms(), sink).await?;

        if !ready && !robot.self_test_running() {
            ready = true;
            robot.leds_mut().flash_default(clock.now_ms());
            info!("[ROBOT] ready, Ctrl-C to stop");
        }
    }
}

/// Listener that logs every new state as JSON.
fn json_listener<T: Serialize + 'static>(tag: &'static str) -> Listener<T> {
    Box::new(move |state: &T| match serde_json::to_string(state) {
        Ok(json) => info!("[{}] status {}", tag, json),
        Err(e) => warn!("[{}] status not serialisable: {}", tag, e),
    })
}
