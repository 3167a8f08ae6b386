//! Robot orchestration: the hexagonal core.
//!
//! [`Robot`] owns the LED strip controller, the camera servo controller,
//! the buzzer, the motor driver and (optionally) the distance sensor.  It
//! runs the hardware self-test and the idle sweep that every exit path
//! goes through.  All I/O flows through port traits, so the whole
//! service runs against mock adapters in tests.
//!
//! ```text
//!  GpioPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  StripPort ─▶ │            Robot             │
//!  MotorPort ─▶ │  LEDs · Servo · Buzzer       │
//!  Distance ──▶ │  self-test timers            │
//!               └──────────────────────────────┘
//! ```
//!
//! ## Self-test timeline (defaults)
//!
//! | t (ms)      | Action                                            |
//! |-------------|---------------------------------------------------|
//! | 0           | LED white, buzzer on, await motor controller init |
//! | 100..1900   | both servo axes stepped 1000 → 2000 → 1000 … µs   |
//! | 2000        | LED off, buzzer off, await motors stopped         |

use log::{error, info, warn};

use crate::config::{RobotConfig, SelfTestConfig};
use crate::drivers::buzzer::{Buzzer, GpioOutput};
use crate::drivers::led_strip::LedStripController;
use crate::drivers::servo_cam::ServoCam;
use crate::error::{Error, Result};
use crate::scheduler::TimerSet;

use super::events::{RobotEvent, ShutdownReason};
use super::ports::{Clock, DistanceSensor, EventSink, GpioPort, MotorPort, StripPort};

// ───────────────────────────────────────────────────────────────
// Construction inputs
// ───────────────────────────────────────────────────────────────

/// Hardware backends handed to [`Robot::new`].
pub struct RobotParts<G, S, M> {
    pub gpio: G,
    pub strip: S,
    pub motors: M,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelfTestTimer {
    Step,
    End,
}

/// Servo sweep position during the self-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sweep {
    pulse_us: u16,
    rising: bool,
}

impl Sweep {
    /// Advance one step, reversing at the ends of the range.
    fn advance(self, t: &SelfTestConfig) -> Self {
        let next = if self.rising {
            self.pulse_us
                .saturating_add(t.pulse_increment_us)
                .min(t.pulse_max_us)
        } else {
            self.pulse_us
                .saturating_sub(t.pulse_increment_us)
                .max(t.pulse_min_us)
        };
        let rising = if next >= t.pulse_max_us {
            false
        } else if next <= t.pulse_min_us {
            true
        } else {
            self.rising
        };
        Self {
            pulse_us: next,
            rising,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Robot
// ───────────────────────────────────────────────────────────────

pub struct Robot<G, S, M, D>
where
    G: GpioPort,
    S: StripPort,
    M: MotorPort,
    D: DistanceSensor,
{
    gpio: G,
    leds: LedStripController<S>,
    servo: ServoCam<G>,
    buzzer: Buzzer<GpioOutput<G>>,
    motors: M,
    sensor: Option<D>,
    self_test: SelfTestConfig,
    timers: TimerSet<SelfTestTimer, 2>,
    sweep: Option<Sweep>,
}

impl<G, S, M, D> Robot<G, S, M, D>
where
    G: GpioPort,
    S: StripPort,
    M: MotorPort,
    D: DistanceSensor,
{
    /// Build every controller.  The servo mount is centred as part of
    /// construction.
    pub fn new(parts: RobotParts<G, S, M>, config: &RobotConfig, sink: &mut impl EventSink) -> Result<Self> {
        let RobotParts { gpio, strip, motors } = parts;
        let leds = LedStripController::new(strip, &config.led, config.flash.clone())?;
        let servo = ServoCam::new(gpio.clone(), &config.servo)?;
        let buzzer = Buzzer::new(GpioOutput::new(gpio.clone(), config.buzzer_gpio)?);

        sink.emit(&RobotEvent::Started);
        info!("[ROBOT] controllers ready");

        Ok(Self {
            gpio,
            leds,
            servo,
            buzzer,
            motors,
            sensor: None,
            self_test: config.self_test.clone(),
            timers: TimerSet::new(),
            sweep: None,
        })
    }

    // ── Distance sensor ───────────────────────────────────────

    /// Attach the result of sensor initialisation.  A failed init is
    /// logged and leaves the robot without a sensor.
    pub fn attach_distance_sensor(&mut self, sensor: Result<D>) {
        match sensor {
            Ok(s) => {
                info!("[ROBOT] distance sensor initialised");
                self.sensor = Some(s);
            }
            Err(e) => error!("[ROBOT] error initialising distance sensor: {e}"),
        }
    }

    pub fn has_distance_sensor(&self) -> bool {
        self.sensor.is_some()
    }

    /// One guarded distance reading.  `None` when no sensor is attached
    /// or the read fails.
    pub fn read_distance(&mut self, sink: &mut impl EventSink) -> Option<f32> {
        let Some(sensor) = self.sensor.as_mut() else {
            warn!("[ROBOT] distance requested but no sensor attached");
            sink.emit(&RobotEvent::SensorUnavailable);
            return None;
        };
        match sensor.read_cm() {
            Ok(cm) => {
                info!("[ROBOT] echo sensor reporting {:.1} cm", cm);
                sink.emit(&RobotEvent::DistanceReading { cm });
                Some(cm)
            }
            Err(e) => {
                warn!("[ROBOT] distance read failed: {e}");
                None
            }
        }
    }

    // ── Self-test ─────────────────────────────────────────────

    /// Light the strip, sound the buzzer, bring up the motor controller,
    /// then arm the servo sweep and the end-of-test timer.
    ///
    /// The timeline starts once the motor controller is up.
    pub async fn start_self_test(&mut self, clock: &impl Clock, sink: &mut impl EventSink) -> Result<()> {
        info!("[ROBOT] starting hardware test...");
        self.leds.white()?;
        self.buzzer.on()?;
        sink.emit(&RobotEvent::SelfTestStarted);

        self.motors.initialize_controller().await?;

        let now = clock.now_ms();
        let t = &self.self_test;
        self.timers.clear();
        // End first: it must win a tie with the last step.
        self.timers
            .after(now, t.duration_ms, SelfTestTimer::End)
            .ok_or(Error::Init("self-test timer set full"))?;
        self.timers
            .every(now, t.step_ms, SelfTestTimer::Step)
            .ok_or(Error::Init("self-test timer set full"))?;
        self.sweep = Some(Sweep {
            pulse_us: t.pulse_min_us,
            rising: true,
        });
        Ok(())
    }

    pub fn self_test_running(&self) -> bool {
        self.sweep.is_some()
    }

    fn sweep_step(&mut self, sink: &mut impl EventSink) -> Result<()> {
        let Some(sweep) = self.sweep else {
            return Ok(());
        };
        let pulse = sweep.pulse_us;
        info!("[ROBOT] testing servo motors with pulse width {}", pulse);
        self.servo
            .absolute_position(i32::from(pulse), i32::from(pulse))?;
        sink.emit(&RobotEvent::SelfTestStep { pulse_us: pulse });
        self.sweep = Some(sweep.advance(&self.self_test));
        Ok(())
    }

    async fn finish_self_test(&mut self, sink: &mut impl EventSink) -> Result<()> {
        self.timers.clear();
        self.sweep = None;
        self.leds.off()?;
        self.buzzer.off()?;
        self.motors.stop_all_motors().await?;
        info!("[ROBOT] end hardware test");
        sink.emit(&RobotEvent::SelfTestFinished);
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run every self-test and LED timer due at `now_ms`.
    pub async fn poll(&mut self, now_ms: u64, sink: &mut impl EventSink) -> Result<()> {
        while let Some((_, timer)) = self.timers.pop_due(now_ms) {
            match timer {
                SelfTestTimer::Step => self.sweep_step(sink)?,
                SelfTestTimer::End => self.finish_self_test(sink).await?,
            }
        }
        self.leds.poll(now_ms)
    }

    // ── Controller access ─────────────────────────────────────

    pub fn leds(&self) -> &LedStripController<S> {
        &self.leds
    }

    pub fn leds_mut(&mut self) -> &mut LedStripController<S> {
        &mut self.leds
    }

    pub fn servo(&self) -> &ServoCam<G> {
        &self.servo
    }

    pub fn servo_mut(&mut self) -> &mut ServoCam<G> {
        &mut self.servo
    }

    pub fn buzzer_on(&self) -> bool {
        self.buzzer.is_on()
    }

    // ── Idle sweep ────────────────────────────────────────────

    /// Return every actuator to idle and release the GPIO backend.
    ///
    /// Best effort: a failing step is logged and the sweep carries on.
    /// Returns the number of steps that failed.
    pub async fn shutdown(mut self, reason: ShutdownReason, sink: &mut impl EventSink) -> usize {
        warn!("[ROBOT] returning actuators to idle ({:?})", reason);
        sink.emit(&RobotEvent::ShutdownRequested { reason });

        self.timers.clear();
        self.sweep = None;
        let mut failures = 0;

        failures += usize::from(sweep_failed("buzzer off", self.buzzer.off()));
        self.leds.stop_flash();
        failures += usize::from(sweep_failed("led off", self.leds.off()));
        failures += usize::from(sweep_failed(
            "stop motors",
            self.motors.stop_all_motors().await,
        ));
        self.servo.terminate();
        self.gpio.terminate();

        info!("[ROBOT] idle sweep complete, {} failure(s)", failures);
        sink.emit(&RobotEvent::IdleSweepComplete { failures });
        failures
    }
}

/// Log a failed idle-sweep step.  Returns `true` on failure.
fn sweep_failed(step: &str, result: Result<()>) -> bool {
    match result {
        Ok(()) => false,
        Err(e) => {
            error!("[ROBOT] idle sweep: {} failed: {}", step, e);
            true
        }
    }
}
