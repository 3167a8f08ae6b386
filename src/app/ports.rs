//! Port traits: the hexagonal boundary between the controllers and the
//! hardware backends.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controllers / Robot (domain)
//! ```
//!
//! Backends (pigpio-style GPIO, WS2812 strip, H-bridge motors, ultrasonic
//! sensor, config files, event sinks) implement these traits.  The
//! controllers and the [`Robot`](super::service::Robot) consume them via
//! generics, so the domain never touches hardware directly and every
//! backend can be replaced with a recording mock in tests.

use crate::config::RobotConfig;
use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// GPIO port (pin modes, digital levels, servo pulses)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Process-wide GPIO backend.
///
/// Implementations are cheap handles: every clone drives the same
/// underlying backend, so the servo controller, the buzzer and the
/// orchestration layer each hold their own copy.
pub trait GpioPort: Clone {
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<()>;

    fn digital_write(&mut self, pin: u8, level: Level) -> Result<()>;

    /// Emit servo pulses of `pulse_width_us` on `pin` until told otherwise.
    fn servo_write(&mut self, pin: u8, pulse_width_us: u16) -> Result<()>;

    /// Release the backend.  Called once, at the end of the process.
    fn terminate(&mut self);
}

// ───────────────────────────────────────────────────────────────
// LED strip port
// ───────────────────────────────────────────────────────────────

/// Strip construction options passed through to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripOptions {
    pub dma: u8,
    pub gpio: u8,
}

pub trait StripPort {
    /// Initialise the strip hardware for `count` pixels.
    fn init_strip(&mut self, count: u16, options: StripOptions) -> Result<()>;

    /// Push packed `0xRRGGBB` pixels to the strip.
    fn render(&mut self, pixels: &[u32]) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Motor port
// ───────────────────────────────────────────────────────────────

/// DC drive motor controller.  Its own run-mode state machine lives
/// behind this boundary.
#[allow(async_fn_in_trait)]
pub trait MotorPort {
    async fn initialize_controller(&mut self) -> Result<()>;

    async fn stop_all_motors(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Distance sensor port
// ───────────────────────────────────────────────────────────────

pub trait DistanceSensor {
    /// One blocking ranging cycle.  Fails with
    /// [`SensorError::Timeout`](crate::error::SensorError::Timeout) when no
    /// echo comes back.
    fn read_cm(&mut self) -> Result<f32>;
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock driving every timer in the crate.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Configuration source
// ───────────────────────────────────────────────────────────────

/// Loads the robot configuration.
///
/// Implementations MUST call [`RobotConfig::validate`] before returning.
/// Returns [`RobotConfig::default()`] when nothing is stored.
pub trait ConfigSource {
    fn load(&self) -> Result<RobotConfig>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The orchestration layer emits structured
/// [`RobotEvent`](super::events::RobotEvent)s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::RobotEvent);
}
