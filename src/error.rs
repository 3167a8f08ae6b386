//! Unified error types for the robot actuator layer.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! orchestration layer's error handling uniform.  All variants are `Copy`
//! so they can be passed through the controllers and the idle sweep
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible hardware-facing operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A GPIO backend call failed.
    Gpio(GpioError),
    /// The LED strip driver failed.
    Strip(StripError),
    /// The distance sensor could not be read.
    Sensor(SensorError),
    /// The motor driver failed.
    Motor(MotorError),
    /// Peripheral or backend initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Strip(e) => write!(f, "led strip: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Motor(e) => write!(f, "motor: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Pin mode could not be configured.
    SetModeFailed,
    /// Digital level write failed.
    WriteFailed,
    /// Servo pulse write failed.
    ServoWriteFailed,
    /// Pin is not configured as an output, or is held elsewhere.
    PinUnavailable,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetModeFailed => write!(f, "set mode failed"),
            Self::WriteFailed => write!(f, "digital write failed"),
            Self::ServoWriteFailed => write!(f, "servo write failed"),
            Self::PinUnavailable => write!(f, "pin unavailable"),
        }
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// LED strip errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripError {
    /// Strip hardware could not be initialised.
    InitFailed,
    /// Pixel buffer push failed.
    RenderFailed,
    /// Buffer length differs from the initialised pixel count.
    BufferSizeMismatch,
}

impl fmt::Display for StripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => write!(f, "init failed"),
            Self::RenderFailed => write!(f, "render failed"),
            Self::BufferSizeMismatch => write!(f, "buffer size mismatch"),
        }
    }
}

impl From<StripError> for Error {
    fn from(e: StripError) -> Self {
        Self::Strip(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Sensor handle was never set up.
    NotInitialised,
    /// No echo arrived within the configured timeout.
    Timeout,
    /// GPIO read returned an error.
    ReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialised => write!(f, "not initialised"),
            Self::Timeout => write!(f, "echo timeout"),
            Self::ReadFailed => write!(f, "read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Motor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorError {
    /// Controller initialisation failed.
    InitFailed,
    /// Stop command could not be applied.
    StopFailed,
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => write!(f, "controller init failed"),
            Self::StopFailed => write!(f, "stop failed"),
        }
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Self::Motor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
