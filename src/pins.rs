//! GPIO pin assignments for the robot's Raspberry Pi header.
//!
//! Single source of truth: config defaults and adapters reference this
//! module rather than hard-coding pin numbers.  All numbers are BCM.

// ---------------------------------------------------------------------------
// LED strip (WS2812, driven over SPI0)
// ---------------------------------------------------------------------------

/// Strip data line.  SPI0 MOSI, the only pin the SPI backend can drive.
pub const LED_STRIP_GPIO: u8 = 10;
/// DMA channel reserved for PWM/DMA strip backends.
pub const LED_STRIP_DMA: u8 = 10;
/// Number of pixels on the stock strip.
pub const LED_STRIP_COUNT: u16 = 16;

// ---------------------------------------------------------------------------
// Camera pan/tilt servos
// ---------------------------------------------------------------------------

/// Horizontal (pan) servo signal.
pub const CAM_H_SERVO_GPIO: u8 = 7;
/// Vertical (tilt) servo signal.
pub const CAM_V_SERVO_GPIO: u8 = 6;

/// Lowest pulse width the mount accepts, in microseconds.
pub const SERVO_MIN_PULSE_US: u16 = 500;
/// Highest pulse width the mount accepts, in microseconds.
pub const SERVO_MAX_PULSE_US: u16 = 2500;
/// Mechanical centre of both axes.
pub const SERVO_CENTER_PULSE_US: u16 = 1500;
/// Servo frame period (50 Hz).
pub const SERVO_PERIOD_US: u32 = 20_000;

// ---------------------------------------------------------------------------
// Buzzer
// ---------------------------------------------------------------------------

/// Active buzzer, HIGH = sounding.
pub const BUZZER_GPIO: u8 = 26;

// ---------------------------------------------------------------------------
// Ultrasonic distance sensor (HC-SR04)
// ---------------------------------------------------------------------------

/// Echo input (wiringPi 23).
pub const ECHO_GPIO: u8 = 13;
/// Trigger output (wiringPi 26).
pub const TRIGGER_GPIO: u8 = 12;
/// Echo wait timeout in microseconds.
pub const ECHO_TIMEOUT_US: u32 = 750;

// ---------------------------------------------------------------------------
// Drive motors (dual H-bridge, L298N / SN754410 style)
// ---------------------------------------------------------------------------

pub const MOTOR_LEFT_ENABLE_GPIO: u8 = 21;
pub const MOTOR_LEFT_IN1_GPIO: u8 = 20;
pub const MOTOR_LEFT_IN2_GPIO: u8 = 16;
pub const MOTOR_RIGHT_ENABLE_GPIO: u8 = 25;
pub const MOTOR_RIGHT_IN1_GPIO: u8 = 24;
pub const MOTOR_RIGHT_IN2_GPIO: u8 = 23;
