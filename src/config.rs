//! Robot configuration parameters
//!
//! All tunable parameters for the actuator layer.  Defaults come from
//! [`crate::pins`]; a JSON file can override any subset of them (see
//! [`crate::adapters::config_file`]).

use serde::{Deserialize, Serialize};

use crate::drivers::led_strip::FlashColor;
use crate::error::{Error, Result};
use crate::pins;

/// Core robot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub led: LedConfig,
    pub servo: ServoConfig,
    pub flash: FlashConfig,
    pub self_test: SelfTestConfig,
    pub sensor: SensorConfig,
    /// Buzzer output pin (BCM).
    pub buzzer_gpio: u8,
    /// Cooperative scheduler poll cadence (milliseconds)
    pub loop_interval_ms: u32,
}

/// LED strip construction options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedConfig {
    pub number_of_leds: u16,
    pub dma: u8,
    pub gpio: u8,
}

/// Pan/tilt servo pins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    pub h_servo_gpio: u8,
    pub v_servo_gpio: u8,
}

/// Defaults for [`LedStripController::flash_default`](crate::drivers::led_strip::LedStripController::flash_default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashConfig {
    pub color: FlashColor,
    pub flashing_time_ms: u32,
    pub flashing_interval_ms: u32,
}

/// Hardware self-test timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfTestConfig {
    /// Total test duration (milliseconds)
    pub duration_ms: u32,
    /// Servo sweep step cadence (milliseconds)
    pub step_ms: u32,
    pub pulse_min_us: u16,
    pub pulse_max_us: u16,
    pub pulse_increment_us: u16,
}

/// Ultrasonic distance sensor wiring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub echo_gpio: u8,
    pub trigger_gpio: u8,
    pub echo_timeout_us: u32,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            led: LedConfig::default(),
            servo: ServoConfig::default(),
            flash: FlashConfig::default(),
            self_test: SelfTestConfig::default(),
            sensor: SensorConfig::default(),
            buzzer_gpio: pins::BUZZER_GPIO,
            loop_interval_ms: 10,
        }
    }
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            number_of_leds: pins::LED_STRIP_COUNT,
            dma: pins::LED_STRIP_DMA,
            gpio: pins::LED_STRIP_GPIO,
        }
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            h_servo_gpio: pins::CAM_H_SERVO_GPIO,
            v_servo_gpio: pins::CAM_V_SERVO_GPIO,
        }
    }
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            color: FlashColor::Red,
            flashing_time_ms: 2000,
            flashing_interval_ms: 100,
        }
    }
}

impl Default for SelfTestConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            step_ms: 100,
            pulse_min_us: 1000,
            pulse_max_us: 2000,
            pulse_increment_us: 100,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            echo_gpio: pins::ECHO_GPIO,
            trigger_gpio: pins::TRIGGER_GPIO,
            echo_timeout_us: pins::ECHO_TIMEOUT_US,
        }
    }
}

impl RobotConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<()> {
        if self.led.number_of_leds == 0 {
            return Err(Error::Config("led.number_of_leds must be > 0"));
        }
        if self.flash.flashing_time_ms == 0 || self.flash.flashing_interval_ms == 0 {
            return Err(Error::Config("flash time and interval must be > 0"));
        }
        let t = &self.self_test;
        if t.duration_ms == 0 || t.step_ms == 0 {
            return Err(Error::Config("self_test duration and step must be > 0"));
        }
        if t.pulse_min_us >= t.pulse_max_us {
            return Err(Error::Config("self_test pulse range is empty"));
        }
        if t.pulse_min_us < pins::SERVO_MIN_PULSE_US || t.pulse_max_us > pins::SERVO_MAX_PULSE_US {
            return Err(Error::Config("self_test pulse range outside servo limits"));
        }
        if t.pulse_increment_us == 0 {
            return Err(Error::Config("self_test pulse increment must be > 0"));
        }
        if self.servo.h_servo_gpio == self.servo.v_servo_gpio {
            return Err(Error::Config("servo axes share a pin"));
        }
        if self.loop_interval_ms == 0 {
            return Err(Error::Config("loop_interval_ms must be > 0"));
        }
        Ok(())
    }
}
