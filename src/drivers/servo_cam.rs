//! Pan/tilt camera servo controller.
//!
//! Two independent axes, each a pulse width in microseconds clamped to
//! [`SERVO_MIN_PULSE_US`]..=[`SERVO_MAX_PULSE_US`].  Requests outside the
//! range are clamped, never rejected, and each axis is clamped on its own
//! (no diagonal limiting).
//!
//! Every move writes horizontal then vertical, then notifies the status
//! listener, even when the target equals the current position.  Each
//! axis is committed once its own write succeeds, so a failed vertical
//! write leaves `status()` matching the hardware and skips the listener.

use log::{debug, info};
use serde::Serialize;

use crate::app::ports::{GpioPort, PinMode};
use crate::config::ServoConfig;
use crate::error::Result;
use crate::pins::{SERVO_CENTER_PULSE_US, SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US};
use crate::status::{Listener, StatusChannel};

/// Current position of both axes, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServoStatus {
    pub horizontal: u16,
    pub vertical: u16,
}

/// Clamp a requested pulse width into the servo range.
pub fn clamp_pulse(pulse_us: i32) -> u16 {
    pulse_us.clamp(i32::from(SERVO_MIN_PULSE_US), i32::from(SERVO_MAX_PULSE_US)) as u16
}

pub struct ServoCam<G: GpioPort> {
    gpio: G,
    h_pin: u8,
    v_pin: u8,
    horizontal: u16,
    vertical: u16,
    status: StatusChannel<ServoStatus>,
}

impl<G: GpioPort> ServoCam<G> {
    /// Configure both pins as outputs and centre the mount.
    ///
    /// Centring goes through [`absolute_position`](Self::absolute_position),
    /// so it is a real hardware write and notifies the (no-op) listener.
    pub fn new(mut gpio: G, config: &ServoConfig) -> Result<Self> {
        gpio.set_mode(config.h_servo_gpio, PinMode::Output)?;
        gpio.set_mode(config.v_servo_gpio, PinMode::Output)?;

        let mut cam = Self {
            gpio,
            h_pin: config.h_servo_gpio,
            v_pin: config.v_servo_gpio,
            horizontal: SERVO_CENTER_PULSE_US,
            vertical: SERVO_CENTER_PULSE_US,
            status: StatusChannel::new("SERVO"),
        };
        let center = i32::from(SERVO_CENTER_PULSE_US);
        cam.absolute_position(center, center)?;
        info!(
            "[SERVO] camera mount ready: h=GPIO{} v=GPIO{}",
            cam.h_pin, cam.v_pin
        );
        Ok(cam)
    }

    /// Move both axes by a signed delta.
    pub fn move_by(&mut self, horizontal_delta: i32, vertical_delta: i32) -> Result<ServoStatus> {
        self.apply(
            i32::from(self.horizontal).saturating_add(horizontal_delta),
            i32::from(self.vertical).saturating_add(vertical_delta),
        )
    }

    /// Move both axes to absolute targets.
    pub fn absolute_position(&mut self, horizontal: i32, vertical: i32) -> Result<ServoStatus> {
        self.apply(horizontal, vertical)
    }

    fn apply(&mut self, horizontal: i32, vertical: i32) -> Result<ServoStatus> {
        let h = clamp_pulse(horizontal);
        let v = clamp_pulse(vertical);
        debug!("[SERVO] position h={} v={}", h, v);

        // Each axis is committed as soon as its own write lands.
        self.gpio.servo_write(self.h_pin, h)?;
        self.horizontal = h;
        self.gpio.servo_write(self.v_pin, v)?;
        self.vertical = v;

        let status = self.status();
        self.status.notify(&status);
        Ok(status)
    }

    pub fn status(&self) -> ServoStatus {
        ServoStatus {
            horizontal: self.horizontal,
            vertical: self.vertical,
        }
    }

    /// Replace the status listener.  `None` is rejected and logged.
    pub fn set_on_status_change(&mut self, listener: Option<Listener<ServoStatus>>) {
        self.status.set(listener);
    }

    /// Drop the listener.  The servos are left where they are and the
    /// pins stay claimed.
    pub fn terminate(&mut self) {
        self.status.reset();
        debug!("[SERVO] listener released");
    }
}
