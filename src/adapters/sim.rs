//! In-memory hardware backends for host runs.
//!
//! Every backend logs what it would have done at debug level and keeps
//! the resulting state for inspection, so the binary runs end to end on
//! a development machine with no GPIO header attached.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, info};

use crate::app::ports::{DistanceSensor, GpioPort, Level, MotorPort, PinMode, StripOptions, StripPort};
use crate::error::{GpioError, Result, StripError};

// ── GPIO ──────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SimGpioState {
    modes: HashMap<u8, PinMode>,
    levels: HashMap<u8, Level>,
    pulses: HashMap<u8, u16>,
    terminated: bool,
}

/// Shared simulated GPIO backend.  Clones drive the same pin table.
#[derive(Clone, Default)]
pub struct SimGpio {
    state: Rc<RefCell<SimGpioState>>,
}

impl SimGpio {
    pub fn new() -> Self {
        info!("SimGpio: simulation backend");
        Self::default()
    }

    pub fn level(&self, pin: u8) -> Option<Level> {
        self.state.borrow().levels.get(&pin).copied()
    }

    pub fn pulse(&self, pin: u8) -> Option<u16> {
        self.state.borrow().pulses.get(&pin).copied()
    }

    pub fn is_terminated(&self) -> bool {
        self.state.borrow().terminated
    }

    fn check_output(state: &SimGpioState, pin: u8) -> Result<()> {
        if state.terminated || state.modes.get(&pin) != Some(&PinMode::Output) {
            return Err(GpioError::PinUnavailable.into());
        }
        Ok(())
    }
}

impl GpioPort for SimGpio {
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        let mut s = self.state.borrow_mut();
        if s.terminated {
            return Err(GpioError::SetModeFailed.into());
        }
        debug!("SimGpio: GPIO{} mode {:?}", pin, mode);
        s.modes.insert(pin, mode);
        Ok(())
    }

    fn digital_write(&mut self, pin: u8, level: Level) -> Result<()> {
        let mut s = self.state.borrow_mut();
        Self::check_output(&s, pin)?;
        debug!("SimGpio: GPIO{} -> {:?}", pin, level);
        s.levels.insert(pin, level);
        Ok(())
    }

    fn servo_write(&mut self, pin: u8, pulse_width_us: u16) -> Result<()> {
        let mut s = self.state.borrow_mut();
        Self::check_output(&s, pin)?;
        debug!("SimGpio: GPIO{} servo {}us", pin, pulse_width_us);
        s.pulses.insert(pin, pulse_width_us);
        Ok(())
    }

    fn terminate(&mut self) {
        let mut s = self.state.borrow_mut();
        if !s.terminated {
            info!("SimGpio: terminated");
        }
        s.terminated = true;
        s.pulses.clear();
    }
}

// ── LED strip ─────────────────────────────────────────────────

#[derive(Default)]
pub struct SimStrip {
    count: Option<u16>,
    last: Vec<u32>,
    frames: usize,
}

impl SimStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> &[u32] {
        &self.last
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl StripPort for SimStrip {
    fn init_strip(&mut self, count: u16, options: StripOptions) -> Result<()> {
        info!(
            "SimStrip: {} pixels (dma={}, gpio={})",
            count, options.dma, options.gpio
        );
        self.count = Some(count);
        Ok(())
    }

    fn render(&mut self, pixels: &[u32]) -> Result<()> {
        let Some(count) = self.count else {
            return Err(StripError::RenderFailed.into());
        };
        if pixels.len() != usize::from(count) {
            return Err(StripError::BufferSizeMismatch.into());
        }
        debug!("SimStrip: frame #{} = {:06X}", self.frames, pixels.first().copied().unwrap_or(0));
        self.last.clear();
        self.last.extend_from_slice(pixels);
        self.frames += 1;
        Ok(())
    }
}

// ── Motors ────────────────────────────────────────────────────

/// Simulated controller bring-up time.
const SIM_MOTOR_SETTLE: Duration = Duration::from_millis(20);

#[derive(Default)]
pub struct SimMotors {
    initialised: bool,
    stops: usize,
}

impl SimMotors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl MotorPort for SimMotors {
    async fn initialize_controller(&mut self) -> Result<()> {
        async_io_mini::Timer::after(SIM_MOTOR_SETTLE).await;
        self.initialised = true;
        info!("SimMotors: controller initialised");
        Ok(())
    }

    async fn stop_all_motors(&mut self) -> Result<()> {
        self.stops += 1;
        info!("SimMotors: all motors stopped");
        Ok(())
    }
}

// ── Distance sensor ───────────────────────────────────────────

pub struct SimDistanceSensor {
    cm: f32,
}

impl SimDistanceSensor {
    pub fn new(cm: f32) -> Self {
        Self { cm }
    }
}

impl DistanceSensor for SimDistanceSensor {
    fn read_cm(&mut self) -> Result<f32> {
        Ok(self.cm)
    }
}
