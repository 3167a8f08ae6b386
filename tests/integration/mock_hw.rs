//! Mock hardware adapters for integration tests.
//!
//! Every mock appends to one shared call log, so tests can assert on the
//! full cross-device command history (e.g. "buzzer off before motors
//! stopped") without touching real GPIO.  Faults can be switched on per
//! operation to exercise error paths.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pibot::app::events::RobotEvent;
use pibot::app::ports::{
    Clock, DistanceSensor, EventSink, GpioPort, Level, MotorPort, PinMode, StripOptions, StripPort,
};
use pibot::app::service::RobotParts;
use pibot::error::{GpioError, MotorError, Result, SensorError, StripError};

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    SetMode { pin: u8, mode: PinMode },
    DigitalWrite { pin: u8, level: Level },
    ServoWrite { pin: u8, pulse_us: u16 },
    Terminate,
    InitStrip { count: u16, options: StripOptions },
    Render { color: u32, len: usize },
    MotorInit,
    MotorStop,
}

#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<HwCall>>>);

#[allow(dead_code)]
impl CallLog {
    pub fn push(&self, call: HwCall) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<HwCall> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Color of every strip push, in order.
    pub fn renders(&self) -> Vec<u32> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                HwCall::Render { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    /// Every `(pin, pulse)` servo write, in order.
    pub fn servo_writes(&self) -> Vec<(u8, u16)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                HwCall::ServoWrite { pin, pulse_us } => Some((*pin, *pulse_us)),
                _ => None,
            })
            .collect()
    }

    /// Last level written to `pin`, if any.
    pub fn level(&self, pin: u8) -> Option<Level> {
        self.0.borrow().iter().rev().find_map(|c| match c {
            HwCall::DigitalWrite { pin: p, level } if *p == pin => Some(*level),
            _ => None,
        })
    }

    pub fn count(&self, call: &HwCall) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn position(&self, call: &HwCall) -> Option<usize> {
        self.0.borrow().iter().position(|c| c == call)
    }
}

// ── Fault switches ────────────────────────────────────────────

#[derive(Default)]
pub struct Faults {
    pub servo_write: Cell<bool>,
    /// Fail servo writes to this pin only.
    pub servo_pin: Cell<Option<u8>>,
    pub digital_write: Cell<bool>,
    pub render: Cell<bool>,
    pub motor_init: Cell<bool>,
    pub motor_stop: Cell<bool>,
}

// ── MockHardware ──────────────────────────────────────────────

/// Factory for a set of mocks sharing one call log and one fault table.
pub struct MockHardware {
    pub log: CallLog,
    pub faults: Rc<Faults>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            faults: Rc::new(Faults::default()),
        }
    }

    pub fn gpio(&self) -> MockGpio {
        MockGpio {
            log: self.log.clone(),
            faults: self.faults.clone(),
        }
    }

    pub fn strip(&self) -> MockStrip {
        MockStrip {
            log: self.log.clone(),
            faults: self.faults.clone(),
        }
    }

    pub fn motors(&self) -> MockMotors {
        MockMotors {
            log: self.log.clone(),
            faults: self.faults.clone(),
        }
    }

    pub fn parts(&self) -> RobotParts<MockGpio, MockStrip, MockMotors> {
        RobotParts {
            gpio: self.gpio(),
            strip: self.strip(),
            motors: self.motors(),
        }
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

// ── GpioPort ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockGpio {
    log: CallLog,
    faults: Rc<Faults>,
}

impl GpioPort for MockGpio {
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        self.log.push(HwCall::SetMode { pin, mode });
        Ok(())
    }

    fn digital_write(&mut self, pin: u8, level: Level) -> Result<()> {
        if self.faults.digital_write.get() {
            return Err(GpioError::WriteFailed.into());
        }
        self.log.push(HwCall::DigitalWrite { pin, level });
        Ok(())
    }

    fn servo_write(&mut self, pin: u8, pulse_width_us: u16) -> Result<()> {
        if self.faults.servo_write.get() || self.faults.servo_pin.get() == Some(pin) {
            return Err(GpioError::ServoWriteFailed.into());
        }
        self.log.push(HwCall::ServoWrite {
            pin,
            pulse_us: pulse_width_us,
        });
        Ok(())
    }

    fn terminate(&mut self) {
        self.log.push(HwCall::Terminate);
    }
}

// ── StripPort ─────────────────────────────────────────────────

pub struct MockStrip {
    log: CallLog,
    faults: Rc<Faults>,
}

impl StripPort for MockStrip {
    fn init_strip(&mut self, count: u16, options: StripOptions) -> Result<()> {
        self.log.push(HwCall::InitStrip { count, options });
        Ok(())
    }

    fn render(&mut self, pixels: &[u32]) -> Result<()> {
        if self.faults.render.get() {
            return Err(StripError::RenderFailed.into());
        }
        let color = pixels.first().copied().unwrap_or(0);
        assert!(
            pixels.iter().all(|&p| p == color),
            "strip must always be rendered as one solid color"
        );
        self.log.push(HwCall::Render {
            color,
            len: pixels.len(),
        });
        Ok(())
    }
}

// ── MotorPort ─────────────────────────────────────────────────

pub struct MockMotors {
    log: CallLog,
    faults: Rc<Faults>,
}

impl MotorPort for MockMotors {
    async fn initialize_controller(&mut self) -> Result<()> {
        if self.faults.motor_init.get() {
            return Err(MotorError::InitFailed.into());
        }
        self.log.push(HwCall::MotorInit);
        Ok(())
    }

    async fn stop_all_motors(&mut self) -> Result<()> {
        if self.faults.motor_stop.get() {
            return Err(MotorError::StopFailed.into());
        }
        self.log.push(HwCall::MotorStop);
        Ok(())
    }
}

// ── DistanceSensor ────────────────────────────────────────────

pub struct MockSensor {
    pub reading: Option<f32>,
}

impl DistanceSensor for MockSensor {
    fn read_cm(&mut self) -> Result<f32> {
        self.reading.ok_or_else(|| SensorError::Timeout.into())
    }
}

// ── Clock ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock(Cell<u64>);

#[allow(dead_code)]
impl ManualClock {
    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

// ── EventSink ─────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<RobotEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&RobotEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &RobotEvent) {
        self.events.push(event.clone());
    }
}

// ── Listener helpers ──────────────────────────────────────────

/// Listener that counts invocations and remembers the last state.
#[allow(dead_code)]
pub fn recording_listener<S: Copy + 'static>(
    seen: &Rc<RefCell<Vec<S>>>,
) -> pibot::status::Listener<S> {
    let seen = seen.clone();
    Box::new(move |s: &S| seen.borrow_mut().push(*s))
}
