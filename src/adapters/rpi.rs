//! Raspberry Pi hardware backends on top of `rppal`.
//!
//! | Backend         | Implements       | Hardware                             |
//! |-----------------|------------------|--------------------------------------|
//! | `RpiGpio`       | GpioPort         | BCM GPIO, software PWM for servos    |
//! | `SpiStrip`      | StripPort        | WS2812 strip on SPI0 MOSI (BCM 10)   |
//! | `HBridgeMotors` | MotorPort        | dual H-bridge (L298N / SN754410)     |
//! | `Hcsr04`        | DistanceSensor   | HC-SR04 ultrasonic ranger            |
//!
//! Only compiled with `--features rpi` on Linux.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

use crate::app::ports::{DistanceSensor, GpioPort, Level, MotorPort, PinMode, StripOptions, StripPort};
use crate::config::SensorConfig;
use crate::drivers::ws2812;
use crate::error::{Error, GpioError, MotorError, Result, SensorError, StripError};
use crate::pins;

/// Speed of sound round trip: microseconds of echo per centimetre.
const US_PER_CM: f32 = 58.0;

// ── GPIO ──────────────────────────────────────────────────────

struct RpiGpioState {
    gpio: Option<Gpio>,
    outputs: HashMap<u8, OutputPin>,
    inputs: HashMap<u8, InputPin>,
}

/// Shared rppal GPIO backend.  Clones drive the same pin table.
#[derive(Clone)]
pub struct RpiGpio {
    state: Rc<RefCell<RpiGpioState>>,
}

impl RpiGpio {
    pub fn new() -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| {
            warn!("RpiGpio: cannot open GPIO: {e}");
            Error::Init("GPIO backend unavailable")
        })?;
        info!("RpiGpio: GPIO backend initialised");
        Ok(Self {
            state: Rc::new(RefCell::new(RpiGpioState {
                gpio: Some(gpio),
                outputs: HashMap::new(),
                inputs: HashMap::new(),
            })),
        })
    }
}

impl GpioPort for RpiGpio {
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        let mut s = self.state.borrow_mut();
        let handle = s
            .gpio
            .as_ref()
            .ok_or(GpioError::SetModeFailed)?
            .get(pin)
            .map_err(|e| {
                warn!("RpiGpio: GPIO{} unavailable: {e}", pin);
                GpioError::PinUnavailable
            })?;
        match mode {
            PinMode::Output => {
                s.inputs.remove(&pin);
                s.outputs.insert(pin, handle.into_output_low());
            }
            PinMode::Input => {
                s.outputs.remove(&pin);
                s.inputs.insert(pin, handle.into_input());
            }
        }
        debug!("RpiGpio: GPIO{} mode {:?}", pin, mode);
        Ok(())
    }

    fn digital_write(&mut self, pin: u8, level: Level) -> Result<()> {
        let mut s = self.state.borrow_mut();
        let out = s.outputs.get_mut(&pin).ok_or(GpioError::PinUnavailable)?;
        match level {
            Level::High => out.set_high(),
            Level::Low => out.set_low(),
        }
        Ok(())
    }

    fn servo_write(&mut self, pin: u8, pulse_width_us: u16) -> Result<()> {
        let mut s = self.state.borrow_mut();
        let out = s.outputs.get_mut(&pin).ok_or(GpioError::PinUnavailable)?;
        out.set_pwm(
            Duration::from_micros(u64::from(pins::SERVO_PERIOD_US)),
            Duration::from_micros(u64::from(pulse_width_us)),
        )
        .map_err(|e| {
            warn!("RpiGpio: servo write on GPIO{} failed: {e}", pin);
            GpioError::ServoWriteFailed
        })?;
        Ok(())
    }

    fn terminate(&mut self) {
        let mut s = self.state.borrow_mut();
        for (pin, out) in &mut s.outputs {
            if let Err(e) = out.clear_pwm() {
                warn!("RpiGpio: clearing PWM on GPIO{} failed: {e}", pin);
            }
            out.set_low();
        }
        s.outputs.clear();
        s.inputs.clear();
        if s.gpio.take().is_some() {
            info!("RpiGpio: terminated");
        }
    }
}

// ── LED strip ─────────────────────────────────────────────────

/// WS2812 strip driven from SPI0 with the 3-bit encoding in
/// [`ws2812`].
#[derive(Default)]
pub struct SpiStrip {
    spi: Option<Spi>,
    count: usize,
    frame: Vec<u8>,
}

impl SpiStrip {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StripPort for SpiStrip {
    fn init_strip(&mut self, count: u16, options: StripOptions) -> Result<()> {
        if options.gpio != pins::LED_STRIP_GPIO {
            return Err(Error::Init("SPI strip backend can only drive BCM 10"));
        }
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, ws2812::SPI_CLOCK_HZ, Mode::Mode0)
            .map_err(|e| {
                warn!("SpiStrip: cannot open SPI0: {e}");
                StripError::InitFailed
            })?;
        info!(
            "SpiStrip: {} pixels on SPI0 (dma channel {} not used by this backend)",
            count, options.dma
        );
        self.spi = Some(spi);
        self.count = usize::from(count);
        self.frame = Vec::with_capacity(ws2812::frame_len(self.count));
        Ok(())
    }

    fn render(&mut self, pixels: &[u32]) -> Result<()> {
        if pixels.len() != self.count {
            return Err(StripError::BufferSizeMismatch.into());
        }
        let spi = self.spi.as_mut().ok_or(StripError::RenderFailed)?;
        ws2812::encode_into(pixels, &mut self.frame);
        spi.write(&self.frame).map_err(|e| {
            warn!("SpiStrip: SPI write failed: {e}");
            StripError::RenderFailed
        })?;
        Ok(())
    }
}

// ── Motors ────────────────────────────────────────────────────

/// Controller settle time after enabling the bridge.
const MOTOR_SETTLE: Duration = Duration::from_millis(50);

struct Channel {
    enable: OutputPin,
    in1: OutputPin,
    in2: OutputPin,
}

impl Channel {
    fn new(gpio: &Gpio, enable: u8, in1: u8, in2: u8) -> Result<Self> {
        let out = |pin: u8| -> Result<OutputPin> {
            Ok(gpio
                .get(pin)
                .map_err(|e| {
                    warn!("HBridgeMotors: GPIO{} unavailable: {e}", pin);
                    MotorError::InitFailed
                })?
                .into_output_low())
        };
        Ok(Self {
            enable: out(enable)?,
            in1: out(in1)?,
            in2: out(in2)?,
        })
    }

    fn coast(&mut self) {
        self.in1.set_low();
        self.in2.set_low();
    }
}

/// Two DC drive motors behind a dual H-bridge.
pub struct HBridgeMotors {
    left: Channel,
    right: Channel,
}

impl HBridgeMotors {
    pub fn new() -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| {
            warn!("HBridgeMotors: cannot open GPIO: {e}");
            MotorError::InitFailed
        })?;
        Ok(Self {
            left: Channel::new(
                &gpio,
                pins::MOTOR_LEFT_ENABLE_GPIO,
                pins::MOTOR_LEFT_IN1_GPIO,
                pins::MOTOR_LEFT_IN2_GPIO,
            )?,
            right: Channel::new(
                &gpio,
                pins::MOTOR_RIGHT_ENABLE_GPIO,
                pins::MOTOR_RIGHT_IN1_GPIO,
                pins::MOTOR_RIGHT_IN2_GPIO,
            )?,
        })
    }
}

impl MotorPort for HBridgeMotors {
    async fn initialize_controller(&mut self) -> Result<()> {
        for ch in [&mut self.left, &mut self.right] {
            ch.coast();
            ch.enable.set_high();
        }
        async_io_mini::Timer::after(MOTOR_SETTLE).await;
        info!("HBridgeMotors: bridge enabled");
        Ok(())
    }

    async fn stop_all_motors(&mut self) -> Result<()> {
        for ch in [&mut self.left, &mut self.right] {
            ch.coast();
            ch.enable.set_low();
        }
        info!("HBridgeMotors: all motors stopped");
        Ok(())
    }
}

// ── Distance sensor ───────────────────────────────────────────

/// HC-SR04 ultrasonic ranger.
pub struct Hcsr04 {
    trigger: OutputPin,
    echo: InputPin,
    timeout: Duration,
}

impl Hcsr04 {
    pub fn new(config: &SensorConfig) -> Result<Self> {
        let gpio = Gpio::new().map_err(|_| Error::Init("GPIO backend unavailable"))?;
        let trigger = gpio
            .get(config.trigger_gpio)
            .map_err(|_| GpioError::PinUnavailable)?
            .into_output_low();
        let echo = gpio
            .get(config.echo_gpio)
            .map_err(|_| GpioError::PinUnavailable)?
            .into_input();
        Ok(Self {
            trigger,
            echo,
            timeout: Duration::from_micros(u64::from(config.echo_timeout_us)),
        })
    }

    /// Spin until the echo line reaches `high`, or time out.
    fn wait_for(&self, high: bool, since: Instant) -> Result<Instant> {
        while self.echo.is_high() != high {
            if since.elapsed() > self.timeout {
                return Err(SensorError::Timeout.into());
            }
        }
        Ok(Instant::now())
    }
}

impl DistanceSensor for Hcsr04 {
    fn read_cm(&mut self) -> Result<f32> {
        self.trigger.set_high();
        std::thread::sleep(Duration::from_micros(10));
        self.trigger.set_low();

        let rise = self.wait_for(true, Instant::now())?;
        let fall = self.wait_for(false, rise)?;
        Ok(fall.duration_since(rise).as_micros() as f32 / US_PER_CM)
    }
}
