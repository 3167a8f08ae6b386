//! Active buzzer driver.
//!
//! Generic over [`embedded_hal::digital::OutputPin`] so it runs on any
//! HAL.  [`GpioOutput`] bridges one pin of a [`GpioPort`] backend into
//! that trait.

use embedded_hal::digital::{ErrorType, OutputPin};
use log::debug;

use crate::app::ports::{GpioPort, Level, PinMode};
use crate::error::{Error, Result};

/// One output pin of a [`GpioPort`] backend, as an `embedded_hal` pin.
pub struct GpioOutput<G: GpioPort> {
    gpio: G,
    pin: u8,
}

impl<G: GpioPort> GpioOutput<G> {
    /// Claim `pin` as an output.
    pub fn new(mut gpio: G, pin: u8) -> Result<Self> {
        gpio.set_mode(pin, PinMode::Output)?;
        Ok(Self { gpio, pin })
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl<G: GpioPort> ErrorType for GpioOutput<G> {
    type Error = Error;
}

impl<G: GpioPort> OutputPin for GpioOutput<G> {
    fn set_low(&mut self) -> Result<()> {
        self.gpio.digital_write(self.pin, Level::Low)
    }

    fn set_high(&mut self) -> Result<()> {
        self.gpio.digital_write(self.pin, Level::High)
    }
}

pub struct Buzzer<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Buzzer<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn on(&mut self) -> core::result::Result<(), P::Error> {
        self.pin.set_high()?;
        self.on = true;
        debug!("[BUZZER] on");
        Ok(())
    }

    pub fn off(&mut self) -> core::result::Result<(), P::Error> {
        self.pin.set_low()?;
        self.on = false;
        debug!("[BUZZER] off");
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
