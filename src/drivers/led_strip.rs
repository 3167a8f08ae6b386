//! Addressable LED strip controller.
//!
//! Owns the pixel buffer and the strip's current color.  The strip is
//! always rendered as one solid color: after every successful
//! [`render`](LedStripController::render) each slot of the buffer holds
//! the current color packed as `0xRRGGBB`.
//!
//! ## Flash sequences
//!
//! [`flash`](LedStripController::flash) returns immediately.  It arms two
//! timers on the controller's [`TimerSet`]: a one-shot stop at
//! `now + flashing_time` and a periodic toggle at `flashing_interval`.
//! The owner drives them by calling [`poll`](LedStripController::poll)
//! from the main loop.
//!
//! ```text
//!  t(ms)   0    100   200   300   400   500
//!          │     │     │     │     │     │
//!  strip   ·   color  off  color  off   off (stop, toggle cancelled)
//! ```
//!
//! The stop timer is armed first, so when both land on the same
//! millisecond the stop wins and no toggle follows it.  Starting a new
//! flash cancels the one in flight.

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::app::ports::{StripOptions, StripPort};
use crate::config::{FlashConfig, LedConfig};
use crate::error::{Error, Result};
use crate::scheduler::{TimerId, TimerSet};
use crate::status::{Listener, StatusChannel};

/// Color as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Pack a color into the strip's per-pixel representation.
pub const fn pack(red: u8, green: u8, blue: u8) -> u32 {
    ((red as u32) << 16) | ((green as u32) << 8) | blue as u32
}

/// Last rendered color, as reported to status listeners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedStatus {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl LedStatus {
    pub const fn packed(self) -> u32 {
        pack(self.red, self.green, self.blue)
    }
}

/// Colors a flash sequence can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashColor {
    Red,
    Green,
    Blue,
    White,
}

impl FlashColor {
    /// Exact lookup by lowercase name.
    pub fn parse(name: &str) -> Option<Self> {
        [Self::Red, Self::Green, Self::Blue, Self::White]
            .into_iter()
            .find(|c| c.name() == name)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::White => "white",
        }
    }

    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Red => (255, 0, 0),
            Self::Green => (0, 255, 0),
            Self::Blue => (0, 0, 255),
            Self::White => (255, 255, 255),
        }
    }
}

/// Cancellation handle for one flash sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashHandle(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlashTimer {
    Toggle,
    Stop,
}

#[derive(Debug)]
struct ActiveFlash {
    handle: FlashHandle,
    color: FlashColor,
    /// `true` while in the color phase.
    lit: bool,
    toggle: TimerId,
}

pub struct LedStripController<D: StripPort> {
    strip: D,
    pixels: Vec<u32>,
    current: LedStatus,
    status: StatusChannel<LedStatus>,
    timers: TimerSet<FlashTimer, 2>,
    flash: Option<ActiveFlash>,
    next_flash: u32,
    defaults: FlashConfig,
}

impl<D: StripPort> LedStripController<D> {
    /// Initialise the strip hardware once and allocate the pixel buffer.
    pub fn new(mut strip: D, led: &LedConfig, defaults: FlashConfig) -> Result<Self> {
        if led.number_of_leds == 0 {
            return Err(Error::Config("led strip needs at least one pixel"));
        }
        strip.init_strip(
            led.number_of_leds,
            StripOptions {
                dma: led.dma,
                gpio: led.gpio,
            },
        )?;
        info!(
            "[LED] strip ready: {} pixels, dma={}, gpio={}",
            led.number_of_leds, led.dma, led.gpio
        );

        Ok(Self {
            strip,
            pixels: vec![0; usize::from(led.number_of_leds)],
            current: LedStatus::default(),
            status: StatusChannel::new("LED"),
            timers: TimerSet::new(),
            flash: None,
            next_flash: 0,
            defaults,
        })
    }

    // ── Rendering ─────────────────────────────────────────────

    /// Fill the strip with one color and push it to hardware.
    ///
    /// On success the current color is updated and the status listener
    /// is notified.  If the push fails the buffer is restored to the
    /// previous color and no notification is sent.
    pub fn render(&mut self, red: u8, green: u8, blue: u8) -> Result<()> {
        self.pixels.fill(pack(red, green, blue));
        if let Err(e) = self.strip.render(&self.pixels) {
            self.pixels.fill(self.current.packed());
            return Err(e);
        }
        self.current = LedStatus { red, green, blue };
        debug!("[LED] render r={} g={} b={}", red, green, blue);
        self.status.notify(&self.current);
        Ok(())
    }

    pub fn red(&mut self) -> Result<()> {
        self.render_rgb(FlashColor::Red.rgb())
    }

    pub fn green(&mut self) -> Result<()> {
        self.render_rgb(FlashColor::Green.rgb())
    }

    pub fn blue(&mut self) -> Result<()> {
        self.render_rgb(FlashColor::Blue.rgb())
    }

    pub fn white(&mut self) -> Result<()> {
        self.render_rgb(FlashColor::White.rgb())
    }

    pub fn off(&mut self) -> Result<()> {
        self.render(0, 0, 0)
    }

    fn render_rgb(&mut self, (r, g, b): Rgb) -> Result<()> {
        self.render(r, g, b)
    }

    // ── Flash sequences ───────────────────────────────────────

    /// Start a flash sequence of the named color.
    ///
    /// Unsupported names are logged and ignored: no writes, no timers,
    /// `None` returned.  Any flash already running is cancelled first.
    pub fn flash(
        &mut self,
        now_ms: u64,
        color_name: &str,
        flashing_time_ms: u32,
        flashing_interval_ms: u32,
    ) -> Option<FlashHandle> {
        let Some(color) = FlashColor::parse(color_name) else {
            error!("[LED] not supported color '{}'", color_name);
            return None;
        };
        self.start_flash(now_ms, color, flashing_time_ms, flashing_interval_ms)
    }

    /// Flash with the configured default color, duration and interval.
    pub fn flash_default(&mut self, now_ms: u64) -> Option<FlashHandle> {
        let d = self.defaults.clone();
        self.start_flash(now_ms, d.color, d.flashing_time_ms, d.flashing_interval_ms)
    }

    fn start_flash(
        &mut self,
        now_ms: u64,
        color: FlashColor,
        flashing_time_ms: u32,
        flashing_interval_ms: u32,
    ) -> Option<FlashHandle> {
        self.stop_flash();

        // Stop first: it must win a tie with the last toggle.
        let stop = self.timers.after(now_ms, flashing_time_ms, FlashTimer::Stop)?;
        let Some(toggle) = self.timers.every(now_ms, flashing_interval_ms, FlashTimer::Toggle) else {
            self.timers.cancel(stop);
            return None;
        };

        let handle = FlashHandle(self.next_flash);
        self.next_flash = self.next_flash.wrapping_add(1);
        self.flash = Some(ActiveFlash {
            handle,
            color,
            lit: false,
            toggle,
        });
        info!(
            "[LED] flashing {} for {}ms every {}ms",
            color.name(),
            flashing_time_ms,
            flashing_interval_ms
        );
        Some(handle)
    }

    /// Cancel the sequence behind `handle` if it is still the active one.
    /// The strip keeps whatever color it was showing.
    pub fn cancel_flash(&mut self, handle: FlashHandle) -> bool {
        match &self.flash {
            Some(f) if f.handle == handle => self.stop_flash(),
            _ => false,
        }
    }

    /// Cancel whatever sequence is running.
    pub fn stop_flash(&mut self) -> bool {
        self.timers.clear();
        match self.flash.take() {
            Some(f) => {
                debug!("[LED] flash {:?} cancelled", f.handle);
                true
            }
            None => false,
        }
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }

    /// Run every flash timer due at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Result<()> {
        while let Some((_, timer)) = self.timers.pop_due(now_ms) {
            match timer {
                FlashTimer::Toggle => {
                    let Some(flash) = &self.flash else { continue };
                    let lit = !flash.lit;
                    let color = flash.color;
                    if lit {
                        self.render_rgb(color.rgb())?;
                    } else {
                        self.off()?;
                    }
                    if let Some(flash) = &mut self.flash {
                        flash.lit = lit;
                    }
                }
                FlashTimer::Stop => {
                    if let Some(flash) = self.flash.take() {
                        self.timers.cancel(flash.toggle);
                    }
                    self.off()?;
                    debug!("[LED] flash finished");
                }
            }
        }
        Ok(())
    }

    // ── Queries / listeners ───────────────────────────────────

    pub fn status(&self) -> LedStatus {
        self.current
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Replace the status listener.  `None` is rejected and logged.
    pub fn set_on_status_change(&mut self, listener: Option<Listener<LedStatus>>) {
        self.status.set(listener);
    }
}
