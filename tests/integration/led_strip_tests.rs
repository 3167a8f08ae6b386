//! Integration tests for the LED strip controller: rendering, listener
//! contract and flash timelines, against the mock strip.

use std::cell::RefCell;
use std::rc::Rc;

use pibot::config::{FlashConfig, LedConfig};
use pibot::drivers::led_strip::{pack, LedStatus, LedStripController};

use super::mock_hw::{recording_listener, HwCall, MockHardware, MockStrip};

fn make_led(leds: u16) -> (LedStripController<MockStrip>, MockHardware) {
    let hw = MockHardware::new();
    let cfg = LedConfig {
        number_of_leds: leds,
        ..LedConfig::default()
    };
    let led = LedStripController::new(hw.strip(), &cfg, FlashConfig::default()).unwrap();
    (led, hw)
}

/// Poll every millisecond over `range` and record `(t, color)` for each push.
fn timeline(
    led: &mut LedStripController<MockStrip>,
    hw: &MockHardware,
    range: std::ops::RangeInclusive<u64>,
) -> Vec<(u64, u32)> {
    let mut out = Vec::new();
    for t in range {
        let before = hw.log.renders().len();
        led.poll(t).unwrap();
        for color in &hw.log.renders()[before..] {
            out.push((t, *color));
        }
    }
    out
}

const BLUE: u32 = 0x00_00FF;
const RED: u32 = 0xFF_0000;

// ── Construction / render ─────────────────────────────────────

#[test]
fn construction_initialises_strip_once() {
    let (led, hw) = make_led(16);
    assert_eq!(hw.log.len(), 1);
    assert!(matches!(
        hw.log.calls()[0],
        HwCall::InitStrip { count: 16, .. }
    ));
    assert_eq!(led.pixel_count(), 16);
    assert_eq!(led.status(), LedStatus::default());
}

#[test]
fn render_updates_status_buffer_and_hardware() {
    let (mut led, hw) = make_led(8);
    led.render(10, 20, 30).unwrap();

    assert_eq!(
        led.status(),
        LedStatus {
            red: 10,
            green: 20,
            blue: 30
        }
    );
    assert!(led.pixels().iter().all(|&p| p == pack(10, 20, 30)));
    assert_eq!(
        hw.log.calls().last(),
        Some(&HwCall::Render {
            color: pack(10, 20, 30),
            len: 8
        })
    );
}

#[test]
fn failed_render_does_not_notify() {
    let (mut led, hw) = make_led(4);
    let seen = Rc::new(RefCell::new(Vec::new()));
    led.set_on_status_change(Some(recording_listener(&seen)));

    hw.faults.render.set(true);
    assert!(led.red().is_err());
    assert!(seen.borrow().is_empty());
    assert_eq!(led.status(), LedStatus::default());
}

// ── Listener contract ─────────────────────────────────────────

#[test]
fn listener_sees_only_later_renders() {
    let (mut led, _hw) = make_led(4);
    led.white().unwrap();
    led.off().unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    led.set_on_status_change(Some(recording_listener(&seen)));
    led.blue().unwrap();
    led.render(1, 2, 3).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].packed(), BLUE);
    assert_eq!(seen[1].packed(), pack(1, 2, 3));
}

#[test]
fn rejected_listener_keeps_previous() {
    let (mut led, _hw) = make_led(4);
    let seen = Rc::new(RefCell::new(Vec::new()));
    led.set_on_status_change(Some(recording_listener(&seen)));
    led.set_on_status_change(None);

    led.green().unwrap();
    assert_eq!(seen.borrow().len(), 1);
}

// ── Flash ─────────────────────────────────────────────────────

#[test]
fn flash_blue_toggles_then_forces_off() {
    let (mut led, hw) = make_led(4);
    assert!(led.flash(0, "blue", 500, 100).is_some());
    assert!(hw.log.renders().is_empty(), "flash must not block or render up front");

    let t = timeline(&mut led, &hw, 0..=1500);
    assert_eq!(
        t,
        vec![(100, BLUE), (200, 0), (300, BLUE), (400, 0), (500, 0)]
    );
    assert!(!led.is_flashing());
    assert_eq!(led.status(), LedStatus::default());
}

#[test]
fn flash_unsupported_color_is_a_noop() {
    let (mut led, hw) = make_led(4);
    led.render(7, 7, 7).unwrap();
    let calls = hw.log.len();

    assert!(led.flash(0, "purple", 500, 100).is_none());
    assert!(led.flash(0, "BLUE", 500, 100).is_none());
    assert!(led.flash(0, "Red", 500, 100).is_none());
    assert!(!led.is_flashing());
    assert!(timeline(&mut led, &hw, 0..=1000).is_empty());
    assert_eq!(hw.log.len(), calls);
    assert_eq!(led.status().packed(), pack(7, 7, 7));
}

#[test]
fn new_flash_cancels_the_one_in_flight() {
    let (mut led, hw) = make_led(4);
    led.flash(0, "red", 1000, 100).unwrap();
    let first = timeline(&mut led, &hw, 0..=250);
    assert_eq!(first, vec![(100, RED), (200, 0)]);

    led.flash(250, "blue", 300, 100).unwrap();
    let second = timeline(&mut led, &hw, 251..=2000);
    assert_eq!(
        second,
        vec![(350, BLUE), (450, 0), (550, 0)],
        "no red toggles and no stale stop at 1000ms"
    );
}

#[test]
fn cancel_flash_stops_toggles() {
    let (mut led, hw) = make_led(4);
    let handle = led.flash(0, "white", 2000, 100).unwrap();
    timeline(&mut led, &hw, 0..=150);

    assert!(led.cancel_flash(handle));
    assert!(!led.cancel_flash(handle), "handle is single-use");
    assert!(timeline(&mut led, &hw, 151..=3000).is_empty());
    assert_eq!(led.status().packed(), 0xFF_FFFF, "cancel leaves the strip as it is");
}

#[test]
fn stale_handle_does_not_cancel_newer_flash() {
    let (mut led, _hw) = make_led(4);
    let old = led.flash(0, "red", 1000, 100).unwrap();
    led.flash(0, "green", 1000, 100).unwrap();
    assert!(!led.cancel_flash(old));
    assert!(led.is_flashing());
}

#[test]
fn flash_notifies_on_every_toggle() {
    let (mut led, hw) = make_led(4);
    let seen = Rc::new(RefCell::new(Vec::new()));
    led.set_on_status_change(Some(recording_listener(&seen)));

    led.flash(0, "green", 300, 100).unwrap();
    timeline(&mut led, &hw, 0..=1000);

    let colors: Vec<u32> = seen.borrow().iter().map(|s: &LedStatus| s.packed()).collect();
    assert_eq!(colors, vec![0x00_FF00, 0, 0]);
}
