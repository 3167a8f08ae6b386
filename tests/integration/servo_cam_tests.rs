//! Integration tests for the camera servo controller against the mock GPIO.

use std::cell::RefCell;
use std::rc::Rc;

use pibot::app::ports::PinMode;
use pibot::config::ServoConfig;
use pibot::drivers::servo_cam::{ServoCam, ServoStatus};

use super::mock_hw::{recording_listener, HwCall, MockGpio, MockHardware};

fn make_cam() -> (ServoCam<MockGpio>, MockHardware) {
    let hw = MockHardware::new();
    let cam = ServoCam::new(hw.gpio(), &ServoConfig::default()).unwrap();
    (cam, hw)
}

fn status(horizontal: u16, vertical: u16) -> ServoStatus {
    ServoStatus {
        horizontal,
        vertical,
    }
}

#[test]
fn construction_claims_pins_then_centres() {
    let (cam, hw) = make_cam();
    assert_eq!(
        hw.log.calls(),
        vec![
            HwCall::SetMode {
                pin: 7,
                mode: PinMode::Output
            },
            HwCall::SetMode {
                pin: 6,
                mode: PinMode::Output
            },
            HwCall::ServoWrite {
                pin: 7,
                pulse_us: 1500
            },
            HwCall::ServoWrite {
                pin: 6,
                pulse_us: 1500
            },
        ]
    );
    assert_eq!(cam.status(), status(1500, 1500));
}

#[test]
fn relative_move_clamps_per_axis() {
    let (mut cam, hw) = make_cam();
    hw.log.clear();

    let s = cam.move_by(1200, -50).unwrap();
    assert_eq!(s, status(2500, 1450));
    assert_eq!(cam.status(), s);
    assert_eq!(hw.log.servo_writes(), vec![(7, 2500), (6, 1450)]);
}

#[test]
fn absolute_move_clamps_low_and_high() {
    let (mut cam, _hw) = make_cam();
    assert_eq!(cam.absolute_position(0, 9_999).unwrap(), status(500, 2500));
    assert_eq!(cam.absolute_position(-1, 501).unwrap(), status(500, 501));
}

#[test]
fn same_position_still_writes_and_notifies() {
    let (mut cam, hw) = make_cam();
    let seen = Rc::new(RefCell::new(Vec::new()));
    cam.set_on_status_change(Some(recording_listener(&seen)));
    hw.log.clear();

    cam.absolute_position(1500, 1500).unwrap();
    cam.move_by(0, 0).unwrap();

    assert_eq!(hw.log.servo_writes().len(), 4);
    assert_eq!(*seen.borrow(), vec![status(1500, 1500); 2]);
}

#[test]
fn listener_sees_every_committed_move() {
    let (mut cam, _hw) = make_cam();
    let seen = Rc::new(RefCell::new(Vec::new()));
    cam.set_on_status_change(Some(recording_listener(&seen)));

    cam.move_by(100, 100).unwrap();
    cam.move_by(-300, 0).unwrap();
    cam.absolute_position(2000, 1000).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![status(1600, 1600), status(1300, 1600), status(2000, 1000)]
    );
}

#[test]
fn rejected_listener_keeps_previous() {
    let (mut cam, _hw) = make_cam();
    let seen = Rc::new(RefCell::new(Vec::new()));
    cam.set_on_status_change(Some(recording_listener(&seen)));
    cam.set_on_status_change(None);

    cam.move_by(10, 10).unwrap();
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn terminate_drops_listener_without_writes() {
    let (mut cam, hw) = make_cam();
    let seen = Rc::new(RefCell::new(Vec::new()));
    cam.set_on_status_change(Some(recording_listener(&seen)));
    hw.log.clear();

    cam.terminate();
    assert!(hw.log.calls().is_empty());

    cam.move_by(10, 0).unwrap();
    assert!(seen.borrow().is_empty());
    assert_eq!(cam.status(), status(1510, 1500));
}

#[test]
fn failed_write_keeps_position_and_skips_listener() {
    let (mut cam, hw) = make_cam();
    let seen = Rc::new(RefCell::new(Vec::new()));
    cam.set_on_status_change(Some(recording_listener(&seen)));

    hw.faults.servo_write.set(true);
    assert!(cam.move_by(200, 200).is_err());
    assert_eq!(cam.status(), status(1500, 1500));
    assert!(seen.borrow().is_empty());

    hw.faults.servo_write.set(false);
    assert_eq!(cam.move_by(200, 200).unwrap(), status(1700, 1700));
}

#[test]
fn failed_vertical_write_keeps_horizontal_in_sync() {
    let (mut cam, hw) = make_cam();
    let seen = Rc::new(RefCell::new(Vec::new()));
    cam.set_on_status_change(Some(recording_listener(&seen)));
    hw.log.clear();

    hw.faults.servo_pin.set(Some(6));
    assert!(cam.move_by(1000, 1000).is_err());
    assert_eq!(hw.log.servo_writes(), vec![(7, 2500)]);
    assert_eq!(cam.status(), status(2500, 1500));
    assert!(seen.borrow().is_empty());

    hw.faults.servo_pin.set(None);
    assert_eq!(cam.move_by(-500, 100).unwrap(), status(2000, 1600));
}

#[test]
fn custom_pins_are_honoured() {
    let hw = MockHardware::new();
    let cfg = ServoConfig {
        h_servo_gpio: 18,
        v_servo_gpio: 19,
    };
    let mut cam = ServoCam::new(hw.gpio(), &cfg).unwrap();
    cam.move_by(-100, 100).unwrap();
    assert_eq!(
        hw.log.servo_writes(),
        vec![(18, 1500), (19, 1500), (18, 1400), (19, 1600)]
    );
}
