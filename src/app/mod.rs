//! Application core: orchestration logic, zero direct I/O.
//!
//! The [`service::Robot`] composes the LED strip and servo controllers
//! with the buzzer, motor driver and distance sensor, and runs the
//! self-test and the idle sweep.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer
//! testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
