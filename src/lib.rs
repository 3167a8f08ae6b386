//! Actuator control layer for a Raspberry Pi robot.
//!
//! Exposes the controllers, the orchestration service and the hardware
//! adapters for the binary and for integration testing.  Raspberry Pi
//! backends are behind the `rpi` feature; everything else runs on any
//! host.

#![deny(unused_must_use)]

// Registers the std time driver behind `async_io_mini::Timer`.
use embassy_time as _;

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod scheduler;
pub mod status;

pub mod adapters;
pub mod drivers;
