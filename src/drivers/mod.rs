//! Actuator controllers and peripheral helpers.

pub mod buzzer;
pub mod led_strip;
pub mod servo_cam;
pub mod ws2812;
