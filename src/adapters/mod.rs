//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements                       | Connects to              |
//! |---------------|----------------------------------|--------------------------|
//! | `config_file` | ConfigSource                     | JSON file / defaults     |
//! | `log_sink`    | EventSink                        | `log` facade             |
//! | `rpi`         | GpioPort, StripPort, MotorPort,  | rppal GPIO + SPI         |
//! |               | DistanceSensor                   |                          |
//! | `sim`         | GpioPort, StripPort, MotorPort,  | in-memory state          |
//! |               | DistanceSensor                   |                          |
//! | `time`        | Clock                            | `std::time::Instant`     |

pub mod config_file;
pub mod log_sink;
#[cfg(all(feature = "rpi", target_os = "linux"))]
pub mod rpi;
pub mod sim;
pub mod time;
