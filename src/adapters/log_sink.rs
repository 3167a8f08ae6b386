//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured robot events through
//! the `log` facade (terminal in the stock binary).

use log::{info, warn};

use crate::app::events::RobotEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`RobotEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &RobotEvent) {
        match event {
            RobotEvent::Started => info!("START | controllers ready"),
            RobotEvent::SelfTestStarted => info!("TEST  | started"),
            RobotEvent::SelfTestStep { pulse_us } => info!("TEST  | servo sweep {}us", pulse_us),
            RobotEvent::SelfTestFinished => info!("TEST  | finished"),
            RobotEvent::DistanceReading { cm } => info!("ECHO  | {:.1} cm", cm),
            RobotEvent::SensorUnavailable => warn!("ECHO  | no sensor attached"),
            RobotEvent::ShutdownRequested { reason } => warn!("STOP  | reason={:?}", reason),
            RobotEvent::IdleSweepComplete { failures } => {
                if *failures == 0 {
                    info!("STOP  | all actuators idle");
                } else {
                    warn!("STOP  | idle sweep finished with {} failure(s)", failures);
                }
            }
        }
    }
}
