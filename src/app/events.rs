//! Outbound robot events.
//!
//! The [`Robot`](super::service::Robot) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; the stock one logs them.

/// Structured events emitted by the orchestration layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RobotEvent {
    /// Controllers are built and centred.
    Started,

    /// Hardware self-test began (LED white, buzzer on).
    SelfTestStarted,

    /// One servo sweep step was written to both axes.
    SelfTestStep { pulse_us: u16 },

    /// Self-test finished and actuators were returned to idle.
    SelfTestFinished,

    /// Distance sensor reading.
    DistanceReading { cm: f32 },

    /// A distance read was requested but no sensor is attached.
    SensorUnavailable,

    /// The idle sweep is about to run.
    ShutdownRequested { reason: ShutdownReason },

    /// The idle sweep ran; `failures` steps reported an error.
    IdleSweepComplete { failures: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl-C.
    Interrupted,
    /// Startup or the self-test failed.
    Failure,
}
