//! Outbound application events.
//!
//! The event monitor and connectivity watchdog emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, forward upstream, etc.

use crate::connectivity::ProbeError;
use crate::error::Error;
use crate::led::LedId;

/// Structured events emitted by the indicator core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A debounced edge raised the monitored condition.
    ConditionRaised { indicator: LedId, at_ms: u32 },

    /// The monitored input read back inactive; indicator released.
    ConditionCleared { indicator: LedId },

    /// A producer could not enqueue an LED command.
    CommandDropped { indicator: LedId, error: Error },

    /// Reachability probe completed successfully.
    ProbeSucceeded { successes: u32, failures: u32 },

    /// Reachability probe failed; next attempt after `retry_secs`.
    ProbeFailed {
        reason: ProbeError,
        successes: u32,
        failures: u32,
        retry_secs: u32,
    },
}
