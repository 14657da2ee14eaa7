//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART in production).  One tagged line per event.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::ConditionRaised { indicator, at_ms } => {
                warn!("FIRE | {} raised at {}ms", indicator, at_ms);
            }
            AppEvent::ConditionCleared { indicator } => {
                info!("FIRE | {} cleared, interrupt re-armed", indicator);
            }
            AppEvent::CommandDropped { indicator, error } => {
                warn!("LED | {} command dropped: {}", indicator, error);
            }
            AppEvent::ProbeSucceeded {
                successes,
                failures,
            } => {
                info!("PROBE | ok | successes={} failures={}", successes, failures);
            }
            AppEvent::ProbeFailed {
                reason,
                successes,
                failures,
                retry_secs,
            } => {
                warn!(
                    "PROBE | {} | successes={} failures={} | retry in {}s",
                    reason, successes, failures, retry_secs
                );
            }
        }
    }
}
