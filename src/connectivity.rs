//! Connectivity watchdog.
//!
//! Periodically runs a reachability probe and reflects the outcome on the
//! SIM indicator: `On` after a successful probe, `Blink` after a failed one.
//! Exactly one LED command is enqueued per probe.  The watchdog never
//! touches the LED manager directly.
//!
//! ## Retry policy
//!
//! The delay before the next probe depends on where the last one failed:
//!
//! | Outcome         | Base delay |
//! |-----------------|------------|
//! | success         | 5 s        |
//! | DNS failure     | 5 s        |
//! | connect failure | 10 s       |
//! | send / read     | 5 s        |
//!
//! Consecutive failures double the base delay (5 s → 10 s → 20 s …),
//! capped at 60 s.  A success resets the streak.

use core::fmt;
use core::time::Duration;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, ProbePort};
use crate::channels::CommandSink;
use crate::config::NodeConfig;
use crate::led::{LedCommand, LedId};

/// Stage at which a reachability probe failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// Host name did not resolve.
    DnsFailed,
    /// No resolved address accepted a TCP connection.
    ConnectFailed,
    /// Request could not be written.
    SendFailed,
    /// Response read failed or timed out before the peer closed.
    ReadFailed,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DnsFailed => write!(f, "DNS lookup failed"),
            Self::ConnectFailed => write!(f, "socket connect failed"),
            Self::SendFailed => write!(f, "socket send failed"),
            Self::ReadFailed => write!(f, "socket receive failed"),
        }
    }
}

impl core::error::Error for ProbeError {}

/// Probe cadence and per-stage retry delays, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub success_secs: u32,
    pub dns_secs: u32,
    pub connect_secs: u32,
    pub io_secs: u32,
    pub max_secs: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &NodeConfig) -> Self {
        Self {
            success_secs: config.probe_interval_secs,
            dns_secs: config.dns_retry_secs,
            connect_secs: config.connect_retry_secs,
            io_secs: config.io_retry_secs,
            max_secs: config.max_backoff_secs,
        }
    }

    /// Delay after the `streak`-th consecutive failure (1-based).
    pub fn failure_delay(&self, reason: ProbeError, streak: u32) -> u32 {
        let base = match reason {
            ProbeError::DnsFailed => self.dns_secs,
            ProbeError::ConnectFailed => self.connect_secs,
            ProbeError::SendFailed | ProbeError::ReadFailed => self.io_secs,
        };
        let shift = streak.saturating_sub(1).min(31);
        base.checked_shl(shift)
            .filter(|d| *d >> shift == base)
            .unwrap_or(self.max_secs)
            .min(self.max_secs)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&NodeConfig::default())
    }
}

pub struct ConnectivityWatchdog<P: ProbePort> {
    probe: P,
    indicator: LedId,
    fail_blink_ms: u32,
    policy: RetryPolicy,
    successes: u32,
    failures: u32,
    streak: u32,
}

impl<P: ProbePort> ConnectivityWatchdog<P> {
    pub fn new(probe: P, config: &NodeConfig) -> Self {
        Self {
            probe,
            indicator: LedId::Sim,
            fail_blink_ms: config.probe_fail_blink_ms,
            policy: RetryPolicy::from_config(config),
            successes: 0,
            failures: 0,
            streak: 0,
        }
    }

    /// Run one probe, enqueue one LED command and report the outcome.
    /// Returns how long to wait before the next call.
    pub fn run_once(&mut self, sink: &impl CommandSink, events: &mut impl EventSink) -> Duration {
        let (cmd, delay_secs) = match self.probe.probe() {
            Ok(()) => {
                self.successes = self.successes.wrapping_add(1);
                self.streak = 0;
                info!(
                    "PROBE: ok (successes={} failures={})",
                    self.successes, self.failures
                );
                events.emit(&AppEvent::ProbeSucceeded {
                    successes: self.successes,
                    failures: self.failures,
                });
                (LedCommand::on(self.indicator), self.policy.success_secs)
            }
            Err(reason) => {
                self.failures = self.failures.wrapping_add(1);
                self.streak = self.streak.saturating_add(1);
                let retry_secs = self.policy.failure_delay(reason, self.streak);
                warn!(
                    "PROBE: {} (successes={} failures={}), retry in {}s",
                    reason, self.successes, self.failures, retry_secs
                );
                events.emit(&AppEvent::ProbeFailed {
                    reason,
                    successes: self.successes,
                    failures: self.failures,
                    retry_secs,
                });
                (
                    LedCommand::blink(self.indicator, self.fail_blink_ms),
                    retry_secs,
                )
            }
        };

        if let Err(error) = sink.send(cmd) {
            warn!("PROBE: {} command dropped: {}", self.indicator, error);
            events.emit(&AppEvent::CommandDropped {
                indicator: self.indicator,
                error,
            });
        }
        Duration::from_secs(delay_secs as u64)
    }

    pub fn successes(&self) -> u32 {
        self.successes
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}
