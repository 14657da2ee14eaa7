//! System configuration parameters
//!
//! All tunable parameters for the FireNode indicator core and its
//! connectivity watchdog.  Defaults reproduce the field-proven timing of
//! the first hardware revision; a JSON document can override them.

use core::time::Duration;

use heapless::String;
use serde::{Deserialize, Serialize};

/// Capacity of the ISR → monitor timestamp ring.  Must be a power of two.
pub const EDGE_QUEUE_DEPTH: usize = 8;

/// Capacity of the LED command channel.
pub const LED_CMD_DEPTH: usize = 8;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    // --- Event monitor ---
    /// Minimum spacing between two accepted edges (milliseconds)
    pub debounce_ms: u32,
    /// Blink interval of the alarm LED while the condition is active
    pub alarm_blink_ms: u32,
    /// Bounded wait on the edge channel before polling the input level
    pub monitor_wait_ms: u32,
    /// Sleep slice at the end of every monitor iteration
    pub monitor_slice_ms: u32,

    // --- LED manager ---
    /// LED manager loop slice; bounds blink-phase jitter
    pub led_slice_ms: u32,

    // --- Connectivity probe ---
    /// Host name probed for reachability
    pub probe_host: String<64>,
    /// TCP port of the probe target
    pub probe_port: u16,
    /// HTTP path requested from the probe target
    pub probe_path: String<64>,
    /// Socket connect / read timeout (milliseconds)
    pub probe_timeout_ms: u32,
    /// Whole-response deadline, measured from connect (milliseconds)
    pub probe_deadline_ms: u32,
    /// Blink interval of the status LED after a failed probe
    pub probe_fail_blink_ms: u32,

    // --- Probe retry timing ---
    /// Delay after a successful probe (seconds)
    pub probe_interval_secs: u32,
    /// Retry delay after a name-resolution failure (seconds)
    pub dns_retry_secs: u32,
    /// Retry delay after a TCP connect failure (seconds)
    pub connect_retry_secs: u32,
    /// Retry delay after a send/receive failure (seconds)
    pub io_retry_secs: u32,
    /// Upper bound on the backed-off retry delay (seconds)
    pub max_backoff_secs: u32,
}

/// Errors from [`NodeConfig::validate`] and [`NodeConfig::from_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Document is not valid JSON for this schema.
    Malformed,
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config document"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Malformed => Self::Config("malformed config document"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            // Event monitor
            debounce_ms: 200,
            alarm_blink_ms: 200,
            monitor_wait_ms: 100,
            monitor_slice_ms: 100,

            // LED manager
            led_slice_ms: 10,

            // Connectivity probe
            probe_host: fixed("httpbin.org"),
            probe_port: 80,
            probe_path: fixed("/get"),
            probe_timeout_ms: 5_000,
            probe_deadline_ms: 15_000,
            probe_fail_blink_ms: 250,

            // Retry timing
            probe_interval_secs: 5,
            dns_retry_secs: 5,
            connect_retry_secs: 10,
            io_retry_secs: 5,
            max_backoff_secs: 60,
        }
    }
}

impl NodeConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall a loop or make the probe meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::ValidationFailed("debounce_ms must be > 0"));
        }
        if self.monitor_wait_ms == 0 || self.monitor_slice_ms == 0 {
            return Err(ConfigError::ValidationFailed("monitor cadence must be > 0"));
        }
        if self.led_slice_ms == 0 {
            return Err(ConfigError::ValidationFailed("led_slice_ms must be > 0"));
        }
        if self.probe_host.is_empty() {
            return Err(ConfigError::ValidationFailed("probe_host is empty"));
        }
        if !self.probe_path.starts_with('/') {
            return Err(ConfigError::ValidationFailed("probe_path must start with '/'"));
        }
        if self.probe_timeout_ms == 0 || self.probe_deadline_ms < self.probe_timeout_ms {
            return Err(ConfigError::ValidationFailed(
                "probe_deadline_ms must be >= probe_timeout_ms > 0",
            ));
        }
        if self.probe_interval_secs == 0 || self.max_backoff_secs == 0 {
            return Err(ConfigError::ValidationFailed("probe timing must be > 0"));
        }
        Ok(())
    }

    pub fn led_slice(&self) -> Duration {
        Duration::from_millis(self.led_slice_ms as u64)
    }

    pub fn monitor_wait(&self) -> Duration {
        Duration::from_millis(self.monitor_wait_ms as u64)
    }

    pub fn monitor_slice(&self) -> Duration {
        Duration::from_millis(self.monitor_slice_ms as u64)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms as u64)
    }

    pub fn probe_deadline(&self) -> Duration {
        Duration::from_millis(self.probe_deadline_ms as u64)
    }
}

fn fixed<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    // Defaults are compile-time literals well under capacity.
    let _ = out.push_str(s);
    out
}
