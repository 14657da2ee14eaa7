//! Port traits — the boundary between the indicator core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ core (LedManager / EventMonitor / watchdog)
//! ```
//!
//! Driven adapters (GPIO, sockets, log output) implement these traits.
//! The core consumes them via generics, so it never touches hardware
//! directly.

use crate::connectivity::ProbeError;

// ───────────────────────────────────────────────────────────────
// LED output port (driven adapter: LED manager → GPIO)
// ───────────────────────────────────────────────────────────────

/// Write side of the indicator pins.  Only the
/// [`LedManager`](crate::led::LedManager) ever holds one.
pub trait LedDriver {
    /// Configure `pin` as an output.  Called once per LED at manager start.
    fn configure(&mut self, pin: i32);

    /// Drive `pin` HIGH (`true`) or LOW (`false`).
    fn write(&mut self, pin: i32, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Monitored input port (driven adapter: sensor pin ↔ event monitor)
// ───────────────────────────────────────────────────────────────

/// A digital input with a falling-edge interrupt.
pub trait MonitoredInput {
    /// Direct level read: `true` while the monitored condition is present
    /// (pin LOW on the active-low sensors this board uses).
    fn is_asserted(&mut self) -> bool;

    /// Enable the edge interrupt.
    fn arm(&mut self);

    /// Disable the edge interrupt.
    fn disarm(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Reachability probe port (driven adapter: watchdog → network)
// ───────────────────────────────────────────────────────────────

/// One reachability check.  The transport is entirely the adapter's
/// business; the watchdog only sees the outcome.
pub trait ProbePort {
    fn probe(&mut self) -> Result<(), ProbeError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: core → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
