//! Application boundary — port traits and structured events.
//!
//! The indicator core (LED manager, event monitor, connectivity watchdog)
//! talks to hardware and logging only through the traits in [`ports`],
//! keeping it fully testable without real peripherals.

pub mod events;
pub mod ports;
