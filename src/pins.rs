//! GPIO / peripheral pin assignments for the FireNode board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Call sites address LEDs by [`LedId`], so
//! re-wiring an indicator only touches this file.
//!
//! [`LedId`]: crate::led::LedId

// ---------------------------------------------------------------------------
// Indicator LEDs (active HIGH)
// ---------------------------------------------------------------------------

/// Heartbeat / general-purpose blue LED.
pub const LED_BLUE_GPIO: i32 = 2;
/// Connectivity (SIM / uplink) status LED.
pub const LED_SIM_GPIO: i32 = 5;
/// Fault LED.
pub const LED_FAULT_GPIO: i32 = 14;
/// Fire alarm LED.
pub const LED_FIRE_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Monitored inputs (active LOW with pull-up)
// ---------------------------------------------------------------------------

/// Fire sensor output.  Latched: stays LOW while the condition persists.
pub const FIRE_SENSOR_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

pub const UART_BAUD: u32 = 115_200;
