//! Monotonic tick clock.
//!
//! - **`target_os = "espidf"`** — the FreeRTOS tick counter, the same
//!   counter the GPIO ISR stamps edges with.
//! - **`not(target_os = "espidf")`** — milliseconds since construction via
//!   `std::time::Instant`, one tick per millisecond.

/// Milliseconds per scheduler tick.
#[cfg(target_os = "espidf")]
pub const TICK_PERIOD_MS: u32 = 1000 / esp_idf_svc::sys::configTICK_RATE_HZ;

/// Milliseconds per scheduler tick.
#[cfg(not(target_os = "espidf"))]
pub const TICK_PERIOD_MS: u32 = 1;

/// Convert a tick count to milliseconds.  Wraps with the tick counter.
pub const fn ticks_to_ms(ticks: u32) -> u32 {
    ticks.wrapping_mul(TICK_PERIOD_MS)
}

pub struct TickClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Current tick count.
    #[cfg(target_os = "espidf")]
    pub fn now_ticks(&self) -> u32 {
        // SAFETY: plain read of the scheduler tick counter.
        unsafe { esp_idf_svc::sys::xTaskGetTickCount() }
    }

    /// Current tick count.
    #[cfg(not(target_os = "espidf"))]
    pub fn now_ticks(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    /// Milliseconds since boot (wrapping).
    pub fn now_ms(&self) -> u32 {
        ticks_to_ms(self.now_ticks())
    }
}
