//! Interrupt-context edge capture.
//!
//! Runs inside the GPIO ISR: no heap, no logging, no blocking.  The only
//! actions are a timestamp enqueue and, for latched sources, disabling the
//! line's own interrupt.  The event monitor re-arms it once the condition
//! clears.

use crate::events::EdgeQueue;
use crate::monitor::SourceKind;

/// Capture one falling edge.  Returns `false` if the queue was full and
/// the timestamp was dropped; the line is disarmed either way for latched
/// sources.
pub fn capture_edge<const N: usize>(
    queue: &EdgeQueue<N>,
    ticks: u32,
    kind: SourceKind,
    disarm: impl FnOnce(),
) -> bool {
    let queued = queue.push(ticks);
    if kind == SourceKind::Latched {
        disarm();
    }
    queued
}

/// Fire sensor falling-edge ISR.  Registered by
/// [`init_isr_service`](crate::drivers::hw_init::init_isr_service).
#[cfg(target_os = "espidf")]
pub unsafe extern "C" fn fire_gpio_isr(_arg: *mut core::ffi::c_void) {
    // SAFETY: xTaskGetTickCountFromISR is the ISR-safe tick read.
    let ticks = unsafe { esp_idf_svc::sys::xTaskGetTickCountFromISR() };
    capture_edge(
        &crate::events::FIRE_EDGES,
        ticks,
        SourceKind::Latched,
        || crate::drivers::hw_init::intr_disable(crate::pins::FIRE_SENSOR_GPIO),
    );
}
