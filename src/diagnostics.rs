//! Runtime diagnostics.
//!
//! Heap and stack headroom plus channel drop counters, logged at boot and
//! after state changes.  Free-standing functions so any task can report
//! on itself.

use log::{info, warn};

use crate::channels::LED_COMMANDS;
use crate::error::Channel;
use crate::events::FIRE_EDGES;

/// Stack headroom below which a task is reported as at risk (words).
pub const STACK_WARN_WORDS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    pub free: u32,
    pub min_free: u32,
}

impl HeapStats {
    #[cfg(target_os = "espidf")]
    pub fn collect() -> Self {
        use esp_idf_svc::sys::*;
        // SAFETY: allocator statistics reads, callable from any task.
        let free = unsafe { esp_get_free_heap_size() };
        let min_free = unsafe { esp_get_minimum_free_heap_size() };
        Self { free, min_free }
    }

    /// Simulation: a fixed 300 KB heap.
    #[cfg(not(target_os = "espidf"))]
    pub fn collect() -> Self {
        Self {
            free: 307_200,
            min_free: 307_200,
        }
    }
}

/// Minimum free stack of the calling task since it started, in words.
#[cfg(target_os = "espidf")]
pub fn stack_high_water_words() -> Option<u32> {
    // SAFETY: a null handle queries the calling task.
    Some(unsafe { esp_idf_svc::sys::uxTaskGetStackHighWaterMark(core::ptr::null_mut()) })
}

#[cfg(not(target_os = "espidf"))]
pub fn stack_high_water_words() -> Option<u32> {
    None
}

pub fn stack_headroom_low(words: u32) -> bool {
    words < STACK_WARN_WORDS
}

/// Log the calling task's stack high-water mark.
pub fn report_stack(task: &str) {
    let Some(words) = stack_high_water_words() else {
        return;
    };
    if stack_headroom_low(words) {
        warn!("DIAG | {} stack high water mark {} words (low)", task, words);
    } else {
        info!("DIAG | {} stack high water mark {} words", task, words);
    }
}

/// Discarded enqueues on the two firmware channels since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropCounters {
    pub edges: u32,
    pub commands: u32,
}

impl DropCounters {
    pub fn collect() -> Self {
        Self {
            edges: FIRE_EDGES.dropped(),
            commands: LED_COMMANDS.dropped(),
        }
    }
}

pub fn report_boot() {
    let heap = HeapStats::collect();
    info!("DIAG | free heap {} bytes (min {})", heap.free, heap.min_free);
}

pub fn report_drops() {
    let drops = DropCounters::collect();
    for (channel, count) in [
        (Channel::Edge, drops.edges),
        (Channel::LedCommand, drops.commands),
    ] {
        if count > 0 {
            warn!("DIAG | {} channel dropped {} values since boot", channel, count);
        }
    }
}

/// Log the LED manager's running count of commands for unregistered LEDs.
pub fn report_rejected(total: u32) {
    warn!("DIAG | LED manager rejected {} commands since boot", total);
}

/// Install a panic hook that logs the reason before the default handler
/// aborts.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<std::string::String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };
        let location = info
            .location()
            .map(|l| (l.file(), l.line()))
            .unwrap_or(("?", 0));
        log::error!("PANIC at {}:{}: {}", location.0, location.1, reason);
    }));
}
