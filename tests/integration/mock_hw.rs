//! Mock hardware adapters for integration tests.
//!
//! Records every pin write, interrupt arm/disarm and emitted event so tests
//! can assert on the full history without touching real GPIO registers.

use firenode::app::events::AppEvent;
use firenode::app::ports::{EventSink, LedDriver, MonitoredInput};

// ── LED outputs ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinWrite {
    pub pin: i32,
    pub high: bool,
}

/// Records writes made after construction of the manager.
#[derive(Default)]
pub struct MockLeds {
    pub writes: Vec<PinWrite>,
    pub configured: Vec<i32>,
}

#[allow(dead_code)]
impl MockLeds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes to `pin`, ignoring the initial drive-low at manager start.
    pub fn toggles(&self, pin: i32) -> usize {
        self.writes
            .iter()
            .skip(self.configured.len())
            .filter(|w| w.pin == pin)
            .count()
    }

    pub fn level(&self, pin: i32) -> Option<bool> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.pin == pin)
            .map(|w| w.high)
    }
}

impl LedDriver for MockLeds {
    fn configure(&mut self, pin: i32) {
        self.configured.push(pin);
    }

    fn write(&mut self, pin: i32, high: bool) {
        self.writes.push(PinWrite { pin, high });
    }
}

// ── Sensor input ──────────────────────────────────────────────

/// Active-low sensor whose level the test sets directly.
pub struct MockSensor {
    pub asserted: bool,
    pub armed: bool,
    pub arm_calls: u32,
    pub disarm_calls: u32,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn new() -> Self {
        Self {
            asserted: false,
            armed: true,
            arm_calls: 0,
            disarm_calls: 0,
        }
    }
}

impl MonitoredInput for MockSensor {
    fn is_asserted(&mut self) -> bool {
        self.asserted
    }

    fn arm(&mut self) {
        self.armed = true;
        self.arm_calls += 1;
    }

    fn disarm(&mut self) {
        self.armed = false;
        self.disarm_calls += 1;
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
