//! LED manager — sole owner of the registry and sole writer of LED pins.
//!
//! Driven by the LED task at a fixed slice (10 ms by default):
//!
//! 1. [`apply`](LedManager::apply) at most one drained [`LedCommand`].
//! 2. [`tick`](LedManager::tick) every blinking record whose interval has
//!    elapsed.
//! 3. Sleep one slice.
//!
//! On/Off take effect immediately.  Blink leaves the pin where it is and
//! re-anchors the phase at the command's arrival time, so the first toggle
//! lands exactly one interval later.  Each LED's phase is independent.

use log::{debug, warn};

use super::identity::LedId;
use super::registry::{LedRecord, LedRegistry};
use super::state::{LedCommand, LedState};
use crate::app::ports::LedDriver;
use crate::error::{Error, Result};

pub struct LedManager<D: LedDriver> {
    registry: LedRegistry,
    driver: D,
    rejected: u32,
    rejected_reported: u32,
}

impl<D: LedDriver> LedManager<D> {
    /// Take ownership of the registry and driver, configure every pin as an
    /// output and drive it LOW.
    pub fn new(mut registry: LedRegistry, mut driver: D) -> Self {
        for record in registry.iter_mut() {
            driver.configure(record.pin);
            driver.write(record.pin, false);
            record.level = false;
            record.state = LedState::Off;
        }
        debug!("LED: manager owns {} indicators", registry.len());
        Self {
            registry,
            driver,
            rejected: 0,
            rejected_reported: 0,
        }
    }

    /// Apply one command received at `now_ms`.
    ///
    /// An identity missing from the registry is rejected and counted; the
    /// registry is left untouched.
    pub fn apply(&mut self, cmd: LedCommand, now_ms: u32) -> Result<()> {
        let Some(record) = self.registry.get_mut(cmd.identity) else {
            self.rejected = self.rejected.wrapping_add(1);
            warn!("LED: rejected command for unregistered {}", cmd.identity);
            return Err(Error::UnknownIdentity(cmd.identity as u8));
        };

        record.state = cmd.state;
        record.last_toggle_ms = now_ms;
        match cmd.state {
            LedState::On => drive(&mut self.driver, record, true),
            LedState::Off => drive(&mut self.driver, record, false),
            LedState::Blink(interval) => {
                debug!("LED: {} blink every {}ms", cmd.identity, interval.as_millis());
            }
        }
        Ok(())
    }

    /// Advance every blink timer to `now_ms`.  Returns the number of pins
    /// toggled.
    pub fn tick(&mut self, now_ms: u32) -> usize {
        let mut toggled = 0;
        for record in self.registry.iter_mut() {
            let LedState::Blink(interval) = record.state else {
                continue;
            };
            let period = interval.as_millis();
            let elapsed = now_ms.wrapping_sub(record.last_toggle_ms);
            if elapsed < period {
                continue;
            }
            let level = !record.level;
            drive(&mut self.driver, record, level);
            // Keep the phase anchored to multiples of the interval; re-anchor
            // only when the loop fell a whole period behind.
            record.last_toggle_ms = if elapsed >= period.saturating_mul(2) {
                now_ms
            } else {
                record.last_toggle_ms.wrapping_add(period)
            };
            toggled += 1;
        }
        toggled
    }

    /// One manager iteration: apply an optional command, then tick.
    pub fn step(&mut self, cmd: Option<LedCommand>, now_ms: u32) -> usize {
        if let Some(cmd) = cmd {
            // Rejections are already logged and counted.
            let _ = self.apply(cmd, now_ms);
        }
        self.tick(now_ms)
    }

    pub fn state(&self, identity: LedId) -> Option<LedState> {
        self.registry.get(identity).map(|r| r.state)
    }

    pub fn level(&self, identity: LedId) -> Option<bool> {
        self.registry.get(identity).map(|r| r.level)
    }

    /// Read-only view of the registry.
    pub fn registry(&self) -> &LedRegistry {
        &self.registry
    }

    /// Commands rejected for an unknown identity since boot.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Total rejections, if it grew since the last call.
    pub fn unreported_rejections(&mut self) -> Option<u32> {
        if self.rejected == self.rejected_reported {
            return None;
        }
        self.rejected_reported = self.rejected;
        Some(self.rejected)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

fn drive<D: LedDriver>(driver: &mut D, record: &mut LedRecord, high: bool) {
    if record.level != high {
        driver.write(record.pin, high);
        record.level = high;
    }
}
