//! LED registry: identity → record map, owned by the LED manager.

use heapless::Vec;

use super::identity::LedId;
use super::state::LedState;
use crate::error::{Error, Result};
use crate::pins;

/// Per-LED bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedRecord {
    pub identity: LedId,
    /// GPIO number driven for this identity.
    pub pin: i32,
    pub state: LedState,
    /// Last level written to the pin (true = HIGH).
    pub level: bool,
    /// Blink phase anchor, in milliseconds.
    pub last_toggle_ms: u32,
}

impl LedRecord {
    pub const fn new(identity: LedId, pin: i32) -> Self {
        Self {
            identity,
            pin,
            state: LedState::Off,
            level: false,
            last_toggle_ms: 0,
        }
    }
}

/// Fixed-capacity registry.  Lives for the whole process once built.
#[derive(Debug, Clone, Default)]
pub struct LedRegistry {
    records: Vec<LedRecord, { LedId::COUNT }>,
}

impl LedRegistry {
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// The board's standard wiring, all LEDs off.
    pub fn board_default() -> Self {
        let mut registry = Self::new();
        for (identity, pin) in [
            (LedId::Blue, pins::LED_BLUE_GPIO),
            (LedId::Sim, pins::LED_SIM_GPIO),
            (LedId::Fault, pins::LED_FAULT_GPIO),
            (LedId::Fire, pins::LED_FIRE_GPIO),
        ] {
            // Four distinct identities into a four-slot registry cannot fail.
            let _ = registry.register(identity, pin);
        }
        registry
    }

    /// Add an LED.  Duplicate identities and a full registry are init-time
    /// failures.
    pub fn register(&mut self, identity: LedId, pin: i32) -> Result<()> {
        if self.get(identity).is_some() {
            return Err(Error::ResourceExhaustion("duplicate LED identity"));
        }
        self.records
            .push(LedRecord::new(identity, pin))
            .map_err(|_| Error::ResourceExhaustion("LED registry full"))
    }

    pub fn get(&self, identity: LedId) -> Option<&LedRecord> {
        self.records.iter().find(|r| r.identity == identity)
    }

    pub(crate) fn get_mut(&mut self, identity: LedId) -> Option<&mut LedRecord> {
        self.records.iter_mut().find(|r| r.identity == identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedRecord> {
        self.records.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut LedRecord> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
