//! LED states and the command value carried over the command channel.

use super::identity::LedId;

/// Blink half-period in milliseconds.  Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlinkInterval(u32);

impl BlinkInterval {
    /// Interval substituted for a requested interval of zero.
    pub const DEFAULT: Self = Self(500);

    /// Build an interval, normalising 0 to [`Self::DEFAULT`] so the manager
    /// can never be asked to toggle on every tick.
    pub const fn new(ms: u32) -> Self {
        if ms == 0 { Self::DEFAULT } else { Self(ms) }
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }
}

impl Default for BlinkInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Logical LED state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedState {
    #[default]
    Off,
    On,
    Blink(BlinkInterval),
}

impl LedState {
    /// Build a blink state from a raw millisecond value (0 is normalised).
    pub const fn blink(ms: u32) -> Self {
        Self::Blink(BlinkInterval::new(ms))
    }

    pub const fn is_blinking(self) -> bool {
        matches!(self, Self::Blink(_))
    }
}

/// Requested state kind, as accepted by the raw `submit` entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Off,
    On,
    Blink,
}

/// A state-change request for one LED.  Immutable once enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedCommand {
    pub identity: LedId,
    pub state: LedState,
}

impl LedCommand {
    pub const fn new(identity: LedId, state: LedState) -> Self {
        Self { identity, state }
    }

    pub const fn on(identity: LedId) -> Self {
        Self::new(identity, LedState::On)
    }

    pub const fn off(identity: LedId) -> Self {
        Self::new(identity, LedState::Off)
    }

    pub const fn blink(identity: LedId, interval_ms: u32) -> Self {
        Self::new(identity, LedState::blink(interval_ms))
    }

    /// Assemble a command from its `(identity, state, interval)` parts.
    /// `interval_ms` is ignored unless `kind` is [`StateKind::Blink`].
    pub const fn from_parts(identity: LedId, kind: StateKind, interval_ms: u32) -> Self {
        let state = match kind {
            StateKind::Off => LedState::Off,
            StateKind::On => LedState::On,
            StateKind::Blink => LedState::blink(interval_ms),
        };
        Self::new(identity, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_normalises_to_default() {
        assert_eq!(BlinkInterval::new(0), BlinkInterval::DEFAULT);
        assert_eq!(BlinkInterval::new(0).as_millis(), 500);
    }

    #[test]
    fn nonzero_interval_kept() {
        assert_eq!(BlinkInterval::new(200).as_millis(), 200);
    }

    #[test]
    fn interval_ignored_for_steady_states() {
        let cmd = LedCommand::from_parts(LedId::Sim, StateKind::On, 250);
        assert_eq!(cmd.state, LedState::On);
    }

    #[test]
    fn blink_parts_carry_interval() {
        let cmd = LedCommand::from_parts(LedId::Fire, StateKind::Blink, 200);
        assert_eq!(cmd, LedCommand::blink(LedId::Fire, 200));
    }
}
