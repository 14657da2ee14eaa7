//! Unified error types for the FireNode firmware.
//!
//! Mirrors the four failure classes of the indicator core:
//!
//! | Class              | Handling                                         |
//! |--------------------|--------------------------------------------------|
//! | TransientDrop      | Channel full — value discarded, never propagated |
//! | UnknownIdentity    | Command for an LED not in the registry — rejected |
//! | InvalidInterval    | Never surfaces: normalised by `BlinkInterval`    |
//! | ResourceExhaustion | Init-time only — aborts the affected subsystem   |
//!
//! All variants are `Copy` so they can be returned from interrupt-adjacent
//! code paths without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Which bounded channel rejected an enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// ISR → event monitor timestamps.
    Edge,
    /// Any producer → LED manager commands.
    LedCommand,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edge => write!(f, "edge"),
            Self::LedCommand => write!(f, "led-command"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A bounded channel was full; the newest value was dropped.
    TransientDrop(Channel),
    /// A command referenced a raw LED identity absent from the registry.
    UnknownIdentity(u8),
    /// A fixed-capacity resource could not be created or was exhausted at init.
    ResourceExhaustion(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransientDrop(ch) => write!(f, "{ch} channel full, value dropped"),
            Self::UnknownIdentity(raw) => write!(f, "unknown LED identity {raw}"),
            Self::ResourceExhaustion(what) => write!(f, "resource exhausted: {what}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
