//! LED command channel.
//!
//! A bounded `embassy-sync` channel carries [`LedCommand`]s from any number
//! of producers (tasks, the connectivity thread, ISRs) to the single LED
//! manager.  Enqueue never blocks: when the channel is full the newest
//! command is dropped and the caller is told so.
//!
//! ```text
//! ┌──────────────┐
//! │ EventMonitor │──┐
//! └──────────────┘  │ submit()  ┌────────────────┐  try_receive()  ┌────────────┐
//! ┌──────────────┐  ├─────────▶│ CommandChannel │───────────────▶│ LedManager │
//! │ Connectivity │──┘           └────────────────┘                 └────────────┘
//! └──────────────┘
//! ```
//!
//! `CriticalSectionRawMutex` makes the channel safe to feed from interrupt
//! context on ESP-IDF (`critical-section` is backed by the IDF spinlock).

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::LED_CMD_DEPTH;
use crate::error::{self, Error, Result};
use crate::led::state::StateKind;
use crate::led::{LedCommand, LedId};

/// Producer-side view of the command channel.
pub trait CommandSink {
    /// Enqueue without blocking.  `Err(TransientDrop)` when full.
    fn send(&self, cmd: LedCommand) -> Result<()>;
}

/// Bounded multi-producer / single-consumer LED command queue.
pub struct CommandChannel<const N: usize> {
    inner: Channel<CriticalSectionRawMutex, LedCommand, N>,
    dropped: AtomicU32,
}

impl<const N: usize> CommandChannel<N> {
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Non-blocking receive for the LED manager.
    pub fn try_receive(&self) -> Option<LedCommand> {
        self.inner.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Commands discarded because the channel was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for CommandChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CommandSink for CommandChannel<N> {
    fn send(&self, cmd: LedCommand) -> Result<()> {
        self.inner.try_send(cmd).map_err(|_| {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            Error::TransientDrop(error::Channel::LedCommand)
        })
    }
}

/// The firmware-wide LED command channel.
pub static LED_COMMANDS: CommandChannel<LED_CMD_DEPTH> = CommandChannel::new();

/// Request a state change for a raw LED identity.
///
/// `interval_ms` is only meaningful for [`StateKind::Blink`]; zero is
/// normalised to the default blink interval.  Never blocks and never logs,
/// so it is usable from interrupt context.
pub fn submit(
    sink: &impl CommandSink,
    identity: u8,
    kind: StateKind,
    interval_ms: u32,
) -> Result<()> {
    let identity = LedId::try_from(identity)?;
    sink.send(LedCommand::from_parts(identity, kind, interval_ms))
}
