//! Indicator LED subsystem.
//!
//! ```text
//!  any task / ISR ──submit()──▶ CommandChannel ──▶ LedManager ──▶ GPIO
//!                                                  (sole owner of
//!                                                   LedRegistry)
//! ```
//!
//! Producers only ever hold a [`CommandSink`](crate::channels::CommandSink).
//! The registry and the [`LedDriver`](crate::app::ports::LedDriver) are moved
//! into the [`LedManager`] at boot, so "single writer per pin" is enforced
//! by ownership rather than convention.

pub mod identity;
pub mod manager;
pub mod registry;
pub mod state;

pub use identity::LedId;
pub use manager::LedManager;
pub use registry::{LedRecord, LedRegistry};
pub use state::{BlinkInterval, LedCommand, LedState, StateKind};
