//! FireNode firmware library.
//!
//! Exposes the indicator core (LED manager, event monitor, channels) and
//! its adapters for integration testing.  All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod channels;
pub mod config;
pub mod connectivity;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod led;
pub mod monitor;
pub mod pins;
pub mod tasks;

pub mod adapters;
pub mod drivers;
