//! Host-side integration tests.
//!
//! `indicator_tests` drives edge capture through the monitor, the command
//! channel and the LED manager on a simulated clock.  `probe_tests` runs
//! the HTTP probe against loopback servers.  Recording doubles live in
//! `mock_hw`.

mod indicator_tests;
mod mock_hw;
mod probe_tests;
