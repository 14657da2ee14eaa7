//! GPIO adapters for the indicator core.
//!
//! Thin wrappers over [`hw_init`](crate::drivers::hw_init) pin helpers,
//! exposing them through [`LedDriver`] and [`MonitoredInput`].

use log::{debug, error};

use crate::app::ports::{LedDriver, MonitoredInput};
use crate::drivers::hw_init;

/// Active-high LED outputs.  Owned by the LED manager.
pub struct GpioLedDriver;

impl GpioLedDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GpioLedDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl LedDriver for GpioLedDriver {
    fn configure(&mut self, pin: i32) {
        if let Err(e) = hw_init::configure_output(pin) {
            error!("GPIO{}: {}", pin, e);
        }
    }

    fn write(&mut self, pin: i32, high: bool) {
        hw_init::gpio_write(pin, high);
    }
}

/// Active-low sensor input with a falling-edge interrupt.
pub struct GpioSensorInput {
    pin: i32,
}

impl GpioSensorInput {
    pub fn new(pin: i32) -> Self {
        Self { pin }
    }

    pub fn pin(&self) -> i32 {
        self.pin
    }
}

impl MonitoredInput for GpioSensorInput {
    fn is_asserted(&mut self) -> bool {
        !hw_init::gpio_read(self.pin)
    }

    fn arm(&mut self) {
        debug!("GPIO{}: interrupt armed", self.pin);
        hw_init::intr_enable(self.pin);
    }

    fn disarm(&mut self) {
        hw_init::intr_disable(self.pin);
    }
}
