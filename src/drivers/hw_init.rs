//! One-shot hardware peripheral initialization.
//!
//! Configures the fire sensor input using raw ESP-IDF sys calls, then
//! installs the per-pin GPIO ISR service.  Called once from `main()` before
//! the tasks start.  LED outputs are configured by the LED manager through
//! [`configure_output`], never here.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrHandlerFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrHandlerFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(_: HwInitError) -> Self {
        Self::ResourceExhaustion("GPIO peripheral init")
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any task starts; single-threaded.
    unsafe {
        init_sensor_input()?;
    }
    info!("hw_init: sensor input configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_sensor_input() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::FIRE_SENSOR_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!(
        "hw_init: fire sensor GPIO{} input, pull-up, initial level {}",
        pins::FIRE_SENSOR_GPIO,
        gpio_read(pins::FIRE_SENSOR_GPIO) as u8
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host: inputs idle HIGH (pull-up, no condition present).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── GPIO Outputs ──────────────────────────────────────────────

/// Configure one pin as a push-pull output, driven LOW.
#[cfg(target_os = "espidf")]
pub fn configure_output(pin: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: plain register configuration of a board-assigned output pin.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    unsafe { gpio_set_level(pin, 0) };
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn configure_output(_pin: i32) -> Result<(), HwInitError> {
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    // Only the LED manager task calls this.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── Interrupt arm / disarm ────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn intr_enable(pin: i32) {
    // SAFETY: toggles the interrupt enable bit of a configured input.
    unsafe { gpio_intr_enable(pin); }
}

#[cfg(not(target_os = "espidf"))]
pub fn intr_enable(_pin: i32) {}

/// Disable the edge interrupt on `pin`.  ISR-safe.
#[cfg(target_os = "espidf")]
pub fn intr_disable(pin: i32) {
    // SAFETY: gpio_intr_disable is a register write, IRAM-resident.
    unsafe { gpio_intr_disable(pin); }
}

#[cfg(not(target_os = "espidf"))]
pub fn intr_disable(_pin: i32) {}

// ── GPIO ISR Service ──────────────────────────────────────────

/// Install per-pin GPIO ISR service and register the fire sensor handler.
/// Call after init_peripherals() and before the tasks start.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    use crate::drivers::edge_source::fire_gpio_isr;

    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The handler registered
    // below only pushes to the lock-free edge queue and disables its own line.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        // Fire sensor: falling edge (active-low with pull-up already configured)
        gpio_set_intr_type(pins::FIRE_SENSOR_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
        let ret = gpio_isr_handler_add(
            pins::FIRE_SENSOR_GPIO,
            Some(fire_gpio_isr),
            core::ptr::null_mut(),
        );
        if ret != ESP_OK as i32 { return Err(HwInitError::IsrHandlerFailed(ret)); }
        gpio_intr_enable(pins::FIRE_SENSOR_GPIO);

        info!("hw_init: ISR service installed (fire sensor GPIO{})", pins::FIRE_SENSOR_GPIO);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
