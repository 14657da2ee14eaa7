//! FireNode Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  GpioLedDriver   GpioSensorInput   HttpProbe   LogEventSink    │
//! │  (LedDriver)     (MonitoredInput)  (Probe)     (EventSink)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  LedManager · EventMonitor · ConnectivityWatchdog      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  GPIO ISR ─▶ FIRE_EDGES ─▶ monitor ─▶ LED_COMMANDS ─▶ manager   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use firenode::adapters::gpio::{GpioLedDriver, GpioSensorInput};
use firenode::adapters::log_sink::LogEventSink;
use firenode::adapters::probe::HttpProbe;
use firenode::adapters::wifi::{WifiCredentials, WifiStation};
use firenode::channels::LED_COMMANDS;
use firenode::config::NodeConfig;
use firenode::connectivity::ConnectivityWatchdog;
use firenode::events::FIRE_EDGES;
use firenode::led::{LedManager, LedRegistry};
use firenode::monitor::EventMonitor;
use firenode::{diagnostics, drivers, pins, tasks};

/// Build-time JSON overrides for [`NodeConfig`].
const CONFIG_JSON: Option<&str> = option_env!("FIRENODE_CONFIG");

fn load_config() -> NodeConfig {
    let Some(json) = CONFIG_JSON else {
        return NodeConfig::default();
    };
    match NodeConfig::from_json(json) {
        Ok(config) => {
            info!("Config: build-time overrides applied");
            config
        }
        Err(e) => {
            warn!("Config: build-time overrides rejected ({}), using defaults", e);
            NodeConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  FireNode v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!("UART console at {} baud", pins::UART_BAUD);

    diagnostics::install_panic_handler();
    diagnostics::report_boot();

    let config = load_config();

    // ── 2. Hardware ───────────────────────────────────────────
    // Without GPIO and the ISR the node cannot raise its alarm; abort.
    drivers::hw_init::init_peripherals().map_err(|e| {
        error!("HAL init failed: {}", e);
        anyhow::Error::msg(e.to_string())
    })?;
    drivers::hw_init::init_isr_service().map_err(|e| {
        error!("ISR service init failed: {}", e);
        anyhow::Error::msg(e.to_string())
    })?;

    // ── 3. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take().ok();

    let station = match WifiCredentials::from_env(option_env!("WIFI_SSID"), option_env!("WIFI_PASS")) {
        Ok(credentials) => {
            let mut wifi = WifiStation::new(credentials);
            if let Err(e) = wifi.connect(peripherals.modem, sysloop, nvs) {
                warn!("WiFi: {}; probes will fail until restart", e);
            }
            Some(wifi)
        }
        Err(e) => {
            warn!("WiFi: {}; running offline", e);
            None
        }
    };

    // ── 4. Indicator core ─────────────────────────────────────
    let manager = LedManager::new(LedRegistry::board_default(), GpioLedDriver::new());
    let monitor = EventMonitor::fire(&config);
    let input = GpioSensorInput::new(pins::FIRE_SENSOR_GPIO);

    let indicator = tasks::spawn_indicator(
        config.clone(),
        manager,
        monitor,
        input,
        LogEventSink::new(),
        &FIRE_EDGES,
        &LED_COMMANDS,
    );

    // ── 5. Connectivity watchdog ──────────────────────────────
    let watchdog = ConnectivityWatchdog::new(HttpProbe::new(&config), &config);
    let netprobe = tasks::spawn_connectivity(watchdog, &LED_COMMANDS, LogEventSink::new());

    info!("Boot complete");

    // The tasks never return; joining keeps `station` (and the WiFi
    // driver) alive for the life of the process.
    if indicator.join().is_err() {
        error!("indicator task panicked");
    }
    if netprobe.join().is_err() {
        error!("netprobe task panicked");
    }
    drop(station);
    Ok(())
}
