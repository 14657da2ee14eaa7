//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements     | Connects to                 |
//! |------------|----------------|-----------------------------|
//! | `gpio`     | LedDriver      | ESP32 GPIO outputs          |
//! |            | MonitoredInput | Sensor input + edge ISR     |
//! | `log_sink` | EventSink      | Serial log output           |
//! | `probe`    | ProbePort      | lwIP DNS + TCP (HTTP GET)   |
//! | `time`     |                | FreeRTOS tick counter       |
//! | `wifi`     |                | ESP-IDF WiFi STA            |

pub mod gpio;
pub mod log_sink;
pub mod probe;
pub mod time;
pub mod wifi;
