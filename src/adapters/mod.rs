//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements                  | Connects to               |
//! |------------|-----------------------------|---------------------------|
//! | `espnow`   | RadioLink                   | ESP-NOW peer API          |
//! | `wifi`     | WifiPort                    | ESP-IDF Wi-Fi scan/channel|
//! | `hardware` | sensor/actuator ports       | ESP32 ADC, GPIO, LEDC     |
//! | `time`     | Clock                       | ESP timer                 |
//! | `log_sink` | EventSink                   | Serial log output         |
//!
//! `log_sink` and the `embedded-hal`-generic parts of `hardware` compile on
//! the host; the rest are ESP-IDF-only.

pub mod hardware;
pub mod log_sink;

#[cfg(target_os = "espidf")]
pub mod espnow;
#[cfg(target_os = "espidf")]
pub mod time;
#[cfg(target_os = "espidf")]
pub mod wifi;
