//! ESP32 monotonic clock adapter.
//!
//! Wraps `esp_timer_get_time()` (microsecond precision, monotonic since
//! boot) behind the [`Clock`] port.

use crate::node::ports::Clock;

pub struct EspClock;

impl EspClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for EspClock {
    fn now_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }
}
