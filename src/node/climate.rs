//! Climate loop — single-threshold fan control.
//!
//! The fan switches ON strictly above the configured temperature; a reading
//! exactly at the threshold keeps it OFF. A failed sensor read never reaches
//! this module — the runner skips the whole cycle and the relay holds its
//! last state.

use crate::telemetry::{ClimateReport, FanStatus};

/// Classify a temperature against the fan threshold.
pub fn classify_temperature(temperature_c: f32, threshold_c: f32) -> FanStatus {
    if temperature_c > threshold_c {
        FanStatus::On
    } else {
        FanStatus::Off
    }
}

/// The climate control loop. Stateless across cycles.
pub struct ClimateLoop {
    threshold_c: f32,
}

impl ClimateLoop {
    pub fn new(threshold_c: f32) -> Self {
        Self { threshold_c }
    }

    /// One control cycle with a valid reading: classify and build the record.
    pub fn tick(&self, temperature_c: f32) -> (bool, ClimateReport) {
        let fan_status = classify_temperature(temperature_c, self.threshold_c);
        (
            fan_status == FanStatus::On,
            ClimateReport { temperature_c, fan_status },
        )
    }
}
