//! Illumination loop — three-band light classification and grow-light duty.
//!
//! Classification is a pure function of the instantaneous reading and the two
//! fixed thresholds; there is no debouncing, so flapping exactly at a band
//! edge is possible and accepted. Boundary readings fall to the lower band:
//! `ldr == dim_threshold` is OFF, `ldr == full_threshold` is DIM.

use crate::config::LightBands;
use crate::telemetry::{IlluminationReport, LightStatus};

/// Classify a raw LDR reading into the three light bands.
pub fn classify_light(ldr: i32, bands: &LightBands) -> LightStatus {
    if ldr > bands.full_threshold {
        LightStatus::FullOn
    } else if ldr > bands.dim_threshold {
        LightStatus::Dim
    } else {
        LightStatus::Off
    }
}

/// Duty inside the DIM band: linear interpolation of
/// `[dim_threshold, full_threshold]` onto `[duty_dim_low, duty_dim_high]`.
fn dim_duty(ldr: i32, bands: &LightBands) -> u8 {
    let span = bands.full_threshold - bands.dim_threshold;
    let duty_span = i32::from(bands.duty_dim_high) - i32::from(bands.duty_dim_low);
    let duty = i32::from(bands.duty_dim_low) + (ldr - bands.dim_threshold) * duty_span / span;
    duty.clamp(i32::from(bands.duty_dim_low), i32::from(bands.duty_dim_high)) as u8
}

/// Grow-light duty for a classified reading.
pub fn light_duty(ldr: i32, status: LightStatus, bands: &LightBands) -> u8 {
    match status {
        LightStatus::Off => 0,
        LightStatus::Dim => dim_duty(ldr, bands),
        LightStatus::FullOn => bands.duty_full,
    }
}

/// The illumination control loop. Stateless across cycles; the struct only
/// pins down the configured bands.
pub struct IlluminationLoop {
    bands: LightBands,
}

impl IlluminationLoop {
    pub fn new(bands: LightBands) -> Self {
        Self { bands }
    }

    /// One control cycle: classify, pick a duty, build the outbound record.
    pub fn tick(&self, ldr: i32) -> (u8, IlluminationReport) {
        let status = classify_light(ldr, &self.bands);
        let duty = light_duty(ldr, status, &self.bands);
        (duty, IlluminationReport { ldr_value: ldr, light_status: status })
    }
}
