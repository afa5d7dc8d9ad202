//! Status projection — the read-only text contract the dashboard consumes.
//!
//! Pure formatting over an [`AggregateSnapshot`]; nothing here is stored.
//! Key order is stable (the dashboard's JS splits on it), and roles with no
//! data yet render `Loading...`. The HTML page and HTTP plumbing live in the
//! ESP-IDF adapter layer, not here.

use core::fmt::Write;

use crate::coordinator::AggregateSnapshot;
use crate::telemetry::{IrrigationReport, PumpStatus, SoilStatus};

const LOADING: &str = "Loading...";

/// Watering advice derived from the irrigation record's own status fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoilCondition {
    pub soil_status: SoilStatus,
    /// Human-readable watering line for the dashboard.
    pub advice: &'static str,
    /// Remaining cooldown in whole seconds; `None` when no message applies.
    pub cooldown_secs: Option<u32>,
}

/// Derive the dashboard's watering advice from an irrigation record.
///
/// The cooldown message only appears while the soil is dry and a nonzero
/// cooldown is pending — purely a presentation decision.
pub fn soil_condition(report: &IrrigationReport) -> SoilCondition {
    match (report.soil_status, report.pump_status) {
        (SoilStatus::Dry, PumpStatus::Watering) => SoilCondition {
            soil_status: SoilStatus::Dry,
            advice: "Soil is dry. Watering the plant...",
            cooldown_secs: None,
        },
        (SoilStatus::Dry, PumpStatus::Off) => SoilCondition {
            soil_status: SoilStatus::Dry,
            advice: "Soil is dry, but watering is on hold until cooldown interval expires.",
            cooldown_secs: (report.remaining_cooldown_ms > 0)
                .then_some(report.remaining_cooldown_ms / 1000),
        },
        (SoilStatus::Moist, _) => SoilCondition {
            soil_status: SoilStatus::Moist,
            advice: "Soil is moist. No watering needed.",
            cooldown_secs: None,
        },
    }
}

/// Render the full status line in its stable key order.
pub fn render_status(snapshot: &AggregateSnapshot) -> String {
    let mut out = String::new();

    match snapshot.illumination {
        Some(slot) => {
            let _ = write!(out, "Slave1_Light_Status: {}", slot.report.light_status);
        }
        None => {
            let _ = write!(out, "Slave1_Light_Status: {LOADING}");
        }
    }

    match snapshot.climate {
        Some(slot) => {
            let _ = write!(
                out,
                ", Slave2_Temperature: {:.2}, Slave2_Fan_Status: {}",
                slot.report.temperature_c, slot.report.fan_status
            );
        }
        None => {
            let _ = write!(out, ", Slave2_Temperature: {LOADING}, Slave2_Fan_Status: {LOADING}");
        }
    }

    match snapshot.irrigation {
        Some(slot) => {
            let condition = soil_condition(&slot.report);
            let _ = write!(
                out,
                ", Slave3_Water_Level: {}, Slave3_Water_Container: {}, \
                 Slave3_Soil_Status: {}, Slave3_Water_For_Plant: {}",
                slot.report.water_level,
                slot.report.refill_status,
                condition.soil_status,
                condition.advice,
            );
            if let Some(secs) = condition.cooldown_secs {
                let _ = write!(out, ", Remaining cooldown: {secs} seconds");
            }
        }
        None => {
            let _ = write!(
                out,
                ", Slave3_Water_Level: {LOADING}, Slave3_Water_Container: {LOADING}, \
                 Slave3_Soil_Status: {LOADING}, Slave3_Water_For_Plant: {LOADING}"
            );
        }
    }

    out
}
