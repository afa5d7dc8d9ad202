//! Irrigation loop — the one loop with cross-cycle memory.
//!
//! Two independent sub-states:
//!
//! - **Refill**: binary hysteresis on the reservoir level. ON below the low
//!   threshold, OFF only at/above the full threshold; inside the band the
//!   pump keeps whatever it was doing, so oscillation within the band never
//!   chatters the relay. Commands fire on transitions only.
//! - **Watering**: soil classified Dry strictly above the soil threshold.
//!   A Dry reading outside the cooldown window starts a fixed-duration
//!   watering pulse; within the window the remaining cooldown is reported
//!   instead. Moist readings never refresh the cooldown baseline.
//!
//! The pulse is modeled as an explicit timed state polled each tick rather
//! than a blocking delay, so the loop keeps sensing and reporting while the
//! pump runs. A pulse always runs to completion; a second one cannot start
//! while the first is in flight.

use crate::config::{MeshConfig, WaterBands};
use crate::node::events::NodeEvent;
use crate::node::ports::EventSink;
use crate::telemetry::{IrrigationReport, PumpStatus, RefillStatus, SoilStatus};

/// Classify a soil reading. Dry strictly above the threshold; a reading
/// exactly at the threshold is Moist, deterministically.
pub fn classify_soil(soil_moisture: i32, dry_threshold: i32) -> SoilStatus {
    if soil_moisture > dry_threshold {
        SoilStatus::Dry
    } else {
        SoilStatus::Moist
    }
}

/// Relay commands for one cycle. `None` leaves the relay untouched, which is
/// what keeps the refill hysteresis quiet inside its band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IrrigationCommands {
    pub watering_pump: Option<bool>,
    pub refill_pump: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pulse {
    Idle,
    Active { started_at_ms: u64 },
}

/// The irrigation control loop and its persistent state. Initialized at boot
/// to "never watered, not refilling"; never persisted across power loss.
pub struct IrrigationLoop {
    soil_dry_threshold: i32,
    water: WaterBands,
    cooldown_ms: u32,
    pulse_ms: u32,

    last_watered_ms: Option<u64>,
    refilling: bool,
    refill_status: RefillStatus,
    pulse: Pulse,
}

impl IrrigationLoop {
    pub fn new(config: &MeshConfig) -> Self {
        Self {
            soil_dry_threshold: config.soil_dry_threshold,
            water: config.water,
            cooldown_ms: config.watering_cooldown_ms,
            pulse_ms: config.watering_pulse_ms,
            last_watered_ms: None,
            refilling: false,
            refill_status: RefillStatus::Full,
            pulse: Pulse::Idle,
        }
    }

    /// Whether a watering pulse is currently driving the pump.
    pub fn pulse_active(&self) -> bool {
        matches!(self.pulse, Pulse::Active { .. })
    }

    /// One control cycle.
    ///
    /// `now_ms` must be monotonic. Returns the relay commands for this cycle
    /// and the record to transmit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        soil_moisture: i32,
        water_level: i32,
        sink: &mut impl EventSink,
    ) -> (IrrigationCommands, IrrigationReport) {
        let mut commands = IrrigationCommands::default();

        // ── Refill hysteresis ─────────────────────────────────
        if water_level < self.water.low_threshold && !self.refilling {
            self.refilling = true;
            self.refill_status = RefillStatus::Refilling;
            commands.refill_pump = Some(true);
            sink.emit(&NodeEvent::RefillStarted { level: water_level });
        } else if water_level >= self.water.full_threshold && self.refilling {
            self.refilling = false;
            self.refill_status = RefillStatus::Full;
            commands.refill_pump = Some(false);
            sink.emit(&NodeEvent::RefillStopped { level: water_level });
        }

        // ── Pulse maintenance ─────────────────────────────────
        if let Pulse::Active { started_at_ms } = self.pulse {
            if now_ms.saturating_sub(started_at_ms) >= u64::from(self.pulse_ms) {
                self.pulse = Pulse::Idle;
                commands.watering_pump = Some(false);
                sink.emit(&NodeEvent::WateringFinished);
            }
        }

        // ── Watering decision ─────────────────────────────────
        let soil_status = classify_soil(soil_moisture, self.soil_dry_threshold);
        let (pump_status, remaining_cooldown_ms) = match soil_status {
            SoilStatus::Dry if self.pulse_active() => (PumpStatus::Watering, 0),
            SoilStatus::Dry => {
                let elapsed = self.last_watered_ms.map(|t0| now_ms.saturating_sub(t0));
                match elapsed {
                    Some(e) if e < u64::from(self.cooldown_ms) => {
                        // Still cooling down; report how long is left.
                        (PumpStatus::Off, (u64::from(self.cooldown_ms) - e) as u32)
                    }
                    _ => {
                        self.pulse = Pulse::Active { started_at_ms: now_ms };
                        self.last_watered_ms = Some(now_ms);
                        commands.watering_pump = Some(true);
                        sink.emit(&NodeEvent::WateringStarted { soil_moisture });
                        (PumpStatus::Watering, 0)
                    }
                }
            }
            SoilStatus::Moist => {
                // An in-flight pulse still runs to completion.
                let status = if self.pulse_active() { PumpStatus::Watering } else { PumpStatus::Off };
                if !self.pulse_active() {
                    commands.watering_pump = Some(false);
                }
                (status, 0)
            }
        };

        let report = IrrigationReport {
            soil_moisture,
            soil_status,
            pump_status,
            water_level,
            refill_status: self.refill_status,
            remaining_cooldown_ms,
        };
        (commands, report)
    }
}
