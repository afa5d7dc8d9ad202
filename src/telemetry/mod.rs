//! Fixed-schema telemetry records exchanged peripheral → coordinator.
//!
//! One record type per peripheral role. Status fields travel as short ASCII
//! tokens (the original dashboards display them verbatim), numeric fields as
//! little-endian scalars; see [`codec`] for the canonical packed layouts.

pub mod codec;

use core::fmt;

use crate::mesh::Role;

// ---------------------------------------------------------------------------
// Status enums (wire tokens in `token()`)
// ---------------------------------------------------------------------------

/// Grow-light state derived from the light-level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightStatus {
    Off,
    Dim,
    FullOn,
}

impl LightStatus {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Dim => "DIM",
            Self::FullOn => "ON",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "OFF" => Some(Self::Off),
            "DIM" => Some(Self::Dim),
            "ON" => Some(Self::FullOn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanStatus {
    On,
    Off,
}

impl FanStatus {
    pub const fn token(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ON" => Some(Self::On),
            "OFF" => Some(Self::Off),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoilStatus {
    Dry,
    Moist,
}

impl SoilStatus {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Dry => "Dry",
            Self::Moist => "Moist",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Dry" => Some(Self::Dry),
            "Moist" => Some(Self::Moist),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStatus {
    Watering,
    Off,
}

impl PumpStatus {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Watering => "Watering",
            Self::Off => "Off",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Watering" => Some(Self::Watering),
            "Off" => Some(Self::Off),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillStatus {
    Refilling,
    Full,
}

impl RefillStatus {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Refilling => "Refilling",
            Self::Full => "Full",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Refilling" => Some(Self::Refilling),
            "Full" => Some(Self::Full),
            _ => None,
        }
    }
}

macro_rules! display_via_token {
    ($($ty:ty),+) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    )+};
}

display_via_token!(LightStatus, FanStatus, SoilStatus, PumpStatus, RefillStatus);

// ---------------------------------------------------------------------------
// Per-role records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IlluminationReport {
    /// Raw LDR reading (12-bit ADC range in practice).
    pub ldr_value: i32,
    pub light_status: LightStatus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReport {
    pub temperature_c: f32,
    pub fan_status: FanStatus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrigationReport {
    pub soil_moisture: i32,
    pub soil_status: SoilStatus,
    pub pump_status: PumpStatus,
    pub water_level: i32,
    pub refill_status: RefillStatus,
    /// Milliseconds until the next watering pulse may fire; 0 when the soil
    /// is moist or a pulse just ran.
    pub remaining_cooldown_ms: u32,
}

/// Closed union over the three role schemas. Produced at the decode boundary
/// where the sender's role is already known from its identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryRecord {
    Illumination(IlluminationReport),
    Climate(ClimateReport),
    Irrigation(IrrigationReport),
}

impl TelemetryRecord {
    pub fn role(&self) -> Role {
        match self {
            Self::Illumination(_) => Role::Illumination,
            Self::Climate(_) => Role::Climate,
            Self::Irrigation(_) => Role::Irrigation,
        }
    }
}
