//! System configuration parameters.
//!
//! Everything the original firmware hardcoded — network credentials, the peer
//! address table, classification thresholds, watering timing — externalized
//! with the same semantics and units. Values load from JSON (NVS blob or
//! provisioning) and fall back to [`MeshConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mesh::{PeerIdentity, PeerTable, Role};

fn s<const N: usize>(value: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    let _ = out.push_str(value);
    out
}

/// Which node this firmware image runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    Coordinator,
    Peripheral(Role),
}

/// One row of the fixed peer table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeerEntry {
    pub address: PeerIdentity,
    pub role: Role,
}

/// Light-level classification bands and the grow-light duty mapping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LightBands {
    /// Readings above this (exclusive) leave the OFF band.
    pub dim_threshold: i32,
    /// Readings above this (exclusive) are FULL_ON.
    pub full_threshold: i32,
    /// Duty at the bottom of the DIM band (8-bit PWM).
    pub duty_dim_low: u8,
    /// Duty at the top of the DIM band.
    pub duty_dim_high: u8,
    /// Duty when FULL_ON.
    pub duty_full: u8,
}

/// Water-level hysteresis band for the reservoir refill pump.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaterBands {
    /// Refill turns ON below this level.
    pub low_threshold: i32,
    /// Refill turns OFF at or above this level.
    pub full_threshold: i32,
}

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshConfig {
    // --- Node ---
    pub node_role: NodeRole,

    // --- Reference network (channel rendezvous target) ---
    pub reference_ssid: heapless::String<32>,
    pub reference_password: heapless::String<64>,

    // --- Coordinator access point (dashboard side) ---
    pub ap_ssid: heapless::String<32>,
    pub ap_password: heapless::String<64>,
    pub ap_address: heapless::String<16>,
    pub ap_gateway: heapless::String<16>,
    pub ap_netmask: heapless::String<16>,

    // --- Peer table ---
    pub coordinator: PeerIdentity,
    pub peers: heapless::Vec<PeerEntry, 8>,
    /// Channel assumed before rendezvous.
    pub initial_channel: u8,

    // --- Classification thresholds ---
    pub light: LightBands,
    /// Fan turns ON strictly above this temperature (°C).
    pub fan_on_temperature_c: f32,
    /// Soil reads Dry strictly above this raw value.
    pub soil_dry_threshold: i32,
    pub water: WaterBands,

    // --- Irrigation timing ---
    /// Minimum time between watering pulses (ms).
    pub watering_cooldown_ms: u32,
    /// Duration of one watering pulse (ms).
    pub watering_pulse_ms: u32,

    // --- Cadence / policy ---
    /// Control-loop period on every node (ms).
    pub loop_period_ms: u32,
    /// Aggregator slots older than this are flagged stale (ms).
    pub telemetry_ttl_ms: u32,
    /// Bounded retries for radio init and peer registration.
    pub link_init_attempts: u8,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            node_role: NodeRole::Coordinator,

            reference_ssid: s("josip"),
            reference_password: s("12345678"),

            ap_ssid: s("ESP32_WS"),
            ap_password: s("helloesp32WS"),
            ap_address: s("192.168.1.1"),
            ap_gateway: s("192.168.1.1"),
            ap_netmask: s("255.255.255.0"),

            coordinator: PeerIdentity::new([0xfc, 0xe8, 0xc0, 0x74, 0x50, 0x14]),
            peers: heapless::Vec::from_slice(&[
                PeerEntry {
                    address: PeerIdentity::new([0x88, 0x13, 0xbf, 0x0c, 0x42, 0x94]),
                    role: Role::Illumination,
                },
                PeerEntry {
                    address: PeerIdentity::new([0xcc, 0x7b, 0x5c, 0x35, 0x48, 0xfc]),
                    role: Role::Climate,
                },
                PeerEntry {
                    address: PeerIdentity::new([0xac, 0x15, 0x18, 0xd4, 0xa6, 0xd4]),
                    role: Role::Irrigation,
                },
            ])
            .unwrap_or_default(),
            initial_channel: 1,

            light: LightBands {
                dim_threshold: 500,
                full_threshold: 1000,
                duty_dim_low: 50,
                duty_dim_high: 200,
                duty_full: 255,
            },
            fan_on_temperature_c: 32.0,
            soil_dry_threshold: 1900,
            water: WaterBands { low_threshold: 1300, full_threshold: 1550 },

            watering_cooldown_ms: 10_000,
            watering_pulse_ms: 5_000,

            loop_period_ms: 1_000,
            telemetry_ttl_ms: 10_000,
            link_init_attempts: 3,
        }
    }
}

impl MeshConfig {
    /// Range/ordering validation. Invalid configs are rejected, not clamped.
    pub fn validate(&self) -> Result<()> {
        if self.light.dim_threshold >= self.light.full_threshold {
            return Err(Error::Config("light dim threshold must be below full threshold"));
        }
        if self.light.duty_dim_low >= self.light.duty_dim_high {
            return Err(Error::Config("dim duty range is inverted"));
        }
        if self.water.low_threshold >= self.water.full_threshold {
            return Err(Error::Config("water hysteresis band is inverted"));
        }
        if self.watering_pulse_ms == 0 || self.watering_cooldown_ms == 0 {
            return Err(Error::Config("watering durations must be nonzero"));
        }
        if self.loop_period_ms == 0 {
            return Err(Error::Config("loop period must be nonzero"));
        }
        if self.link_init_attempts == 0 {
            return Err(Error::Config("link init attempts must be nonzero"));
        }
        if self.peers.is_empty() {
            return Err(Error::Config("peer table is empty"));
        }
        Ok(())
    }

    /// Build the role-lookup table the coordinator keys aggregation on.
    pub fn peer_table(&self) -> Result<PeerTable> {
        let mut table = PeerTable::new();
        for entry in &self.peers {
            table
                .add(entry.address, entry.role)
                .map_err(Error::Config)?;
        }
        Ok(table)
    }

    /// Configured identity for a peripheral role, if present.
    pub fn peer_address(&self, role: Role) -> Option<PeerIdentity> {
        self.peers
            .iter()
            .find(|e| e.role == role)
            .map(|e| e.address)
    }

    /// Parse a JSON configuration blob.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|_| Error::Config("malformed config JSON"))?;
        config.validate()?;
        Ok(config)
    }
}
