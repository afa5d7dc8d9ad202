//! Canonical packed wire layouts for the telemetry records.
//!
//! Layouts are little-endian with no padding, so heterogeneous runtimes can
//! interoperate without sharing a compiler's struct layout:
//!
//! ```text
//! Illumination (24 B): ┌ i32 ldr ┬ [u8;20] light_status ┐
//! Climate      (24 B): ┌ f32 temp ┬ [u8;20] fan_status  ┐
//! Irrigation   (62 B): ┌ i32 soil ┬ [u8;10] soil_status ┬ [u8;20] pump_status
//!                      ┬ i32 water ┬ [u8;20] refill_status ┬ u32 cooldown ┐
//! ```
//!
//! Status fields are NUL-padded ASCII tokens. The link carries no type tag:
//! [`decode`] must be called with the role implied by the sender's identity,
//! never guessed from the bytes. Malformed or undersized input is a
//! detectable [`CodecError`], not an out-of-bounds read.

use core::fmt;

use crate::mesh::Role;
use crate::telemetry::{
    ClimateReport, FanStatus, IlluminationReport, IrrigationReport, LightStatus, PumpStatus,
    RefillStatus, SoilStatus, TelemetryRecord,
};

/// Wire size of the short status fields (soil status).
const TOKEN_SHORT: usize = 10;
/// Wire size of the regular status fields.
const TOKEN_LONG: usize = 20;

pub const ILLUMINATION_WIRE_LEN: usize = 4 + TOKEN_LONG;
pub const CLIMATE_WIRE_LEN: usize = 4 + TOKEN_LONG;
pub const IRRIGATION_WIRE_LEN: usize = 4 + TOKEN_SHORT + TOKEN_LONG + 4 + TOKEN_LONG + 4;

/// Fixed wire length of a role's record.
pub const fn wire_len(role: Role) -> usize {
    match role {
        Role::Illumination => ILLUMINATION_WIRE_LEN,
        Role::Climate => CLIMATE_WIRE_LEN,
        Role::Irrigation => IRRIGATION_WIRE_LEN,
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Input shorter (or longer) than the role's fixed record length, or the
    /// output buffer cannot hold the record.
    Length { expected: usize, got: usize },
    /// A status field held no recognized token.
    BadToken,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { expected, got } => {
                write!(f, "bad record length: expected {expected}, got {got}")
            }
            Self::BadToken => write!(f, "unrecognized status token"),
        }
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

fn put_token(buf: &mut [u8], token: &str) {
    buf.fill(0);
    // Tokens are compile-time constants well under the field width.
    let bytes = token.as_bytes();
    buf[..bytes.len()].copy_from_slice(bytes);
}

/// Read a NUL-padded ASCII token. Bytes after the first NUL are ignored,
/// matching how the original C structs were consumed.
fn get_token(buf: &[u8]) -> Result<&str, CodecError> {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    core::str::from_utf8(&buf[..end]).map_err(|_| CodecError::BadToken)
}

fn check_len(expected: usize, got: usize) -> Result<(), CodecError> {
    if expected == got {
        Ok(())
    } else {
        Err(CodecError::Length { expected, got })
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Encode a record into `out`, returning the number of bytes written.
///
/// `out` must be at least the role's [`wire_len`]; every valid record maps to
/// exactly one byte sequence of that length.
pub fn encode(record: &TelemetryRecord, out: &mut [u8]) -> Result<usize, CodecError> {
    let len = wire_len(record.role());
    if out.len() < len {
        return Err(CodecError::Length { expected: len, got: out.len() });
    }

    match record {
        TelemetryRecord::Illumination(r) => {
            out[0..4].copy_from_slice(&r.ldr_value.to_le_bytes());
            put_token(&mut out[4..24], r.light_status.token());
        }
        TelemetryRecord::Climate(r) => {
            out[0..4].copy_from_slice(&r.temperature_c.to_le_bytes());
            put_token(&mut out[4..24], r.fan_status.token());
        }
        TelemetryRecord::Irrigation(r) => {
            out[0..4].copy_from_slice(&r.soil_moisture.to_le_bytes());
            put_token(&mut out[4..14], r.soil_status.token());
            put_token(&mut out[14..34], r.pump_status.token());
            out[34..38].copy_from_slice(&r.water_level.to_le_bytes());
            put_token(&mut out[38..58], r.refill_status.token());
            out[58..62].copy_from_slice(&r.remaining_cooldown_ms.to_le_bytes());
        }
    }
    Ok(len)
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Decode `bytes` under the schema of `role`.
///
/// Total over inputs of the role's exact wire length; anything else is a
/// [`CodecError::Length`]. Must never be attempted across roles.
pub fn decode(role: Role, bytes: &[u8]) -> Result<TelemetryRecord, CodecError> {
    check_len(wire_len(role), bytes.len())?;

    let record = match role {
        Role::Illumination => {
            let ldr_value = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            let light_status =
                LightStatus::from_token(get_token(&bytes[4..24])?).ok_or(CodecError::BadToken)?;
            TelemetryRecord::Illumination(IlluminationReport { ldr_value, light_status })
        }
        Role::Climate => {
            let temperature_c = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            let fan_status =
                FanStatus::from_token(get_token(&bytes[4..24])?).ok_or(CodecError::BadToken)?;
            TelemetryRecord::Climate(ClimateReport { temperature_c, fan_status })
        }
        Role::Irrigation => {
            let soil_moisture = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            let soil_status =
                SoilStatus::from_token(get_token(&bytes[4..14])?).ok_or(CodecError::BadToken)?;
            let pump_status =
                PumpStatus::from_token(get_token(&bytes[14..34])?).ok_or(CodecError::BadToken)?;
            let water_level = i32::from_le_bytes([bytes[34], bytes[35], bytes[36], bytes[37]]);
            let refill_status = RefillStatus::from_token(get_token(&bytes[38..58])?)
                .ok_or(CodecError::BadToken)?;
            let remaining_cooldown_ms =
                u32::from_le_bytes([bytes[58], bytes[59], bytes[60], bytes[61]]);
            TelemetryRecord::Irrigation(IrrigationReport {
                soil_moisture,
                soil_status,
                pump_status,
                water_level,
                refill_status,
                remaining_cooldown_ms,
            })
        }
    };
    Ok(record)
}
