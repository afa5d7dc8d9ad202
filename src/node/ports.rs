//! Port traits — the boundary between node control logic and hardware.
//!
//! Driven adapters (ADC readers, relay/PWM drivers, the system clock)
//! implement these; the loop runners in [`runner`](super::runner) consume
//! them via generics, so the domain never touches a register directly.

use crate::error::SensorError;
use crate::node::events::NodeEvent;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Monotonic milliseconds since boot. Drives cooldown and pulse timing.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ---------------------------------------------------------------------------
// Sensor ports (hardware → domain)
// ---------------------------------------------------------------------------

pub trait IlluminationSensor {
    /// Raw light-dependent-resistor reading.
    fn read_light_level(&mut self) -> Result<i32, SensorError>;
}

pub trait ClimateSensor {
    /// Ambient temperature in °C. DHT-class probes fail routinely; callers
    /// skip the cycle on `Err` (fail-safe-hold).
    fn read_temperature_c(&mut self) -> Result<f32, SensorError>;
}

pub trait IrrigationSensors {
    fn read_soil_moisture(&mut self) -> Result<i32, SensorError>;
    fn read_water_level(&mut self) -> Result<i32, SensorError>;
}

// ---------------------------------------------------------------------------
// Actuator ports (domain → hardware)
// ---------------------------------------------------------------------------

pub trait GrowLight {
    /// 8-bit PWM duty for the grow light.
    fn set_duty(&mut self, duty: u8);
}

pub trait FanRelay {
    fn set_fan(&mut self, on: bool);
}

pub trait IrrigationActuators {
    fn set_watering_pump(&mut self, on: bool);
    fn set_refill_pump(&mut self, on: bool);
}

// ---------------------------------------------------------------------------
// Event sink (domain → logging / telemetry)
// ---------------------------------------------------------------------------

/// The loops emit structured [`NodeEvent`]s through this port. Adapters
/// decide where they go (serial log on target, a recording sink in tests).
pub trait EventSink {
    fn emit(&mut self, event: &NodeEvent);
}
