//! Mock hardware for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers. Sensor readings are
//! plain fields the test sets between cycles.

use core::cell::Cell;

use greenmesh::node::events::NodeEvent;
use greenmesh::node::ports::{
    ClimateSensor, Clock, EventSink, FanRelay, GrowLight, IlluminationSensor,
    IrrigationActuators, IrrigationSensors,
};
use greenmesh::SensorError;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCall {
    SetDuty(u8),
    SetFan(bool),
    SetWateringPump(bool),
    SetRefillPump(bool),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub ldr: Result<i32, SensorError>,
    pub temperature_c: Result<f32, SensorError>,
    pub soil: Result<i32, SensorError>,
    pub water: Result<i32, SensorError>,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            ldr: Ok(0),
            temperature_c: Ok(20.0),
            soil: Ok(1000),
            water: Ok(1600),
            calls: Vec::new(),
        }
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    pub fn watering_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetWateringPump(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn refill_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetRefillPump(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl IlluminationSensor for MockHardware {
    fn read_light_level(&mut self) -> Result<i32, SensorError> {
        self.ldr
    }
}

impl ClimateSensor for MockHardware {
    fn read_temperature_c(&mut self) -> Result<f32, SensorError> {
        self.temperature_c
    }
}

impl IrrigationSensors for MockHardware {
    fn read_soil_moisture(&mut self) -> Result<i32, SensorError> {
        self.soil
    }

    fn read_water_level(&mut self) -> Result<i32, SensorError> {
        self.water
    }
}

impl GrowLight for MockHardware {
    fn set_duty(&mut self, duty: u8) {
        self.calls.push(ActuatorCall::SetDuty(duty));
    }
}

impl FanRelay for MockHardware {
    fn set_fan(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetFan(on));
    }
}

impl IrrigationActuators for MockHardware {
    fn set_watering_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetWateringPump(on));
    }

    fn set_refill_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetRefillPump(on));
    }
}

// ── Clock and sink ────────────────────────────────────────────

/// Settable monotonic clock.
pub struct StepClock(Cell<u64>);

#[allow(dead_code)]
impl StepClock {
    pub fn at(now_ms: u64) -> Self {
        Self(Cell::new(now_ms))
    }

    pub fn set(&self, now_ms: u64) {
        self.0.set(now_ms);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.0.set(self.0.get() + delta_ms);
    }
}

impl Clock for StepClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// Sink that collects every emitted event.
#[derive(Default)]
pub struct CollectingSink(pub Vec<NodeEvent>);

impl EventSink for CollectingSink {
    fn emit(&mut self, event: &NodeEvent) {
        self.0.push(*event);
    }
}
