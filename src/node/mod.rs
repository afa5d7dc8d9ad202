//! Peripheral node core — pure control logic, zero I/O.
//!
//! Each peripheral runs the same shaped loop on a fixed cadence:
//! read sensors → classify → drive actuators → encode telemetry → send.
//! Classification is pure and deterministic per reading; only the irrigation
//! loop carries cross-cycle state (watering cooldown, refill hysteresis,
//! pulse tracking). All hardware flows through the port traits in [`ports`],
//! keeping the loops fully testable on the host.

pub mod climate;
pub mod events;
pub mod illumination;
pub mod irrigation;
pub mod ports;
pub mod runner;
