//! Greenmesh firmware library.
//!
//! Coordination and control core for a small ESP-NOW greenhouse mesh: one
//! coordinator aggregating telemetry from three peripheral nodes
//! (illumination, climate, irrigation), all rendezvousing on the channel of
//! a reference Wi-Fi network at boot.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod config;
pub mod coordinator;
pub mod mesh;
pub mod node;
pub mod telemetry;

pub mod adapters;

pub mod pins;

mod error;

pub use error::{ActuatorError, Error, Result, SensorError};
