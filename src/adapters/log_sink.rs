//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured node events to the logger
//! (UART / USB-CDC on target). A future MQTT adapter would implement the
//! same trait.

use log::{info, warn};

use crate::node::events::NodeEvent;
use crate::node::ports::EventSink;

/// Adapter that logs every [`NodeEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::TelemetrySent(role) => info!("TELEM | {role} record sent"),
            NodeEvent::SendRejected { role, error } => {
                warn!("TELEM | {role} send rejected: {error}");
            }
            NodeEvent::DeliveryFailed { peer } => warn!("LINK  | delivery to {peer} failed"),
            NodeEvent::CycleSkipped { role, error } => {
                warn!("CYCLE | {role} skipped: {error}");
            }
            NodeEvent::RefillStarted { level } => info!("WATER | refill on (level {level})"),
            NodeEvent::RefillStopped { level } => info!("WATER | refill off (level {level})"),
            NodeEvent::WateringStarted { soil_moisture } => {
                info!("WATER | watering pulse started (soil {soil_moisture})");
            }
            NodeEvent::WateringFinished => info!("WATER | watering pulse finished"),
        }
    }
}
