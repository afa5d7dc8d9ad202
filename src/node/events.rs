//! Outbound node events.
//!
//! Emitted by the control loops and runners through the
//! [`EventSink`](super::ports::EventSink) port; the log sink adapter turns
//! them into serial output on target.

use crate::error::SensorError;
use crate::mesh::link::LinkError;
use crate::mesh::{PeerIdentity, Role};

/// Structured events emitted by a peripheral node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeEvent {
    /// A telemetry record was handed to the radio.
    TelemetrySent(Role),
    /// The radio rejected a send locally; the next cycle retries naturally.
    SendRejected { role: Role, error: LinkError },
    /// An earlier send was reported undelivered.
    DeliveryFailed { peer: PeerIdentity },
    /// A sensor read failed; the cycle was skipped and actuators hold state.
    CycleSkipped { role: Role, error: SensorError },

    // ── Irrigation sub-state transitions ──────────────────────
    /// Reservoir refill pump switched on (level below the low threshold).
    RefillStarted { level: i32 },
    /// Reservoir refill pump switched off (level reached the full threshold).
    RefillStopped { level: i32 },
    /// A watering pulse began; soil was dry and the cooldown had expired.
    WateringStarted { soil_moisture: i32 },
    /// The watering pulse ran its fixed duration and the pump stopped.
    WateringFinished,
}
