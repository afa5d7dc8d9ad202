//! Coordinator core — last-known-state aggregation keyed by sender identity.
//!
//! The aggregator owns one slot per peripheral role, overwritten on every
//! inbound record (no history). Unrecognized senders and undecodable frames
//! are discarded without touching any slot. Each slot carries the receive
//! timestamp so consumers can apply a staleness policy — the link itself has
//! no timeout, and a silent peripheral is otherwise invisible.

pub mod projection;

use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use log::{debug, warn};

use crate::mesh::{PeerIdentity, PeerTable, Role};
use crate::telemetry::codec::{self, CodecError};
use crate::telemetry::{ClimateReport, IlluminationReport, IrrigationReport, TelemetryRecord};

// ---------------------------------------------------------------------------
// Slots and snapshot
// ---------------------------------------------------------------------------

/// The latest record for one role plus when it arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot<R> {
    pub report: R,
    pub received_at_ms: u64,
}

/// Freshness of a slot under the configured TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Nothing has ever arrived for this role.
    NoData,
    Fresh,
    Stale,
}

/// A consistent copy of every slot, safe to hand to the projection layer
/// while the receive path keeps ingesting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateSnapshot {
    pub illumination: Option<Slot<IlluminationReport>>,
    pub climate: Option<Slot<ClimateReport>>,
    pub irrigation: Option<Slot<IrrigationReport>>,
}

impl AggregateSnapshot {
    /// Age of a role's slot in milliseconds, `None` if no data yet.
    pub fn age_ms(&self, role: Role, now_ms: u64) -> Option<u64> {
        let received = match role {
            Role::Illumination => self.illumination.map(|s| s.received_at_ms),
            Role::Climate => self.climate.map(|s| s.received_at_ms),
            Role::Irrigation => self.irrigation.map(|s| s.received_at_ms),
        }?;
        Some(now_ms.saturating_sub(received))
    }

    /// Staleness classification under `ttl_ms`.
    pub fn freshness(&self, role: Role, now_ms: u64, ttl_ms: u32) -> Freshness {
        match self.age_ms(role, now_ms) {
            None => Freshness::NoData,
            Some(age) if age > u64::from(ttl_ms) => Freshness::Stale,
            Some(_) => Freshness::Fresh,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateError {
    /// Sender identity is not in the peer table.
    UnknownSender(PeerIdentity),
    /// Record failed to decode under the sender's role schema.
    Decode(CodecError),
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSender(id) => write!(f, "unrecognized sender {id}"),
            Self::Decode(e) => write!(f, "decode failed: {e}"),
        }
    }
}

impl From<CodecError> for AggregateError {
    fn from(e: CodecError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Owns the per-role slots. Single writer (the receive path); readers take
/// snapshots through [`SharedAggregator`].
pub struct Aggregator {
    peers: PeerTable,
    snapshot: AggregateSnapshot,
}

impl Aggregator {
    pub fn new(peers: PeerTable) -> Self {
        Self { peers, snapshot: AggregateSnapshot::default() }
    }

    /// Ingest one inbound record: resolve the sender's role, decode under
    /// that schema, overwrite the slot. Returns the role on success; on any
    /// error the state is untouched.
    pub fn ingest(
        &mut self,
        sender: PeerIdentity,
        payload: &[u8],
        now_ms: u64,
    ) -> Result<Role, AggregateError> {
        let Some(role) = self.peers.role_of(sender) else {
            warn!("discarding record from unrecognized sender {sender}");
            return Err(AggregateError::UnknownSender(sender));
        };

        match codec::decode(role, payload)? {
            TelemetryRecord::Illumination(report) => {
                self.snapshot.illumination = Some(Slot { report, received_at_ms: now_ms });
            }
            TelemetryRecord::Climate(report) => {
                self.snapshot.climate = Some(Slot { report, received_at_ms: now_ms });
            }
            TelemetryRecord::Irrigation(report) => {
                self.snapshot.irrigation = Some(Slot { report, received_at_ms: now_ms });
            }
        }
        debug!("updated {role} slot from {sender}");
        Ok(role)
    }

    /// Current value of all slots.
    pub fn snapshot(&self) -> AggregateSnapshot {
        self.snapshot
    }
}

// ---------------------------------------------------------------------------
// Shared wrapper
// ---------------------------------------------------------------------------

/// Critical-section wrapper so the radio receive context can ingest while
/// the dashboard side reads, without either observing a half-written record.
pub struct SharedAggregator {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Aggregator>>,
}

impl SharedAggregator {
    pub fn new(aggregator: Aggregator) -> Self {
        Self { inner: Mutex::new(RefCell::new(aggregator)) }
    }

    pub fn ingest(
        &self,
        sender: PeerIdentity,
        payload: &[u8],
        now_ms: u64,
    ) -> Result<Role, AggregateError> {
        self.inner
            .lock(|cell| cell.borrow_mut().ingest(sender, payload, now_ms))
    }

    pub fn snapshot(&self) -> AggregateSnapshot {
        self.inner.lock(|cell| cell.borrow().snapshot())
    }
}
