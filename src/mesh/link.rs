//! Connectionless point-to-multipoint radio link.
//!
//! The link is best-effort and unacknowledged at this layer: [`RadioLink::send`]
//! only reports whether the radio accepted the frame locally, and the actual
//! delivery outcome arrives later through [`RadioLink::poll_delivery`]. There
//! is no timeout or retry here — a silent peer is visible only as an
//! aggregator slot that stops changing, and the periodic node loops retry
//! naturally on their next cycle.

use core::fmt;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::mesh::PeerIdentity;

/// Largest record crossing the link (irrigation, 62 bytes) plus slack.
pub const MAX_FRAME_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Radio subsystem failed to initialise.
    InitFailed,
    /// The underlying peer registration table is full.
    PeerTableFull,
    /// Identity is already registered.
    DuplicatePeer,
    /// Destination was never registered with [`RadioLink::register_peer`].
    NotRegistered,
    /// Payload exceeds [`MAX_FRAME_LEN`].
    TooLong,
    /// The radio rejected the frame (busy or hardware error).
    SendRejected,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => write!(f, "radio init failed"),
            Self::PeerTableFull => write!(f, "peer table full"),
            Self::DuplicatePeer => write!(f, "peer already registered"),
            Self::NotRegistered => write!(f, "peer not registered"),
            Self::TooLong => write!(f, "frame too long"),
            Self::SendRejected => write!(f, "send rejected by radio"),
        }
    }
}

// ---------------------------------------------------------------------------
// Frames and delivery reports
// ---------------------------------------------------------------------------

/// A record received from the radio, tagged with its sender.
#[derive(Debug, Clone)]
pub struct InboundFrame {
    pub sender: PeerIdentity,
    pub payload: heapless::Vec<u8, MAX_FRAME_LEN>,
}

impl InboundFrame {
    /// Build a frame from a raw receive callback. `Err` when the payload
    /// exceeds [`MAX_FRAME_LEN`].
    pub fn from_raw(sender: PeerIdentity, bytes: &[u8]) -> core::result::Result<Self, LinkError> {
        let payload = heapless::Vec::from_slice(bytes).map_err(|()| LinkError::TooLong)?;
        Ok(Self { sender, payload })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    Failed,
}

/// Asynchronous per-send outcome, decoupled from the `send` call itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub peer: PeerIdentity,
    pub status: DeliveryStatus,
}

// ---------------------------------------------------------------------------
// The link port
// ---------------------------------------------------------------------------

/// Port trait for the connectionless radio link.
///
/// Implemented by the ESP-NOW adapter on target and [`MockLink`] on host.
pub trait RadioLink {
    /// Declare an identity as reachable. Must be called once per known peer
    /// before sending to it.
    fn register_peer(&mut self, peer: PeerIdentity) -> core::result::Result<(), LinkError>;

    /// Queue a frame for transmission. `Ok` means locally accepted only;
    /// the delivery outcome arrives later via [`poll_delivery`].
    ///
    /// [`poll_delivery`]: RadioLink::poll_delivery
    fn send(&mut self, peer: PeerIdentity, payload: &[u8]) -> core::result::Result<(), LinkError>;

    /// Drain one pending delivery report, if any.
    fn poll_delivery(&mut self) -> Option<DeliveryReport>;
}

/// Register every peer with bounded retries, failing fast after `attempts`.
///
/// An already-registered identity counts as success. This replaces the
/// log-and-limp-on setup style with an explicit degraded-mode decision left
/// to the caller.
pub fn register_peers<I>(link: &mut impl RadioLink, peers: I, attempts: u8) -> Result<()>
where
    I: IntoIterator<Item = PeerIdentity>,
{
    for peer in peers {
        let mut registered = false;
        for attempt in 1..=attempts.max(1) {
            match link.register_peer(peer) {
                Ok(()) | Err(LinkError::DuplicatePeer) => {
                    registered = true;
                    break;
                }
                Err(e) => {
                    warn!("peer {peer} registration attempt {attempt}/{attempts} failed: {e}");
                }
            }
        }
        if !registered {
            return Err(Error::Init("peer registration failed"));
        }
        info!("peer {peer} registered");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Host-side mock
// ---------------------------------------------------------------------------

/// In-memory link for host tests: records every send and replays scripted
/// delivery reports.
#[cfg(not(target_os = "espidf"))]
pub struct MockLink {
    pub peers: Vec<PeerIdentity>,
    pub sent: Vec<(PeerIdentity, Vec<u8>)>,
    pub pending_reports: std::collections::VecDeque<DeliveryReport>,
    /// Number of upcoming `register_peer` calls to reject.
    pub reject_registrations: usize,
    /// When set, every `send` is rejected as if the radio were busy.
    pub reject_sends: bool,
    capacity: usize,
}

#[cfg(not(target_os = "espidf"))]
impl MockLink {
    pub fn new() -> Self {
        Self {
            peers: Vec::new(),
            sent: Vec::new(),
            pending_reports: std::collections::VecDeque::new(),
            reject_registrations: 0,
            reject_sends: false,
            capacity: 8,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, ..Self::new() }
    }

    /// Queue a delivery report to be returned by `poll_delivery`.
    pub fn script_delivery(&mut self, peer: PeerIdentity, status: DeliveryStatus) {
        self.pending_reports.push_back(DeliveryReport { peer, status });
    }

    pub fn last_sent(&self) -> Option<&(PeerIdentity, Vec<u8>)> {
        self.sent.last()
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for MockLink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl RadioLink for MockLink {
    fn register_peer(&mut self, peer: PeerIdentity) -> core::result::Result<(), LinkError> {
        if self.reject_registrations > 0 {
            self.reject_registrations -= 1;
            return Err(LinkError::SendRejected);
        }
        if self.peers.contains(&peer) {
            return Err(LinkError::DuplicatePeer);
        }
        if self.peers.len() >= self.capacity {
            return Err(LinkError::PeerTableFull);
        }
        self.peers.push(peer);
        Ok(())
    }

    fn send(&mut self, peer: PeerIdentity, payload: &[u8]) -> core::result::Result<(), LinkError> {
        if payload.len() > MAX_FRAME_LEN {
            return Err(LinkError::TooLong);
        }
        if !self.peers.contains(&peer) {
            return Err(LinkError::NotRegistered);
        }
        if self.reject_sends {
            return Err(LinkError::SendRejected);
        }
        self.sent.push((peer, payload.to_vec()));
        Ok(())
    }

    fn poll_delivery(&mut self) -> Option<DeliveryReport> {
        self.pending_reports.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEER: PeerIdentity = PeerIdentity::new([1, 2, 3, 4, 5, 6]);

    #[test]
    fn send_requires_registration() {
        let mut link = MockLink::new();
        assert_eq!(link.send(PEER, b"hi"), Err(LinkError::NotRegistered));

        link.register_peer(PEER).unwrap();
        link.send(PEER, b"hi").unwrap();
        assert_eq!(link.last_sent().unwrap().1, b"hi");
    }

    #[test]
    fn register_peers_retries_then_succeeds() {
        let mut link = MockLink::new();
        link.reject_registrations = 2;
        register_peers(&mut link, [PEER], 3).unwrap();
        assert_eq!(link.peers, [PEER]);
    }

    #[test]
    fn register_peers_fails_fast_after_bound() {
        let mut link = MockLink::new();
        link.reject_registrations = 3;
        let err = register_peers(&mut link, [PEER], 3).unwrap_err();
        assert_eq!(err, Error::Init("peer registration failed"));
    }

    #[test]
    fn duplicate_registration_is_success() {
        let mut link = MockLink::new();
        link.register_peer(PEER).unwrap();
        register_peers(&mut link, [PEER], 1).unwrap();
    }

    #[test]
    fn delivery_reports_are_decoupled_from_send() {
        let mut link = MockLink::new();
        link.register_peer(PEER).unwrap();
        link.send(PEER, b"frame").unwrap();

        assert_eq!(link.poll_delivery(), None);
        link.script_delivery(PEER, DeliveryStatus::Failed);
        assert_eq!(
            link.poll_delivery(),
            Some(DeliveryReport { peer: PEER, status: DeliveryStatus::Failed })
        );
        assert_eq!(link.poll_delivery(), None);
    }
}
