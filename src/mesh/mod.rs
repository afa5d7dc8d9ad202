//! Mesh plumbing — peer identities, channel rendezvous, and the radio link.
//!
//! The mesh is a star: one coordinator, three peripherals, all rendezvousing
//! on the channel of an existing infrastructure network (see [`channel`]).
//! Peer identities are fixed at build/config time; there is no discovery.

pub mod channel;
pub mod link;
pub mod mailbox;

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Peer identity
// ---------------------------------------------------------------------------

/// A 6-byte physical radio address. Uniquely identifies the sender of a
/// received record; the coordinator uses it as its aggregation key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerIdentity(pub [u8; 6]);

impl PeerIdentity {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl fmt::Debug for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerIdentity({self})")
    }
}

// ---------------------------------------------------------------------------
// Peripheral roles
// ---------------------------------------------------------------------------

/// The three peripheral roles. A received record is meaningful only under the
/// schema of its sender's role — the wire carries no type tag, so the role is
/// inferred solely from the sender's [`PeerIdentity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Illumination,
    Climate,
    Irrigation,
}

impl Role {
    pub const COUNT: usize = 3;

    pub const ALL: [Role; Role::COUNT] = [Role::Illumination, Role::Climate, Role::Irrigation];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Illumination => write!(f, "illumination"),
            Self::Climate => write!(f, "climate"),
            Self::Irrigation => write!(f, "irrigation"),
        }
    }
}

// ---------------------------------------------------------------------------
// Peer table
// ---------------------------------------------------------------------------

/// Fixed (identity, role) table loaded from configuration.
///
/// The coordinator resolves inbound senders through [`role_of`]; peripherals
/// resolve the coordinator's address through the owning config. Capacity
/// leaves headroom for nodes outside the control core (e.g. a door node).
///
/// [`role_of`]: PeerTable::role_of
#[derive(Debug, Clone, Default)]
pub struct PeerTable {
    entries: heapless::Vec<(PeerIdentity, Role), 8>,
}

impl PeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a peer. Returns `Err` when the table is full or the identity is
    /// already present (identities must be unique keys).
    pub fn add(&mut self, identity: PeerIdentity, role: Role) -> core::result::Result<(), &'static str> {
        if self.role_of(identity).is_some() {
            return Err("duplicate peer identity");
        }
        self.entries
            .push((identity, role))
            .map_err(|_| "peer table full")
    }

    /// Role lookup for an inbound sender. `None` means unrecognized sender.
    pub fn role_of(&self, identity: PeerIdentity) -> Option<Role> {
        self.entries
            .iter()
            .find(|(id, _)| *id == identity)
            .map(|(_, role)| *role)
    }

    /// Reverse lookup: the configured identity for a role, if any.
    pub fn identity_of(&self, role: Role) -> Option<PeerIdentity> {
        self.entries
            .iter()
            .find(|(_, r)| *r == role)
            .map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PeerIdentity, Role)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
