//! # Synchronization Handlers
//!
//! Apply decoded packets to the three state domains.
//!
//! - [`player`]: per-kind request/update policy for the local player and
//!   remote players
//! - [`combat`]: remote attack resolution
//! - [`actor`]: actor lists and actor authority per cell
//! - [`world`]: object, script, door and media events
//!
//! All handlers share one [`SessionContext`] owned by the session. Replies are
//! queued on the context and flushed by the session after each datagram.

use tracing::{debug, info, warn};

use crate::content::ContentManifest;
use crate::core::packet::{Guid, Packet};
use crate::entity::{PlayerDirectory, PlayerState};
use crate::transport::Reliability;

pub mod actor;
pub mod combat;
pub mod player;
pub mod world;

/// What a handler did with a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State was changed
    Applied,
    /// A reply carrying current state was queued
    Replied,
    /// A precondition did not hold (cell not loaded, unknown remote)
    Skipped,
    /// The kind has nothing to do for this originator
    Ignored,
}

/// Per-session state threaded through every handler.
#[derive(Debug)]
pub struct SessionContext {
    local_guid: Guid,
    identity_reassigned: bool,
    /// Wire-side copy of the local player
    pub local: PlayerState,
    pub players: PlayerDirectory,
    /// Manifest sent during bootstrap, kept to explain the server's answer
    pub manifest: Option<ContentManifest>,
    outbox: Vec<(Packet, Reliability)>,
}

impl SessionContext {
    pub fn new(local_guid: Guid) -> Self {
        Self {
            local_guid,
            identity_reassigned: false,
            local: PlayerState::new(local_guid),
            players: PlayerDirectory::new(),
            manifest: None,
            outbox: Vec::new(),
        }
    }

    pub fn local_guid(&self) -> Guid {
        self.local_guid
    }

    pub fn is_local(&self, guid: Guid) -> bool {
        guid == self.local_guid
    }

    /// Identity handed out by the transport when the link opens. Does not count
    /// as the server reassignment.
    pub fn bind_transport_identity(&mut self, guid: Guid) {
        self.local_guid = guid;
        self.local.guid = guid;
        self.players.remove(guid);
    }

    /// Server-assigned identity. Honoured once; later attempts are ignored.
    pub fn reassign_identity(&mut self, guid: Guid) -> bool {
        if self.identity_reassigned {
            warn!(current = %self.local_guid, requested = %guid, "Ignoring second identity reassignment");
            return false;
        }
        if self.players.remove(guid).is_some() {
            debug!(%guid, "Evicted remote entry colliding with our identity");
        }
        info!(old = %self.local_guid, new = %guid, "Local identity assigned by server");
        self.local_guid = guid;
        self.local.guid = guid;
        self.identity_reassigned = true;
        true
    }

    pub fn identity_reassigned(&self) -> bool {
        self.identity_reassigned
    }

    pub fn queue(&mut self, packet: Packet, reliability: Reliability) {
        self.outbox.push((packet, reliability));
    }

    pub fn reply(&mut self, packet: Packet) {
        self.queue(packet, Reliability::Reliable);
    }

    /// Take everything queued since the last flush
    pub fn drain_outbox(&mut self) -> Vec<(Packet, Reliability)> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending_replies(&self) -> usize {
        self.outbox.len()
    }
}
