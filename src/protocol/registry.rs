//! Per-domain packet registries.
//!
//! Each registry maps a kind id to the handler that knows the kind's body
//! layout and which part of its target the body reads or writes.

use std::collections::HashMap;
use tracing::debug;

use crate::core::codec::{WireReader, WireWriter};
use crate::core::packet::{Guid, Packet, PACKET_HEADER_LEN};
use crate::entity::PlayerState;
use crate::error::{Result, SyncError};
use crate::protocol::kinds::Domain;
use crate::world::{ActorList, WorldEvent};

/// Serializes and deserializes one kind's body against a bound target.
pub trait PacketHandler: Send + Sync {
    type Target;

    fn kind(&self) -> u8;

    /// Length of a bare request of this kind.
    fn header_size(&self) -> usize {
        PACKET_HEADER_LEN
    }

    fn write_body(&self, target: &Self::Target, w: &mut WireWriter);

    fn read_body(&self, target: &mut Self::Target, r: &mut WireReader) -> Result<()>;

    /// Build a packet carrying the target's current state
    fn encode(&self, originator: Guid, target: &Self::Target) -> Packet {
        let mut w = WireWriter::new();
        self.write_body(target, &mut w);
        Packet::new(self.kind(), originator, w.finish())
    }

    /// Decode a packet's body onto the target
    fn decode(&self, packet: &Packet, target: &mut Self::Target) -> Result<()> {
        let mut r = WireReader::new(packet.body.clone());
        self.read_body(target, &mut r)?;
        if !r.is_empty() {
            debug!(
                kind = self.kind(),
                trailing = r.remaining(),
                "Ignoring trailing bytes"
            );
        }
        Ok(())
    }

    /// Whether a packet of this kind carries no body and is therefore a request.
    fn is_request(&self, packet: &Packet) -> bool {
        packet.len() == self.header_size()
    }
}

type BoxedHandler<T> = Box<dyn PacketHandler<Target = T>>;

/// Kind id to handler lookup for one domain.
pub struct PacketRegistry<T> {
    domain: Domain,
    handlers: HashMap<u8, BoxedHandler<T>>,
}

pub type PlayerRegistry = PacketRegistry<PlayerState>;
pub type ActorRegistry = PacketRegistry<ActorList>;
pub type WorldRegistry = PacketRegistry<WorldEvent>;

impl<T> PacketRegistry<T> {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            handlers: HashMap::new(),
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Register a handler under its kind id. Duplicate ids are rejected.
    pub fn register<H>(&mut self, handler: H) -> Result<()>
    where
        H: PacketHandler<Target = T> + 'static,
    {
        let kind = handler.kind();
        if self.handlers.contains_key(&kind) {
            return Err(SyncError::DuplicateKind {
                domain: self.domain.name(),
                kind,
            });
        }
        self.handlers.insert(kind, Box::new(handler));
        Ok(())
    }

    pub fn lookup(&self, kind: u8) -> Result<&dyn PacketHandler<Target = T>> {
        self.handlers
            .get(&kind)
            .map(|handler| handler.as_ref())
            .ok_or(SyncError::UnknownKind(kind))
    }

    pub fn contains(&self, kind: u8) -> bool {
        self.handlers.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = u8> + '_ {
        self.handlers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T> std::fmt::Debug for PacketRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<u8> = self.kinds().collect();
        kinds.sort_unstable();
        f.debug_struct("PacketRegistry")
            .field("domain", &self.domain)
            .field("kinds", &kinds)
            .finish()
    }
}
