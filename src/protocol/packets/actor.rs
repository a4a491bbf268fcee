//! Actor packet bodies: a cell, an action tag and a list of actor
//! descriptors.

use crate::core::codec::{WireReader, WireWriter};
use crate::error::Result;
use crate::protocol::kinds::{ActorKind, Domain};
use crate::protocol::packets::fields::{read_enum, ACTOR_MIN_LEN};
use crate::protocol::registry::{ActorRegistry, PacketHandler};
use crate::world::{ActorList, EventAction};

/// Body codec for one actor kind.
///
/// Every actor body starts with the cell and the action tag.
#[derive(Debug, Clone, Copy)]
pub struct ActorPacket {
    kind: ActorKind,
}

impl ActorPacket {
    pub fn new(kind: ActorKind) -> Self {
        Self { kind }
    }
}

impl PacketHandler for ActorPacket {
    type Target = ActorList;

    fn kind(&self) -> u8 {
        self.kind.as_u8()
    }

    fn write_body(&self, list: &ActorList, w: &mut WireWriter) {
        w.write_field(&list.cell);
        w.write_u8(list.action.as_u8());
        match self.kind {
            ActorKind::ActorList => w.write_list(&list.actors),
            ActorKind::ActorAuthority => {}
        }
    }

    fn read_body(&self, list: &mut ActorList, r: &mut WireReader) -> Result<()> {
        list.reset();
        list.cell = r.read_field()?;
        list.action = read_enum(r, "actor.action", EventAction::from_u8)?;
        match self.kind {
            ActorKind::ActorList => list.actors = r.read_list(ACTOR_MIN_LEN)?,
            ActorKind::ActorAuthority => {}
        }
        Ok(())
    }
}

pub fn actor_registry() -> Result<ActorRegistry> {
    let mut registry = ActorRegistry::new(Domain::Actor);
    for kind in ActorKind::ALL {
        registry.register(ActorPacket::new(*kind))?;
    }
    Ok(registry)
}
