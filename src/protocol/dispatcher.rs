//! Packet routing.
//!
//! The dispatcher owns the three registries and decides, from the kind byte
//! alone, which synchronization handler a datagram goes to. The content
//! manifest response is answered before any registry is consulted.

use bytes::Bytes;
use tracing::{debug, instrument, warn};

use crate::core::packet::Packet;
use crate::engine::GameEngine;
use crate::error::{Result, SyncError};
use crate::protocol::kinds::{ActorKind, Domain, WorldKind, GAME_PREINIT};
use crate::protocol::packets::{actor_registry, player_registry, world_registry};
use crate::protocol::registry::{ActorRegistry, PlayerRegistry, WorldRegistry};
use crate::sync::{self, Outcome, SessionContext};
use crate::world::{ActorList, CellStore, WorldEvent};

/// Routes message datagrams to the registry that owns their kind id.
///
/// Actor and world bodies are decoded into one reused scratch buffer per
/// domain; a handler only sees the buffer after the router has filled it.
pub struct Dispatcher {
    players: PlayerRegistry,
    actors: ActorRegistry,
    world: WorldRegistry,
    actor_list: ActorList,
    world_event: WorldEvent,
}

impl Dispatcher {
    /// Dispatcher over the default registries.
    pub fn new() -> Result<Self> {
        Ok(Self::with_registries(
            player_registry()?,
            actor_registry()?,
            world_registry()?,
        ))
    }

    pub fn with_registries(
        players: PlayerRegistry,
        actors: ActorRegistry,
        world: WorldRegistry,
    ) -> Self {
        Self {
            players,
            actors,
            world,
            actor_list: ActorList::default(),
            world_event: WorldEvent::default(),
        }
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn actors(&self) -> &ActorRegistry {
        &self.actors
    }

    pub fn world(&self) -> &WorldRegistry {
        &self.world
    }

    /// Owning domain of a kind id, checked Player, Actor, World.
    pub fn domain_of(&self, kind: u8) -> Option<Domain> {
        if self.players.contains(kind) {
            Some(Domain::Player)
        } else if self.actors.contains(kind) {
            Some(Domain::Actor)
        } else if self.world.contains(kind) {
            Some(Domain::World)
        } else {
            None
        }
    }

    /// Decode and apply one message datagram.
    #[instrument(level = "trace", skip_all, fields(len = datagram.len()))]
    pub fn route(
        &mut self,
        datagram: Bytes,
        ctx: &mut SessionContext,
        engine: &mut dyn GameEngine,
        cells: &mut dyn CellStore,
    ) -> Result<Outcome> {
        let packet = Packet::from_bytes(datagram)?;
        let kind = packet.kind();

        if kind == GAME_PREINIT {
            return preinit_response(ctx, &packet, engine);
        }

        match self.domain_of(kind) {
            Some(Domain::Player) => sync::player::handle(ctx, &self.players, &packet, engine),
            Some(Domain::Actor) => {
                let actor_kind = ActorKind::from_u8(kind).ok_or(SyncError::UnknownKind(kind))?;
                self.actors
                    .lookup(kind)?
                    .decode(&packet, &mut self.actor_list)?;
                sync::actor::handle(ctx, &self.actors, actor_kind, &self.actor_list, cells)
            }
            Some(Domain::World) => {
                let world_kind = WorldKind::from_u8(kind).ok_or(SyncError::UnknownKind(kind))?;
                self.world
                    .lookup(kind)?
                    .decode(&packet, &mut self.world_event)?;
                sync::world::handle(
                    ctx,
                    &self.world,
                    world_kind,
                    &self.world_event,
                    cells,
                    engine,
                )
            }
            None => {
                warn!(kind, "Unhandled packet kind");
                Err(SyncError::UnknownKind(kind))
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("players", &self.players)
            .field("actors", &self.actors)
            .field("world", &self.world)
            .finish()
    }
}

/// The server's answer to our content manifest. An empty answer accepts it.
fn preinit_response(
    ctx: &SessionContext,
    packet: &Packet,
    engine: &mut dyn GameEngine,
) -> Result<Outcome> {
    let Some(manifest) = ctx.manifest.as_ref() else {
        debug!("Content response without a sent manifest");
        return Ok(Outcome::Ignored);
    };
    if packet.is_empty() {
        debug!("Server accepted content manifest");
        return Ok(Outcome::Applied);
    }
    if let Some(diff) = manifest.check_response(packet)? {
        engine.show_warning(&diff);
    }
    Ok(Outcome::Applied)
}
