//! Player packets.
//!
//! Whether a packet about the local player is a request or an update is
//! decided by its length: a bare header asks for current state, anything
//! longer carries state to apply. Which of the two a kind accepts is its
//! [`LocalPolicy`]; what happens for other players is its [`RemotePolicy`].

use tracing::{debug, instrument};

use crate::core::packet::{Guid, Packet};
use crate::engine::{GameEngine, Subject, TimeUnit};
use crate::entity::player::{ChangeAction, DrawState, PlayerState};
use crate::error::{Result, SyncError};
use crate::protocol::kinds::{LocalPolicy, PlayerKind, RemotePolicy};
use crate::protocol::registry::{PacketHandler, PlayerRegistry};
use crate::sync::{combat, Outcome, SessionContext};

/// Apply one player packet.
#[instrument(level = "trace", skip_all, fields(kind = packet.kind(), originator = %packet.originator()))]
pub fn handle(
    ctx: &mut SessionContext,
    registry: &PlayerRegistry,
    packet: &Packet,
    engine: &mut dyn GameEngine,
) -> Result<Outcome> {
    let kind = PlayerKind::from_u8(packet.kind()).ok_or(SyncError::UnknownKind(packet.kind()))?;
    let handler = registry.lookup(packet.kind())?;

    // Identity assignment is about us whatever the originator says
    if kind == PlayerKind::UserMyId {
        return Ok(if ctx.reassign_identity(packet.originator()) {
            Outcome::Applied
        } else {
            Outcome::Ignored
        });
    }

    if ctx.is_local(packet.originator()) {
        handle_local(ctx, registry, handler, kind, packet, engine)
    } else {
        handle_remote(ctx, handler, kind, packet, engine)
    }
}

fn handle_local(
    ctx: &mut SessionContext,
    registry: &PlayerRegistry,
    handler: &dyn PacketHandler<Target = PlayerState>,
    kind: PlayerKind,
    packet: &Packet,
    engine: &mut dyn GameEngine,
) -> Result<Outcome> {
    match kind.local_policy() {
        LocalPolicy::RequestOrUpdate => {
            if handler.is_request(packet) {
                if kind == PlayerKind::Journal {
                    debug!("Journal request cannot be answered");
                    return Ok(Outcome::Ignored);
                }
                reply_with_capture(ctx, handler, kind, engine);
                Ok(Outcome::Replied)
            } else if kind == PlayerKind::CellState {
                debug!("Cell states are only sent on request");
                Ok(Outcome::Ignored)
            } else {
                handler.decode(packet, &mut ctx.local)?;
                apply_field(engine, Subject::Local, kind, &ctx.local);
                Ok(Outcome::Applied)
            }
        }
        LocalPolicy::ReplyOnly => {
            reply_with_capture(ctx, handler, kind, engine);
            Ok(Outcome::Replied)
        }
        LocalPolicy::ApplyOnly => {
            if handler.is_request(packet) {
                if !bodiless(kind) {
                    debug!(?kind, "Bare packet carries nothing to apply");
                    return Ok(Outcome::Ignored);
                }
            } else {
                handler.decode(packet, &mut ctx.local)?;
            }
            apply_local_only(ctx, registry, handler, kind, engine)?;
            Ok(Outcome::Applied)
        }
        LocalPolicy::Ignore => Ok(Outcome::Ignored),
    }
}

/// Apply-only kinds whose bare header is the whole message.
fn bodiless(kind: PlayerKind) -> bool {
    matches!(
        kind,
        PlayerKind::UserDisconnected | PlayerKind::Death | PlayerKind::Resurrect
    )
}

fn reply_with_capture(
    ctx: &mut SessionContext,
    handler: &dyn PacketHandler<Target = PlayerState>,
    kind: PlayerKind,
    engine: &mut dyn GameEngine,
) {
    engine.capture(kind, &mut ctx.local);
    let reply = handler.encode(ctx.local_guid(), &ctx.local);
    debug!(?kind, len = reply.len(), "Replying with local state");
    ctx.reply(reply);
}

fn apply_local_only(
    ctx: &mut SessionContext,
    registry: &PlayerRegistry,
    handler: &dyn PacketHandler<Target = PlayerState>,
    kind: PlayerKind,
    engine: &mut dyn GameEngine,
) -> Result<()> {
    match kind {
        PlayerKind::UserDisconnected => {
            debug!("Server disconnected us");
            engine.request_quit();
        }
        PlayerKind::Death => {
            ctx.local.dead = true;
            engine.apply_death(Subject::Local, &ctx.local);
            let confirm = handler.encode(ctx.local_guid(), &ctx.local);
            ctx.reply(confirm);
        }
        PlayerKind::Resurrect => {
            ctx.local.dead = false;
            engine.apply_resurrection(Subject::Local, &ctx.local);
            ctx.local.stance.draw_state = DrawState::Nothing;
            let confirm = handler.encode(ctx.local_guid(), &ctx.local);
            ctx.reply(confirm);

            let stats = registry.lookup(PlayerKind::DynamicStats.as_u8())?;
            reply_with_capture(ctx, stats, PlayerKind::DynamicStats, engine);
        }
        _ => apply_field(engine, Subject::Local, kind, &ctx.local),
    }
    Ok(())
}

fn handle_remote(
    ctx: &mut SessionContext,
    handler: &dyn PacketHandler<Target = PlayerState>,
    kind: PlayerKind,
    packet: &Packet,
    engine: &mut dyn GameEngine,
) -> Result<Outcome> {
    let guid = packet.originator();
    match kind.remote_policy() {
        RemotePolicy::Spawn => {
            // Decode into a copy so a malformed body leaves no half-built entry
            let mut incoming = ctx
                .players
                .get(guid)
                .cloned()
                .unwrap_or_else(|| PlayerState::new(guid));
            handler.decode(packet, &mut incoming)?;

            let (entry, created) = ctx.players.get_or_insert(guid);
            *entry = incoming;
            if created {
                engine.spawn_player(entry);
            } else {
                engine.apply_base_info(Subject::Remote(guid), entry);
            }
            Ok(Outcome::Applied)
        }
        RemotePolicy::Apply => {
            if !ctx.players.contains(guid) {
                debug!(%guid, ?kind, "Remote player not known yet");
                return Ok(Outcome::Skipped);
            }
            apply_remote(ctx, handler, kind, guid, packet, engine)
        }
        RemotePolicy::Ignore => Ok(Outcome::Ignored),
    }
}

fn apply_remote(
    ctx: &mut SessionContext,
    handler: &dyn PacketHandler<Target = PlayerState>,
    kind: PlayerKind,
    guid: Guid,
    packet: &Packet,
    engine: &mut dyn GameEngine,
) -> Result<Outcome> {
    if kind == PlayerKind::UserDisconnected {
        ctx.players.remove(guid);
        engine.despawn_player(guid);
        return Ok(Outcome::Applied);
    }

    let Some(player) = ctx.players.get_mut(guid) else {
        return Ok(Outcome::Skipped);
    };
    handler.decode(packet, player)?;

    let who = Subject::Remote(guid);
    match kind {
        PlayerKind::Attack => return Ok(combat::resolve_attack(ctx, guid, engine)),
        PlayerKind::Death => {
            player.dead = true;
            player.health_mut().current = 0.0;
            engine.apply_death(who, player);
        }
        PlayerKind::Resurrect => {
            player.dead = false;
            let health = player.health_mut();
            health.base = health.base.max(1.0);
            health.current = health.base;
            engine.apply_resurrection(who, player);
        }
        _ => apply_field(engine, who, kind, player),
    }
    Ok(Outcome::Applied)
}

/// Hand a decoded field to its engine routine.
fn apply_field(engine: &mut dyn GameEngine, who: Subject, kind: PlayerKind, player: &PlayerState) {
    match kind {
        PlayerKind::BaseInfo => engine.apply_base_info(who, player),
        PlayerKind::Position => engine.apply_position(who, player),
        PlayerKind::Equipment => engine.apply_equipment(who, player),
        PlayerKind::DynamicStats => engine.apply_dynamic_stats(who, player),
        PlayerKind::Death => engine.apply_death(who, player),
        PlayerKind::Resurrect => engine.apply_resurrection(who, player),
        PlayerKind::CellChange => engine.apply_cell(who, player),
        PlayerKind::DrawState => engine.apply_draw_state(who, player),
        PlayerKind::Attribute => engine.apply_attributes(who, player),
        PlayerKind::Skill => engine.apply_skills(who, player),
        PlayerKind::Level => engine.apply_level(who, player),
        PlayerKind::Inventory => {
            let items = &player.inventory.items;
            match player.inventory.action {
                ChangeAction::Add => engine.add_items(items),
                ChangeAction::Remove => engine.remove_items(items),
                ChangeAction::Set => engine.set_items(items),
            }
        }
        PlayerKind::Spellbook => {
            engine.edit_spellbook(player.spellbook.action, &player.spellbook.spells)
        }
        PlayerKind::Journal => engine.add_journal_items(&player.journal),
        PlayerKind::ChatMessage => engine.show_chat(&player.chat_message),
        PlayerKind::CharGen => engine.apply_chargen(player),
        PlayerKind::CharClass => engine.apply_class(player),
        PlayerKind::GuiMessageBox => engine.show_message_box(&player.message_box),
        PlayerKind::GameTime => match TimeUnit::first_of(&player.game_time) {
            Some(unit) => engine.apply_game_time(unit),
            None => debug!("Game time packet carries no value"),
        },
        PlayerKind::GameConsole => engine.set_console_allowed(player.console_allowed),
        PlayerKind::Handshake
        | PlayerKind::UserMyId
        | PlayerKind::UserDisconnected
        | PlayerKind::Attack
        | PlayerKind::CellState => debug!(?kind, "No engine routine for kind"),
    }
}
