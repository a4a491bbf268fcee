//! World packets.
//!
//! Cell-scoped kinds act on a loaded cell and are dropped silently when the
//! cell is not loaded; global kinds go straight to the engine.

use tracing::{debug, instrument};

use crate::engine::GameEngine;
use crate::error::Result;
use crate::protocol::kinds::WorldKind;
use crate::protocol::registry::WorldRegistry;
use crate::sync::{Outcome, SessionContext};
use crate::world::{CellStore, EventAction, WorldEvent};

#[instrument(level = "trace", skip_all, fields(kind = ?kind, cell = %event.cell, objects = event.objects.len()))]
pub fn handle(
    ctx: &mut SessionContext,
    registry: &WorldRegistry,
    kind: WorldKind,
    event: &WorldEvent,
    cells: &mut dyn CellStore,
    engine: &mut dyn GameEngine,
) -> Result<Outcome> {
    if !kind.is_cell_scoped() {
        apply_global(kind, event, engine);
        return Ok(Outcome::Applied);
    }

    let Some(cell) = cells.get_cell(&event.cell) else {
        debug!("World event for unloaded cell");
        return Ok(Outcome::Skipped);
    };

    let objects = event.objects.as_slice();
    match kind {
        WorldKind::Container => {
            if event.action.is_request() {
                let reply = WorldEvent {
                    cell: event.cell.clone(),
                    action: EventAction::Set,
                    objects: cell.containers(objects),
                };
                let handler = registry.lookup(kind.as_u8())?;
                ctx.reply(handler.encode(ctx.local_guid(), &reply));
                return Ok(Outcome::Replied);
            }
            cell.edit_containers(event.action, objects);
        }
        WorldKind::ObjectPlace => cell.place_objects(objects),
        WorldKind::ObjectDelete => cell.delete_objects(objects),
        WorldKind::ObjectLock => cell.lock_objects(objects),
        WorldKind::ObjectUnlock => cell.unlock_objects(objects),
        WorldKind::ObjectScale => cell.scale_objects(objects),
        WorldKind::ObjectMove => cell.move_objects(objects),
        WorldKind::ObjectRotate => cell.rotate_objects(objects),
        WorldKind::ObjectAnimPlay => cell.animate_objects(objects),
        WorldKind::DoorState => cell.activate_doors(objects),
        WorldKind::ScriptLocalShort => cell.set_local_shorts(objects),
        WorldKind::ScriptLocalFloat => cell.set_local_floats(objects),
        WorldKind::ScriptMemberShort
        | WorldKind::ScriptGlobalShort
        | WorldKind::MusicPlay
        | WorldKind::VideoPlay => {
            apply_global(kind, event, engine);
        }
    }
    Ok(Outcome::Applied)
}

fn apply_global(kind: WorldKind, event: &WorldEvent, engine: &mut dyn GameEngine) {
    for object in &event.objects {
        match kind {
            WorldKind::ScriptMemberShort => {
                engine.set_member_short(&object.refid, object.index, object.short_value)
            }
            WorldKind::ScriptGlobalShort => {
                engine.set_global_short(&object.var_name, object.short_value)
            }
            WorldKind::MusicPlay => engine.play_music(&object.filename),
            WorldKind::VideoPlay => engine.play_video(&object.filename, object.allow_skipping),
            _ => debug!(?kind, "Not a global world kind"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::packet::Guid;
    use crate::engine::headless::{EngineEvent, HeadlessEngine};
    use crate::protocol::packets::world_registry;
    use crate::world::{CellId, ContainerItem, MemoryCellStore, ObjectKey, WorldObject};

    fn object(ref_num: u32) -> WorldObject {
        WorldObject {
            refid: "chest_small_01".into(),
            key: ObjectKey { ref_num, mp_num: 0 },
            ..WorldObject::default()
        }
    }

    fn event(cell: CellId, action: EventAction, objects: Vec<WorldObject>) -> WorldEvent {
        WorldEvent {
            cell,
            action,
            objects,
        }
    }

    #[test]
    fn unloaded_cell_is_skipped() {
        let mut ctx = SessionContext::new(Guid(7));
        let registry = world_registry().unwrap();
        let mut cells = MemoryCellStore::new();
        let mut engine = HeadlessEngine::new();

        let ev = event(CellId::exterior(1, 1), EventAction::Set, vec![object(1)]);
        let outcome = handle(
            &mut ctx,
            &registry,
            WorldKind::ObjectPlace,
            &ev,
            &mut cells,
            &mut engine,
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert!(!cells.is_loaded(&CellId::exterior(1, 1)));
    }

    #[test]
    fn place_then_lock() {
        let mut ctx = SessionContext::new(Guid(7));
        let registry = world_registry().unwrap();
        let mut cells = MemoryCellStore::new();
        let mut engine = HeadlessEngine::new();
        let cell = CellId::interior("Seyda Neen, Census and Excise Office");
        cells.load(cell.clone());

        let ev = event(cell.clone(), EventAction::Set, vec![object(3)]);
        handle(&mut ctx, &registry, WorldKind::ObjectPlace, &ev, &mut cells, &mut engine).unwrap();

        let mut locked = object(3);
        locked.lock_level = 50;
        let ev = event(cell.clone(), EventAction::Set, vec![locked]);
        handle(&mut ctx, &registry, WorldKind::ObjectLock, &ev, &mut cells, &mut engine).unwrap();

        let placed = cells.cell(&cell).unwrap().object(ObjectKey { ref_num: 3, mp_num: 0 });
        assert_eq!(placed.unwrap().lock_level, 50);
    }

    #[test]
    fn container_request_replies_with_contents() {
        let mut ctx = SessionContext::new(Guid(7));
        let registry = world_registry().unwrap();
        let mut cells = MemoryCellStore::new();
        let mut engine = HeadlessEngine::new();
        let cell = CellId::exterior(-2, -9);

        let mut chest = object(8);
        chest.container_items.push(ContainerItem {
            refid: "gold_001".into(),
            count: 25,
            charge: -1,
            action_count: 0,
        });
        cells.load(cell.clone()).objects.insert(chest.key, chest);

        let ev = event(cell, EventAction::Request, Vec::new());
        let outcome =
            handle(&mut ctx, &registry, WorldKind::Container, &ev, &mut cells, &mut engine).unwrap();
        assert_eq!(outcome, Outcome::Replied);

        let (reply, _) = ctx.drain_outbox().remove(0);
        let mut decoded = WorldEvent::default();
        registry.lookup(reply.kind()).unwrap().decode(&reply, &mut decoded).unwrap();
        assert_eq!(decoded.action, EventAction::Set);
        assert_eq!(decoded.objects[0].container_items[0].count, 25);
    }

    #[test]
    fn global_kinds_reach_engine_without_cell() {
        let mut ctx = SessionContext::new(Guid(7));
        let registry = world_registry().unwrap();
        let mut cells = MemoryCellStore::new();
        let mut engine = HeadlessEngine::new();

        let mut track = WorldObject::default();
        track.filename = "Explore/mx_explore_1.mp3".into();
        let ev = event(CellId::default(), EventAction::Set, vec![track]);
        let outcome =
            handle(&mut ctx, &registry, WorldKind::MusicPlay, &ev, &mut cells, &mut engine).unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(
            engine.events,
            vec![EngineEvent::Music("Explore/mx_explore_1.mp3".into())]
        );
    }
}
