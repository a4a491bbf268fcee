//! World packet bodies, one object list per event.

use crate::core::codec::{WireReader, WireWriter};
use crate::error::Result;
use crate::protocol::kinds::{Domain, WorldKind};
use crate::protocol::packets::fields::{read_enum, CONTAINER_ITEM_MIN_LEN, STRING_MIN_LEN};
use crate::protocol::registry::{PacketHandler, WorldRegistry};
use crate::world::{EventAction, WorldEvent, WorldObject};

/// Body codec for one world kind.
///
/// Layout: cell, action, object count, then the kind's per-object fields.
#[derive(Debug, Clone, Copy)]
pub struct WorldPacket {
    kind: WorldKind,
}

impl WorldPacket {
    pub fn new(kind: WorldKind) -> Self {
        Self { kind }
    }

    /// Smallest possible encoding of one object of this kind
    fn min_object_len(&self) -> usize {
        match self.kind {
            WorldKind::ScriptMemberShort => STRING_MIN_LEN + 8,
            WorldKind::ScriptGlobalShort => STRING_MIN_LEN + 4,
            WorldKind::MusicPlay => STRING_MIN_LEN,
            WorldKind::VideoPlay => STRING_MIN_LEN + 1,
            _ => STRING_MIN_LEN + 8,
        }
    }

    fn write_object(&self, o: &WorldObject, w: &mut WireWriter) {
        let write_ref = |w: &mut WireWriter| {
            w.write_string(&o.refid);
            w.write_field(&o.key);
        };
        match self.kind {
            WorldKind::Container => {
                write_ref(w);
                w.write_list(&o.container_items);
            }
            WorldKind::ObjectPlace => {
                write_ref(w);
                w.write_i32(o.count);
                w.write_i32(o.charge);
                w.write_i32(o.gold_value);
                w.write_field(&o.position);
            }
            WorldKind::ObjectDelete | WorldKind::ObjectUnlock => write_ref(w),
            WorldKind::ObjectLock => {
                write_ref(w);
                w.write_i32(o.lock_level);
            }
            WorldKind::ObjectScale => {
                write_ref(w);
                w.write_f32(o.scale);
            }
            WorldKind::ObjectMove => {
                write_ref(w);
                w.write_f32_array(&o.position.pos);
            }
            WorldKind::ObjectRotate => {
                write_ref(w);
                w.write_f32_array(&o.position.rot);
            }
            WorldKind::ObjectAnimPlay => {
                write_ref(w);
                w.write_string(&o.anim_group);
                w.write_i32(o.anim_mode);
            }
            WorldKind::DoorState => {
                write_ref(w);
                w.write_i32(o.door_state);
            }
            WorldKind::ScriptLocalShort => {
                write_ref(w);
                w.write_i32(o.index);
                w.write_i32(o.short_value);
            }
            WorldKind::ScriptLocalFloat => {
                write_ref(w);
                w.write_i32(o.index);
                w.write_f32(o.float_value);
            }
            WorldKind::ScriptMemberShort => {
                w.write_string(&o.refid);
                w.write_i32(o.index);
                w.write_i32(o.short_value);
            }
            WorldKind::ScriptGlobalShort => {
                w.write_string(&o.var_name);
                w.write_i32(o.short_value);
            }
            WorldKind::MusicPlay => w.write_string(&o.filename),
            WorldKind::VideoPlay => {
                w.write_string(&o.filename);
                w.write_bool(o.allow_skipping);
            }
        }
    }

    fn read_object(&self, r: &mut WireReader) -> Result<WorldObject> {
        let mut o = WorldObject::default();
        if self.kind.is_cell_scoped() {
            o.refid = r.read_string()?;
            o.key = r.read_field()?;
        }
        match self.kind {
            WorldKind::Container => o.container_items = r.read_list(CONTAINER_ITEM_MIN_LEN)?,
            WorldKind::ObjectPlace => {
                o.count = r.read_i32()?;
                o.charge = r.read_i32()?;
                o.gold_value = r.read_i32()?;
                o.position = r.read_field()?;
            }
            WorldKind::ObjectDelete | WorldKind::ObjectUnlock => {}
            WorldKind::ObjectLock => o.lock_level = r.read_i32()?,
            WorldKind::ObjectScale => o.scale = r.read_f32()?,
            WorldKind::ObjectMove => o.position.pos = r.read_f32_array()?,
            WorldKind::ObjectRotate => o.position.rot = r.read_f32_array()?,
            WorldKind::ObjectAnimPlay => {
                o.anim_group = r.read_string()?;
                o.anim_mode = r.read_i32()?;
            }
            WorldKind::DoorState => o.door_state = r.read_i32()?,
            WorldKind::ScriptLocalShort => {
                o.index = r.read_i32()?;
                o.short_value = r.read_i32()?;
            }
            WorldKind::ScriptLocalFloat => {
                o.index = r.read_i32()?;
                o.float_value = r.read_f32()?;
            }
            WorldKind::ScriptMemberShort => {
                o.refid = r.read_string()?;
                o.index = r.read_i32()?;
                o.short_value = r.read_i32()?;
            }
            WorldKind::ScriptGlobalShort => {
                o.var_name = r.read_string()?;
                o.short_value = r.read_i32()?;
            }
            WorldKind::MusicPlay => o.filename = r.read_string()?,
            WorldKind::VideoPlay => {
                o.filename = r.read_string()?;
                o.allow_skipping = r.read_bool()?;
            }
        }
        Ok(o)
    }
}

impl PacketHandler for WorldPacket {
    type Target = WorldEvent;

    fn kind(&self) -> u8 {
        self.kind.as_u8()
    }

    fn write_body(&self, event: &WorldEvent, w: &mut WireWriter) {
        w.write_field(&event.cell);
        w.write_u8(event.action.as_u8());
        w.write_count(event.objects.len());
        for object in &event.objects {
            self.write_object(object, w);
        }
    }

    fn read_body(&self, event: &mut WorldEvent, r: &mut WireReader) -> Result<()> {
        event.reset();
        event.cell = r.read_field()?;
        event.action = read_enum(r, "world.action", EventAction::from_u8)?;
        let count = r.read_count(self.min_object_len())?;
        event.objects.reserve(count);
        for _ in 0..count {
            let object = self.read_object(r)?;
            event.objects.push(object);
        }
        Ok(())
    }
}

pub fn world_registry() -> Result<WorldRegistry> {
    let mut registry = WorldRegistry::new(Domain::World);
    for kind in WorldKind::ALL {
        registry.register(WorldPacket::new(*kind))?;
    }
    Ok(registry)
}
