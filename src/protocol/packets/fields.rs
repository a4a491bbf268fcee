//! Wire layouts of the compound fields shared by several packet kinds.

use crate::core::codec::{WireField, WireReader, WireWriter};
use crate::entity::player::{
    Attack, AttackKind, BaseInfo, CellState, CellStateAction, CharClass, Credentials,
    CustomClass, DynamicStat, GameTime, GuiMessageBox, Item, JournalItem, JournalItemKind,
    MessageBoxKind, Position, SkillValue, StatValue,
};
use crate::error::{Result, SyncError};
use crate::world::{ActorDescriptor, CellId, ContainerItem, ObjectKey};

/// Minimum encoded sizes, used to bound list counts
pub const STRING_MIN_LEN: usize = 4;
pub const ITEM_MIN_LEN: usize = 12;
pub const JOURNAL_ITEM_MIN_LEN: usize = 13;
pub const CELL_STATE_MIN_LEN: usize = 6;
pub const CONTAINER_ITEM_MIN_LEN: usize = 16;
pub const ACTOR_MIN_LEN: usize = 36;

/// Sentinel for an absent game time unit
const TIME_UNSET: i32 = -1;

pub fn read_enum<T>(r: &mut WireReader, field: &'static str, from: fn(u8) -> Option<T>) -> Result<T> {
    let raw = r.read_u8()?;
    from(raw).ok_or(SyncError::InvalidField {
        field,
        value: i64::from(raw),
    })
}

impl WireField for String {
    fn write(&self, w: &mut WireWriter) {
        w.write_string(self);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        r.read_string()
    }
}

impl WireField for Position {
    fn write(&self, w: &mut WireWriter) {
        w.write_f32_array(&self.pos);
        w.write_f32_array(&self.rot);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            pos: r.read_f32_array()?,
            rot: r.read_f32_array()?,
        })
    }
}

impl WireField for CellId {
    fn write(&self, w: &mut WireWriter) {
        match self {
            CellId::Exterior { x, y } => {
                w.write_u8(0);
                w.write_i32(*x);
                w.write_i32(*y);
            }
            CellId::Interior(name) => {
                w.write_u8(1);
                w.write_string(name);
            }
        }
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        match r.read_u8()? {
            0 => Ok(CellId::Exterior {
                x: r.read_i32()?,
                y: r.read_i32()?,
            }),
            1 => Ok(CellId::Interior(r.read_string()?)),
            other => Err(SyncError::InvalidField {
                field: "cell",
                value: i64::from(other),
            }),
        }
    }
}

impl WireField for Item {
    fn write(&self, w: &mut WireWriter) {
        w.write_string(&self.refid);
        w.write_i32(self.count);
        w.write_i32(self.charge);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            refid: r.read_string()?,
            count: r.read_i32()?,
            charge: r.read_i32()?,
        })
    }
}

impl WireField for Credentials {
    fn write(&self, w: &mut WireWriter) {
        w.write_string(&self.name);
        w.write_string(&self.password);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            name: r.read_string()?,
            password: r.read_string()?,
        })
    }
}

impl WireField for BaseInfo {
    fn write(&self, w: &mut WireWriter) {
        w.write_string(&self.name);
        w.write_string(&self.race);
        w.write_string(&self.head);
        w.write_string(&self.hair);
        w.write_bool(self.female);
        w.write_string(&self.birthsign);
        w.write_string(&self.creature_model);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            name: r.read_string()?,
            race: r.read_string()?,
            head: r.read_string()?,
            hair: r.read_string()?,
            female: r.read_bool()?,
            birthsign: r.read_string()?,
            creature_model: r.read_string()?,
        })
    }
}

impl WireField for JournalItem {
    fn write(&self, w: &mut WireWriter) {
        w.write_u8(self.kind.as_u8());
        w.write_string(&self.quest);
        w.write_i32(self.index);
        w.write_string(&self.actor_refid);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            kind: read_enum(r, "journal.kind", JournalItemKind::from_u8)?,
            quest: r.read_string()?,
            index: r.read_i32()?,
            actor_refid: r.read_string()?,
        })
    }
}

impl WireField for Attack {
    fn write(&self, w: &mut WireWriter) {
        w.write_guid(self.target);
        w.write_string(&self.refid);
        w.write_u8(self.kind.as_u8());
        w.write_bool(self.success);
        w.write_bool(self.pressed);
        w.write_f32(self.damage);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            target: r.read_guid()?,
            refid: r.read_string()?,
            kind: read_enum(r, "attack.kind", AttackKind::from_u8)?,
            success: r.read_bool()?,
            pressed: r.read_bool()?,
            damage: r.read_f32()?,
        })
    }
}

impl WireField for DynamicStat {
    fn write(&self, w: &mut WireWriter) {
        w.write_f32(self.base);
        w.write_f32(self.current);
        w.write_f32(self.modifier);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            base: r.read_f32()?,
            current: r.read_f32()?,
            modifier: r.read_f32()?,
        })
    }
}

impl WireField for StatValue {
    fn write(&self, w: &mut WireWriter) {
        w.write_i32(self.base);
        w.write_i32(self.modifier);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            base: r.read_i32()?,
            modifier: r.read_i32()?,
        })
    }
}

impl WireField for SkillValue {
    fn write(&self, w: &mut WireWriter) {
        w.write_i32(self.base);
        w.write_i32(self.modifier);
        w.write_f32(self.progress);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            base: r.read_i32()?,
            modifier: r.read_i32()?,
            progress: r.read_f32()?,
        })
    }
}

impl WireField for CellState {
    fn write(&self, w: &mut WireWriter) {
        w.write_u8(self.action.as_u8());
        self.cell.write(w);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            action: read_enum(r, "cell_state.action", CellStateAction::from_u8)?,
            cell: CellId::read(r)?,
        })
    }
}

impl WireField for CharClass {
    fn write(&self, w: &mut WireWriter) {
        match self {
            CharClass::Default(id) => {
                w.write_u8(0);
                w.write_string(id);
            }
            CharClass::Custom(class) => {
                w.write_u8(1);
                w.write_string(&class.name);
                w.write_string(&class.description);
                w.write_i32(class.specialization);
                w.write_i32_array(&class.major_attributes);
                w.write_i32_array(&class.major_skills);
                w.write_i32_array(&class.minor_skills);
            }
        }
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        match r.read_u8()? {
            0 => Ok(CharClass::Default(r.read_string()?)),
            1 => Ok(CharClass::Custom(CustomClass {
                name: r.read_string()?,
                description: r.read_string()?,
                specialization: r.read_i32()?,
                major_attributes: r.read_i32_array()?,
                major_skills: r.read_i32_array()?,
                minor_skills: r.read_i32_array()?,
            })),
            other => Err(SyncError::InvalidField {
                field: "class",
                value: i64::from(other),
            }),
        }
    }
}

impl WireField for GameTime {
    fn write(&self, w: &mut WireWriter) {
        w.write_f64(self.hour.unwrap_or(f64::from(TIME_UNSET)));
        w.write_i32(self.day.unwrap_or(TIME_UNSET));
        w.write_i32(self.month.unwrap_or(TIME_UNSET));
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        let hour = r.read_f64()?;
        let day = r.read_i32()?;
        let month = r.read_i32()?;
        Ok(Self {
            hour: (hour >= 0.0).then_some(hour),
            day: (day != TIME_UNSET).then_some(day),
            month: (month != TIME_UNSET).then_some(month),
        })
    }
}

impl WireField for GuiMessageBox {
    fn write(&self, w: &mut WireWriter) {
        w.write_i32(self.id);
        w.write_u8(self.kind.as_u8());
        w.write_string(&self.label);
        w.write_string(&self.note);
        w.write_string(&self.buttons);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            id: r.read_i32()?,
            kind: read_enum(r, "message_box.kind", MessageBoxKind::from_u8)?,
            label: r.read_string()?,
            note: r.read_string()?,
            buttons: r.read_string()?,
        })
    }
}

impl WireField for ObjectKey {
    fn write(&self, w: &mut WireWriter) {
        w.write_u32(self.ref_num);
        w.write_u32(self.mp_num);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            ref_num: r.read_u32()?,
            mp_num: r.read_u32()?,
        })
    }
}

impl WireField for ActorDescriptor {
    fn write(&self, w: &mut WireWriter) {
        w.write_string(&self.refid);
        self.key.write(w);
        self.position.write(w);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            refid: r.read_string()?,
            key: ObjectKey::read(r)?,
            position: Position::read(r)?,
        })
    }
}

impl WireField for ContainerItem {
    fn write(&self, w: &mut WireWriter) {
        w.write_string(&self.refid);
        w.write_i32(self.count);
        w.write_i32(self.charge);
        w.write_i32(self.action_count);
    }

    fn read(r: &mut WireReader) -> Result<Self> {
        Ok(Self {
            refid: r.read_string()?,
            count: r.read_i32()?,
            charge: r.read_i32()?,
            action_count: r.read_i32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_time_sentinels() {
        let time = GameTime {
            hour: None,
            day: Some(12),
            month: None,
        };
        let mut w = WireWriter::new();
        time.write(&mut w);
        let mut r = WireReader::new(w.finish());
        assert_eq!(GameTime::read(&mut r).unwrap(), time);
    }

    #[test]
    fn unknown_cell_tag_is_invalid() {
        let mut w = WireWriter::new();
        w.write_u8(9);
        let mut r = WireReader::new(w.finish());
        assert!(matches!(
            CellId::read(&mut r),
            Err(SyncError::InvalidField { field: "cell", .. })
        ));
    }
}
