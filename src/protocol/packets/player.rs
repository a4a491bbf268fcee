//! Player packet bodies.
//!
//! Each kind reads or writes one field group of a [`PlayerState`]. Bodiless
//! kinds (death, resurrection, disconnect, identity) carry only the header.

use crate::core::codec::{WireReader, WireWriter};
use crate::entity::player::{
    ChangeAction, DrawState, Item, PlayerState, Stance, ATTRIBUTE_COUNT, EQUIPMENT_SLOTS,
    SKILL_COUNT,
};
use crate::error::Result;
use crate::protocol::kinds::{Domain, PlayerKind};
use crate::protocol::packets::fields::{
    read_enum, CELL_STATE_MIN_LEN, ITEM_MIN_LEN, JOURNAL_ITEM_MIN_LEN, STRING_MIN_LEN,
};
use crate::protocol::registry::{PacketHandler, PlayerRegistry};

/// Body codec for one player kind.
#[derive(Debug, Clone, Copy)]
pub struct PlayerPacket {
    kind: PlayerKind,
}

impl PlayerPacket {
    pub fn new(kind: PlayerKind) -> Self {
        Self { kind }
    }

    pub fn player_kind(&self) -> PlayerKind {
        self.kind
    }
}

impl PacketHandler for PlayerPacket {
    type Target = PlayerState;

    fn kind(&self) -> u8 {
        self.kind.as_u8()
    }

    fn write_body(&self, p: &PlayerState, w: &mut WireWriter) {
        match self.kind {
            PlayerKind::Handshake => w.write_field(&p.credentials),
            PlayerKind::BaseInfo => w.write_field(&p.base),
            PlayerKind::Position => w.write_field(&p.position),
            PlayerKind::UserMyId
            | PlayerKind::UserDisconnected
            | PlayerKind::Death
            | PlayerKind::Resurrect => {}
            PlayerKind::Equipment => {
                for slot in 0..EQUIPMENT_SLOTS {
                    match p.equipment.get(slot) {
                        Some(item) => w.write_field(item),
                        None => w.write_field(&Item::default()),
                    }
                }
            }
            PlayerKind::Inventory => {
                w.write_u8(p.inventory.action.as_u8());
                w.write_list(&p.inventory.items);
            }
            PlayerKind::Spellbook => {
                w.write_u8(p.spellbook.action.as_u8());
                w.write_list(&p.spellbook.spells);
            }
            PlayerKind::Journal => w.write_list(&p.journal),
            PlayerKind::Attack => w.write_field(&p.attack),
            PlayerKind::DynamicStats => {
                for stat in &p.dynamic {
                    w.write_field(stat);
                }
            }
            PlayerKind::CellChange => w.write_field(&p.cell),
            PlayerKind::CellState => w.write_list(&p.cell_states),
            PlayerKind::DrawState => {
                w.write_u8(p.stance.draw_state.as_u8());
                w.write_u8(p.stance.movement_flags);
            }
            PlayerKind::ChatMessage => w.write_string(&p.chat_message),
            PlayerKind::CharGen => {
                w.write_i32(p.chargen.current);
                w.write_i32(p.chargen.end);
            }
            PlayerKind::Attribute => {
                for attribute in &p.attributes {
                    w.write_field(attribute);
                }
            }
            PlayerKind::Skill => {
                for skill in &p.skills {
                    w.write_field(skill);
                }
            }
            PlayerKind::Level => {
                w.write_i32(p.level.level);
                w.write_i32(p.level.progress);
            }
            PlayerKind::GuiMessageBox => w.write_field(&p.message_box),
            PlayerKind::CharClass => w.write_field(&p.class),
            PlayerKind::GameTime => w.write_field(&p.game_time),
            PlayerKind::GameConsole => w.write_bool(p.console_allowed),
        }
    }

    fn read_body(&self, p: &mut PlayerState, r: &mut WireReader) -> Result<()> {
        match self.kind {
            PlayerKind::Handshake => p.credentials = r.read_field()?,
            PlayerKind::BaseInfo => p.base = r.read_field()?,
            PlayerKind::Position => p.position = r.read_field()?,
            PlayerKind::UserMyId
            | PlayerKind::UserDisconnected
            | PlayerKind::Death
            | PlayerKind::Resurrect => {}
            PlayerKind::Equipment => {
                let mut equipment = Vec::with_capacity(EQUIPMENT_SLOTS);
                for _ in 0..EQUIPMENT_SLOTS {
                    equipment.push(r.read_field()?);
                }
                p.equipment = equipment;
            }
            PlayerKind::Inventory => {
                p.inventory.action = read_enum(r, "inventory.action", ChangeAction::from_u8)?;
                p.inventory.items = r.read_list(ITEM_MIN_LEN)?;
            }
            PlayerKind::Spellbook => {
                p.spellbook.action = read_enum(r, "spellbook.action", ChangeAction::from_u8)?;
                p.spellbook.spells = r.read_list(STRING_MIN_LEN)?;
            }
            PlayerKind::Journal => p.journal = r.read_list(JOURNAL_ITEM_MIN_LEN)?,
            PlayerKind::Attack => p.attack = r.read_field()?,
            PlayerKind::DynamicStats => {
                for stat in p.dynamic.iter_mut() {
                    *stat = r.read_field()?;
                }
            }
            PlayerKind::CellChange => p.cell = r.read_field()?,
            PlayerKind::CellState => p.cell_states = r.read_list(CELL_STATE_MIN_LEN)?,
            PlayerKind::DrawState => {
                p.stance = Stance {
                    draw_state: read_enum(r, "draw_state", DrawState::from_u8)?,
                    movement_flags: r.read_u8()?,
                };
            }
            PlayerKind::ChatMessage => p.chat_message = r.read_string()?,
            PlayerKind::CharGen => {
                p.chargen.current = r.read_i32()?;
                p.chargen.end = r.read_i32()?;
            }
            PlayerKind::Attribute => {
                for attribute in p.attributes.iter_mut().take(ATTRIBUTE_COUNT) {
                    *attribute = r.read_field()?;
                }
            }
            PlayerKind::Skill => {
                for skill in p.skills.iter_mut().take(SKILL_COUNT) {
                    *skill = r.read_field()?;
                }
            }
            PlayerKind::Level => {
                p.level.level = r.read_i32()?;
                p.level.progress = r.read_i32()?;
            }
            PlayerKind::GuiMessageBox => p.message_box = r.read_field()?,
            PlayerKind::CharClass => p.class = r.read_field()?,
            PlayerKind::GameTime => p.game_time = r.read_field()?,
            PlayerKind::GameConsole => p.console_allowed = r.read_bool()?,
        }
        Ok(())
    }
}

/// Registry with a handler for every player kind.
pub fn player_registry() -> Result<PlayerRegistry> {
    let mut registry = PlayerRegistry::new(Domain::Player);
    for kind in PlayerKind::ALL {
        registry.register(PlayerPacket::new(*kind))?;
    }
    Ok(registry)
}
