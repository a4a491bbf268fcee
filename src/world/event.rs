//! Scratch buffers filled by actor and world packets.
//!
//! One `ActorList` and one `WorldEvent` live for the whole session; every
//! dispatch overwrites them.

use crate::entity::player::Position;
use crate::world::cell::CellId;

wire_enum! {
    /// Domain-level action tag of an actor or world packet
    #[derive(Default)]
    pub enum EventAction {
        #[default]
        Set = 0,
        Add = 1,
        Remove = 2,
        Request = 3,
    }
}

impl EventAction {
    /// The sender wants us to enumerate and transmit the cell's contents
    pub fn is_request(self) -> bool {
        self == EventAction::Request
    }
}

/// Identifies an object instance inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectKey {
    /// Reference number from content files
    pub ref_num: u32,
    /// Number assigned by the server for objects placed at runtime
    pub mp_num: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActorDescriptor {
    pub refid: String,
    pub key: ObjectKey,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerItem {
    pub refid: String,
    pub count: i32,
    pub charge: i32,
    pub action_count: i32,
}

/// One affected object. Each world kind carries only a subset of these fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldObject {
    pub refid: String,
    pub key: ObjectKey,
    pub count: i32,
    pub charge: i32,
    pub gold_value: i32,
    pub position: Position,
    pub scale: f32,
    pub lock_level: i32,
    pub door_state: i32,
    pub anim_group: String,
    pub anim_mode: i32,
    pub index: i32,
    pub short_value: i32,
    pub float_value: f32,
    pub var_name: String,
    pub filename: String,
    pub allow_skipping: bool,
    pub container_items: Vec<ContainerItem>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActorList {
    pub cell: CellId,
    pub action: EventAction,
    pub actors: Vec<ActorDescriptor>,
}

impl ActorList {
    pub fn reset(&mut self) {
        self.cell = CellId::default();
        self.action = EventAction::default();
        self.actors.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldEvent {
    pub cell: CellId,
    pub action: EventAction,
    pub objects: Vec<WorldObject>,
}

impl WorldEvent {
    pub fn reset(&mut self) {
        self.cell = CellId::default();
        self.action = EventAction::default();
        self.objects.clear();
    }
}
