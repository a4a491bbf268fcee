use std::fmt;

use crate::world::event::{ActorDescriptor, EventAction, WorldObject};

/// Address of a world partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellId {
    Exterior { x: i32, y: i32 },
    Interior(String),
}

impl Default for CellId {
    fn default() -> Self {
        CellId::Exterior { x: 0, y: 0 }
    }
}

impl CellId {
    pub fn exterior(x: i32, y: i32) -> Self {
        CellId::Exterior { x, y }
    }

    pub fn interior(name: impl Into<String>) -> Self {
        CellId::Interior(name.into())
    }

    pub fn is_exterior(&self) -> bool {
        matches!(self, CellId::Exterior { .. })
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellId::Exterior { x, y } => write!(f, "{x}, {y}"),
            CellId::Interior(name) => f.write_str(name),
        }
    }
}

/// A loaded cell and the objects it owns.
///
/// Implemented by the engine's cell container. Each mutator receives the
/// decoded descriptors of one world packet.
pub trait CellHandle {
    fn id(&self) -> &CellId;

    /// Actors currently in the cell
    fn actors(&self) -> Vec<ActorDescriptor>;

    /// Current contents of the requested containers, or of every container
    /// when `requested` is empty
    fn containers(&self, requested: &[WorldObject]) -> Vec<WorldObject>;

    fn edit_containers(&mut self, action: EventAction, objects: &[WorldObject]);
    fn place_objects(&mut self, objects: &[WorldObject]);
    fn delete_objects(&mut self, objects: &[WorldObject]);
    fn lock_objects(&mut self, objects: &[WorldObject]);
    fn unlock_objects(&mut self, objects: &[WorldObject]);
    fn scale_objects(&mut self, objects: &[WorldObject]);
    fn move_objects(&mut self, objects: &[WorldObject]);
    fn rotate_objects(&mut self, objects: &[WorldObject]);
    fn animate_objects(&mut self, objects: &[WorldObject]);
    fn activate_doors(&mut self, objects: &[WorldObject]);
    fn set_local_shorts(&mut self, objects: &[WorldObject]);
    fn set_local_floats(&mut self, objects: &[WorldObject]);
}

/// Lookup of loaded cells.
///
/// `None` means the cell is not currently loaded, which is a normal race
/// between world loading and network delivery.
pub trait CellStore {
    fn get_cell(&mut self, id: &CellId) -> Option<&mut dyn CellHandle>;

    /// Take over simulation of the actors in a cell. Returns `false` when the
    /// cell is not loaded.
    fn initialize_local_actors(&mut self, id: &CellId) -> bool;
}
