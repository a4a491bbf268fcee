//! # World
//!
//! Cells, the actor/world scratch buffers, and the cell-store boundary.

pub mod cell;
pub mod event;
pub mod memory;

pub use cell::{CellHandle, CellId, CellStore};
pub use event::{
    ActorDescriptor, ActorList, ContainerItem, EventAction, ObjectKey, WorldEvent, WorldObject,
};
pub use memory::{MemoryCell, MemoryCellStore};
