//! # Entities
//!
//! Player state shared by the local player and remote players, plus the
//! directory of remote players keyed by originator.

pub mod directory;
pub mod player;

pub use crate::core::packet::Guid;
pub use directory::PlayerDirectory;
pub use player::PlayerState;
