//! Body layouts for every registered kind.

pub mod actor;
pub mod fields;
pub mod player;
pub mod world;

pub use actor::{actor_registry, ActorPacket};
pub use player::{player_registry, PlayerPacket};
pub use world::{world_registry, WorldPacket};
