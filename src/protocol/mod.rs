//! # Protocol
//!
//! Message kinds, the per-domain packet registries and their body codecs,
//! the connection handshake, and the dispatch router.
//!
//! ## Components
//! - **Kinds**: id ranges and per-kind request/update policies
//! - **Registry**: kind id to body codec lookup, one registry per domain
//! - **Packets**: body layouts for every registered kind
//! - **Handshake**: client-side connection state machine
//! - **Dispatcher**: routes a datagram to the domain that owns its kind
//!
//! ## Id Ranges
//! ```text
//! 134        content manifest (GamePreInit)
//! 135..=159  player
//! 170..=171  actor
//! 180..=195  world
//! ```

pub mod dispatcher;
pub mod handshake;
pub mod kinds;
pub mod packets;
pub mod registry;

pub use dispatcher::Dispatcher;
pub use handshake::{ClientHandshake, HandshakeEvent, HandshakeStep};
pub use kinds::{ActorKind, Domain, LocalPolicy, PlayerKind, RemotePolicy, WorldKind, GAME_PREINIT};
pub use registry::{ActorRegistry, PacketHandler, PacketRegistry, PlayerRegistry, WorldRegistry};

#[cfg(test)]
mod tests;
