//! # worldsync
//!
//! Packet dispatch and world-state synchronization for the client side of a
//! multiplayer session.
//!
//! A [`Session`] opens a [`transport::Transport`], performs the versioned
//! handshake, exchanges the content manifest and then routes every inbound
//! datagram to one of three domains:
//!
//! - **Player**: per-field state of the local player and remote players
//! - **Actor**: actor lists and simulation authority per cell
//! - **World**: objects, doors, scripts and media
//!
//! Handlers act on the local game only through [`engine::GameEngine`] and on
//! cells only through [`world::CellStore`], so the whole pipeline runs
//! headless with [`engine::headless::HeadlessEngine`],
//! [`world::MemoryCellStore`] and [`transport::local::LocalTransport`].
//!
//! ## Wire Format
//! ```text
//! [Kind(1)] [Originator(8, LE)] [Body(N)]
//! ```

#[macro_use]
mod macros;

pub mod config;
pub mod content;
pub mod core;
pub mod engine;
pub mod entity;
pub mod error;
pub mod protocol;
pub mod session;
pub mod sync;
pub mod transport;
pub mod utils;
pub mod world;

pub use config::SyncConfig;
pub use crate::core::packet::{Guid, Packet};
pub use error::{Result, SyncError};
pub use session::{ConnectionState, Session};
pub use sync::{Outcome, SessionContext};
