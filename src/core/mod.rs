//! # Core Protocol Components
//!
//! Low-level packet handling: the datagram header and the positional body codec.
//!
//! ## Wire Format
//! ```text
//! [Kind(1)] [Originator(8, LE)] [Body(N)]
//! ```
//!
//! A datagram of exactly one byte is a transport control notification, not a
//! message; see [`crate::transport::ControlCode`].

pub mod codec;
pub mod packet;

pub use packet::{Guid, Packet, PacketHeader, PACKET_HEADER_LEN};
