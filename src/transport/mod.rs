//! # Transport Boundary
//!
//! The session talks to the network only through [`Transport`]. A transport
//! delivers whole datagrams and reports its own connection events in-band as
//! one-byte datagrams carrying a [`ControlCode`].
//!
//! ## Datagram classes
//! - exactly 1 byte: control notification
//! - 2 bytes or more: a message whose first byte is the kind id
//!
//! [`local::LocalTransport`] implements the boundary in-process for tests and
//! headless tools.

use bytes::Bytes;
use std::net::SocketAddr;
use std::time::Duration;

use crate::core::packet::Guid;
use crate::error::Result;

pub mod local;

wire_enum! {
    /// Connection events reported by the transport
    pub enum ControlCode {
        ConnectionRequestAccepted = 16,
        ConnectionAttemptFailed = 17,
        AlreadyConnected = 18,
        NewIncomingConnection = 19,
        NoFreeIncomingConnections = 20,
        DisconnectionNotification = 21,
        ConnectionLost = 22,
        ConnectionBanned = 23,
        InvalidPassword = 24,
        IncompatibleProtocolVersion = 25,
        RemoteDisconnectionNotification = 31,
        RemoteConnectionLost = 32,
        RemoteNewIncomingConnection = 33,
    }
}

/// Delivery guarantee requested for an outgoing datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reliability {
    Unreliable,
    #[default]
    Reliable,
    ReliableOrdered,
}

/// A received datagram after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Control(ControlCode),
    /// One-byte datagram whose value is not a known control code
    UnknownControl(u8),
    Message(Bytes),
}

/// Split control notifications from messages.
pub fn classify(datagram: Bytes) -> Inbound {
    if datagram.len() == 1 {
        let code = datagram[0];
        return match ControlCode::from_u8(code) {
            Some(control) => Inbound::Control(control),
            None => Inbound::UnknownControl(code),
        };
    }
    Inbound::Message(datagram)
}

/// Unreliable datagram transport with connection management.
pub trait Transport {
    /// Start connecting to `addr`. `token` travels as the connection-request
    /// payload and is checked by the remote transport.
    fn open(&mut self, addr: SocketAddr, token: &str) -> Result<()>;

    fn send(&mut self, data: Bytes, reliability: Reliability) -> Result<()>;

    /// Next queued datagram, without blocking.
    fn receive(&mut self) -> Option<Bytes>;

    /// Next datagram, waiting at most `timeout` for one to arrive.
    fn receive_timeout(&mut self, timeout: Duration) -> Option<Bytes>;

    /// Identity the transport assigned to this endpoint
    fn local_guid(&self) -> Guid;

    fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_byte_is_control() {
        let inbound = classify(Bytes::from_static(&[22]));
        assert_eq!(inbound, Inbound::Control(ControlCode::ConnectionLost));

        assert_eq!(
            classify(Bytes::from_static(&[200])),
            Inbound::UnknownControl(200)
        );
    }

    #[test]
    fn longer_datagrams_are_messages() {
        let data = Bytes::from_static(&[22, 0]);
        assert_eq!(classify(data.clone()), Inbound::Message(data));
    }
}
