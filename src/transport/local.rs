//! In-process transport.
//!
//! [`LocalTransport::pair`] returns the client end and a [`LocalPeer`] that
//! plays the server: it sees everything the client sends and can inject any
//! datagram, including control notifications. The connection checks a real
//! transport performs on `open` (password, ban list, capacity) are decided by
//! the [`PeerPolicy`] given at pairing time.

use bytes::Bytes;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, instrument, warn};

use crate::config::handshake_token;
use crate::core::packet::{Guid, Packet};
use crate::error::{Result, SyncError};
use crate::protocol::handshake::verify_token;
use crate::transport::{ControlCode, Reliability, Transport};

/// How the simulated server answers a connection request.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerPolicy {
    /// Token the server accepts; anything else is an invalid password
    pub expected_token: String,
    pub banned: bool,
    pub full: bool,
    /// Never answer at all
    pub silent: bool,
}

impl Default for PeerPolicy {
    fn default() -> Self {
        Self {
            expected_token: handshake_token(),
            banned: false,
            full: false,
            silent: false,
        }
    }
}

impl PeerPolicy {
    /// Answer the transport gives to a connection request carrying `token`
    pub fn answer(&self, token: &str) -> Option<ControlCode> {
        if self.silent {
            None
        } else if !verify_token(&self.expected_token, token) {
            Some(ControlCode::InvalidPassword)
        } else if self.banned {
            Some(ControlCode::ConnectionBanned)
        } else if self.full {
            Some(ControlCode::NoFreeIncomingConnections)
        } else {
            Some(ControlCode::ConnectionRequestAccepted)
        }
    }
}

/// Client end of an in-process link.
pub struct LocalTransport {
    guid: Guid,
    policy: PeerPolicy,
    remote: Option<SocketAddr>,
    inbox: UnboundedReceiver<Bytes>,
    /// Loopback sender used to queue the connection answer
    loopback: UnboundedSender<Bytes>,
    outbox: UnboundedSender<Bytes>,
    requests: UnboundedSender<String>,
}

/// Server end of an in-process link.
pub struct LocalPeer {
    to_client: UnboundedSender<Bytes>,
    from_client: UnboundedReceiver<Bytes>,
    requests: UnboundedReceiver<String>,
}

impl LocalTransport {
    /// Link with a randomly assigned client identity
    pub fn pair(policy: PeerPolicy) -> (LocalTransport, LocalPeer) {
        Self::pair_with_guid(Guid(rand::random::<u64>()), policy)
    }

    pub fn pair_with_guid(guid: Guid, policy: PeerPolicy) -> (LocalTransport, LocalPeer) {
        let (to_client, inbox) = mpsc::unbounded_channel();
        let (outbox, from_client) = mpsc::unbounded_channel();
        let (request_tx, request_rx) = mpsc::unbounded_channel();

        let transport = LocalTransport {
            guid,
            policy,
            remote: None,
            inbox,
            loopback: to_client.clone(),
            outbox,
            requests: request_tx,
        };
        let peer = LocalPeer {
            to_client,
            from_client,
            requests: request_rx,
        };
        (transport, peer)
    }

    pub fn is_open(&self) -> bool {
        self.remote.is_some()
    }
}

impl Transport for LocalTransport {
    #[instrument(skip(self, token), fields(guid = %self.guid))]
    fn open(&mut self, addr: SocketAddr, token: &str) -> Result<()> {
        self.remote = Some(addr);
        self.requests
            .send(token.to_string())
            .map_err(|_| SyncError::Transport("peer dropped".into()))?;

        match self.policy.answer(token) {
            Some(code) => {
                debug!(?code, "Answering connection request");
                self.loopback
                    .send(Bytes::copy_from_slice(&[code.as_u8()]))
                    .map_err(|_| SyncError::Transport("loopback closed".into()))?;
            }
            None => debug!("Connection request left unanswered"),
        }
        Ok(())
    }

    fn send(&mut self, data: Bytes, reliability: Reliability) -> Result<()> {
        if self.remote.is_none() {
            return Err(SyncError::Transport("transport is not open".into()));
        }
        debug!(len = data.len(), ?reliability, "Sending datagram");
        self.outbox
            .send(data)
            .map_err(|_| SyncError::Transport("peer dropped".into()))
    }

    fn receive(&mut self) -> Option<Bytes> {
        match self.inbox.try_recv() {
            Ok(data) => Some(data),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("Peer is gone");
                None
            }
        }
    }

    fn receive_timeout(&mut self, timeout: Duration) -> Option<Bytes> {
        if let Some(data) = self.receive() {
            return Some(data);
        }
        std::thread::sleep(timeout);
        self.receive()
    }

    fn local_guid(&self) -> Guid {
        self.guid
    }

    fn close(&mut self) {
        if self.remote.take().is_some() {
            debug!(guid = %self.guid, "Transport closed");
        }
    }
}

impl LocalPeer {
    /// Queue a raw datagram for the client
    pub fn inject(&self, data: Bytes) -> Result<()> {
        self.to_client
            .send(data)
            .map_err(|_| SyncError::Transport("client dropped".into()))
    }

    pub fn inject_packet(&self, packet: &Packet) -> Result<()> {
        self.inject(packet.to_bytes())
    }

    pub fn inject_control(&self, code: ControlCode) -> Result<()> {
        self.inject(Bytes::copy_from_slice(&[code.as_u8()]))
    }

    /// Next datagram the client sent
    pub fn recv(&mut self) -> Option<Bytes> {
        self.from_client.try_recv().ok()
    }

    /// Every datagram the client sent so far, decoded
    pub fn drain_packets(&mut self) -> Result<Vec<Packet>> {
        let mut packets = Vec::new();
        while let Some(data) = self.recv() {
            packets.push(Packet::from_bytes(data)?);
        }
        Ok(packets)
    }

    /// Token carried by the latest connection request
    pub fn connection_request(&mut self) -> Option<String> {
        let mut latest = None;
        while let Ok(token) = self.requests.try_recv() {
            latest = Some(token);
        }
        latest
    }
}
