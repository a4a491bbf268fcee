//! # Session Controller
//!
//! Owns the transport, the shared [`SessionContext`] and the [`Dispatcher`],
//! and drives a client session through its lifecycle:
//!
//! ```text
//! Disconnected --connect--> Connecting --accepted--> Connected
//!       ^                       |                        |
//!       +------- failure -------+---- fatal / close -----+
//! ```
//!
//! Everything runs on the caller's thread. `connect` blocks for at most the
//! configured handshake budget; `poll` never blocks.

use std::net::{SocketAddr, ToSocketAddrs};

use bytes::Bytes;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{handshake_token, ClientConfig, ContentConfig};
use crate::content::{ChecksumService, ContentManifest, DataDirectories};
use crate::core::packet::{Guid, Packet};
use crate::engine::GameEngine;
use crate::error::{Result, SyncError};
use crate::protocol::handshake::{ClientHandshake, HandshakeEvent, HandshakeStep};
use crate::protocol::kinds::PlayerKind;
use crate::protocol::Dispatcher;
use crate::sync::SessionContext;
use crate::transport::{classify, ControlCode, Inbound, Reliability, Transport};
use crate::utils::metrics::{Metrics, Timer};
use crate::world::CellStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// A client session over one transport.
pub struct Session<T: Transport> {
    transport: T,
    state: ConnectionState,
    server: Option<SocketAddr>,
    ctx: SessionContext,
    dispatcher: Dispatcher,
    config: ClientConfig,
    metrics: Metrics,
}

impl<T: Transport> Session<T> {
    /// Build a disconnected session. Credentials for the handshake reply are
    /// taken from the configuration.
    pub fn new(transport: T, config: &ClientConfig) -> Result<Self> {
        let mut ctx = SessionContext::new(transport.local_guid());
        ctx.local.credentials.name = config.player_name.clone();
        ctx.local.credentials.password = config.player_password.clone();

        Ok(Self {
            transport,
            state: ConnectionState::Disconnected,
            server: None,
            ctx,
            dispatcher: Dispatcher::new()?,
            config: config.clone(),
            metrics: Metrics::new(),
        })
    }

    /// Connect to the configured server, checksumming the configured content
    /// files found in the configured data directories.
    pub fn connect_configured(&mut self, content: &ContentConfig) -> Result<()> {
        let address = self.config.address.clone();
        let port = self.config.port;
        let data_dirs = DataDirectories::new(content.data_dirs.iter().cloned());
        self.connect(&address, port, &content.files, &data_dirs)
    }

    /// Open the connection, run the handshake and send the content manifest.
    ///
    /// The manifest is built before any network I/O, so a missing content
    /// file fails without touching the transport.
    #[instrument(skip(self, content_files, checksums), fields(files = content_files.len()))]
    pub fn connect<S: AsRef<str>>(
        &mut self,
        address: &str,
        port: u16,
        content_files: &[S],
        checksums: &dyn ChecksumService,
    ) -> Result<()> {
        if self.state != ConnectionState::Disconnected {
            warn!(state = ?self.state, "Connect called on an active session");
            return Err(SyncError::Transport("session already active".into()));
        }

        let manifest = ContentManifest::build(content_files, checksums)?;
        let server = resolve(address, port)?;

        info!(%server, "Connecting");
        self.state = ConnectionState::Connecting;
        self.metrics.handshake_attempt();

        match self.handshake(server) {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                self.server = Some(server);
                self.metrics.handshake_success();
                info!(%server, guid = %self.ctx.local_guid(), "Connected");

                let packet = manifest.encode(self.ctx.local_guid());
                self.ctx.manifest = Some(manifest);
                self.send_packet(&packet, Reliability::Reliable)?;
                Ok(())
            }
            Err(e) => {
                self.metrics.handshake_failed();
                error!(error = %e, "Connection failed");
                self.state = ConnectionState::Disconnected;
                self.transport.close();
                Err(e)
            }
        }
    }

    fn handshake(&mut self, server: SocketAddr) -> Result<()> {
        self.transport.open(server, &handshake_token())?;
        self.ctx.bind_transport_identity(self.transport.local_guid());

        let mut handshake = ClientHandshake::from_config(&self.config);
        loop {
            let event = match self.transport.receive_timeout(handshake.interval()) {
                Some(datagram) => {
                    self.metrics.datagram_received(datagram.len() as u64);
                    HandshakeEvent::from_inbound(&classify(datagram))
                }
                None => HandshakeEvent::Idle(handshake.interval()),
            };
            match handshake.on_event(event) {
                HandshakeStep::Pending => continue,
                HandshakeStep::Accepted => return Ok(()),
                HandshakeStep::Failed(e) => return Err(e),
            }
        }
    }

    /// Drain and process every queued inbound datagram.
    ///
    /// Returns the number of datagrams taken from the transport. A fatal
    /// control notification ends the session after the current datagram and
    /// is returned as the error.
    pub fn poll(
        &mut self,
        engine: &mut dyn GameEngine,
        cells: &mut dyn CellStore,
    ) -> Result<usize> {
        if self.state != ConnectionState::Connected {
            return Err(SyncError::NotConnected);
        }

        let _timer = Timer::start("poll");
        let mut processed = 0;
        while let Some(datagram) = self.transport.receive() {
            processed += 1;
            self.metrics.datagram_received(datagram.len() as u64);

            match classify(datagram) {
                Inbound::Control(code) => {
                    self.metrics.control_code();
                    if let Some(e) = fatal_control(code) {
                        self.terminate(&e, engine);
                        return Err(e);
                    }
                    debug!(?code, "Connection notice");
                }
                Inbound::UnknownControl(code) => {
                    debug!(code, "Unknown control notification");
                }
                Inbound::Message(data) => self.dispatch(data, engine, cells),
            }
            self.flush()?;
        }
        Ok(processed)
    }

    fn dispatch(&mut self, data: Bytes, engine: &mut dyn GameEngine, cells: &mut dyn CellStore) {
        match self.dispatcher.route(data, &mut self.ctx, engine, cells) {
            Ok(outcome) => self.metrics.record(outcome),
            Err(e) if e.is_decode_local() => {
                warn!(error = %e, "Dropping undecodable packet");
                self.metrics.dropped();
            }
            Err(e) => {
                error!(error = %e, "Packet handling failed");
                self.metrics.dropped();
            }
        }
    }

    fn terminate(&mut self, e: &SyncError, engine: &mut dyn GameEngine) {
        error!(error = %e, "Session terminated by server");
        self.state = ConnectionState::Disconnected;
        self.server = None;
        self.transport.close();
        engine.show_error(&e.to_string());
        engine.request_quit();
    }

    /// Send every reply queued by the handlers.
    pub fn flush(&mut self) -> Result<()> {
        for (packet, reliability) in self.ctx.drain_outbox() {
            self.send_packet(&packet, reliability)?;
        }
        Ok(())
    }

    /// Send one local-player field, e.g. after the engine changed it.
    pub fn send_player(&mut self, kind: PlayerKind) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(SyncError::NotConnected);
        }
        let handler = self.dispatcher.players().lookup(kind.as_u8())?;
        let packet = handler.encode(self.ctx.local_guid(), &self.ctx.local);
        let reliability = if kind == PlayerKind::Position {
            Reliability::Unreliable
        } else {
            Reliability::Reliable
        };
        self.send_packet(&packet, reliability)
    }

    fn send_packet(&mut self, packet: &Packet, reliability: Reliability) -> Result<()> {
        let data = packet.to_bytes();
        let len = data.len() as u64;
        self.transport.send(data, reliability)?;
        self.metrics.datagram_sent(len);
        Ok(())
    }

    /// Close the transport and end the session.
    pub fn disconnect(&mut self) {
        if self.state != ConnectionState::Disconnected {
            info!("Disconnecting");
        }
        self.transport.close();
        self.state = ConnectionState::Disconnected;
        self.server = None;
        self.metrics.log_summary();
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn server_address(&self) -> Option<SocketAddr> {
        self.server
    }

    pub fn local_guid(&self) -> Guid {
        self.ctx.local_guid()
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.ctx
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

fn resolve(address: &str, port: u16) -> Result<SocketAddr> {
    (address, port)
        .to_socket_addrs()
        .map_err(|e| SyncError::InvalidAddress(format!("{address}:{port}: {e}")))?
        .next()
        .ok_or_else(|| SyncError::InvalidAddress(format!("{address}:{port}")))
}

/// Notifications that end a running session.
fn fatal_control(code: ControlCode) -> Option<SyncError> {
    match code {
        ControlCode::NoFreeIncomingConnections => Some(SyncError::ServerFull),
        ControlCode::DisconnectionNotification => Some(SyncError::Disconnected),
        ControlCode::ConnectionLost => Some(SyncError::ConnectionLost),
        ControlCode::ConnectionBanned => Some(SyncError::ConnectionBanned),
        _ => None,
    }
}
