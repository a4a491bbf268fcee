//! Connection handshake.
//!
//! The client opens the transport with the version token as its connection
//! request payload, then waits for the transport's verdict. [`ClientHandshake`]
//! is the waiting half as a state machine: the session feeds it one
//! [`HandshakeEvent`] at a time and acts on the returned [`HandshakeStep`].
//! Nothing here touches a socket.
//!
//! The wait is bounded: idle time is accumulated across events and the attempt
//! fails once it reaches `connect_attempts × attempt_interval`.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::SyncError;
use crate::transport::{ControlCode, Inbound};

/// Something that happened while waiting for the connection verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeEvent {
    Control(ControlCode),
    /// A message or unknown notification arrived before the verdict
    Other,
    /// Nothing arrived for this long
    Idle(Duration),
}

impl HandshakeEvent {
    pub fn from_inbound(inbound: &Inbound) -> Self {
        match inbound {
            Inbound::Control(code) => HandshakeEvent::Control(*code),
            Inbound::UnknownControl(_) | Inbound::Message(_) => HandshakeEvent::Other,
        }
    }
}

#[derive(Debug)]
pub enum HandshakeStep {
    Pending,
    Accepted,
    Failed(SyncError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Accepted,
    Failed,
}

/// Client side of the connection handshake.
#[derive(Debug, Clone)]
pub struct ClientHandshake {
    interval: Duration,
    budget: Duration,
    waited: Duration,
    phase: Phase,
}

impl ClientHandshake {
    /// Wait in steps of `interval` until `budget` of idle time has passed.
    pub fn new(interval: Duration, budget: Duration) -> Self {
        Self {
            interval,
            budget,
            waited: Duration::ZERO,
            phase: Phase::Waiting,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.attempt_interval, config.handshake_budget())
    }

    /// How long the caller should wait for the next event
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn waited(&self) -> Duration {
        self.waited
    }

    pub fn is_finished(&self) -> bool {
        self.phase != Phase::Waiting
    }

    /// Advance on one event. Events after a verdict are ignored.
    pub fn on_event(&mut self, event: HandshakeEvent) -> HandshakeStep {
        if self.is_finished() {
            debug!(?event, "Handshake already finished");
            return HandshakeStep::Pending;
        }

        let step = match event {
            HandshakeEvent::Control(code) => Self::verdict(code),
            HandshakeEvent::Other => {
                debug!("Ignoring traffic received before connection verdict");
                HandshakeStep::Pending
            }
            HandshakeEvent::Idle(elapsed) => {
                self.waited += elapsed;
                if self.waited >= self.budget {
                    warn!(waited_ms = self.waited.as_millis() as u64, "No answer from server");
                    HandshakeStep::Failed(SyncError::ConnectionAttemptFailed)
                } else {
                    HandshakeStep::Pending
                }
            }
        };

        match &step {
            HandshakeStep::Pending => {}
            HandshakeStep::Accepted => {
                info!("Connection accepted");
                self.phase = Phase::Accepted;
            }
            HandshakeStep::Failed(e) => {
                warn!(error = %e, "Connection refused");
                self.phase = Phase::Failed;
            }
        }
        step
    }

    fn verdict(code: ControlCode) -> HandshakeStep {
        match code {
            ControlCode::ConnectionRequestAccepted => HandshakeStep::Accepted,
            ControlCode::ConnectionAttemptFailed => {
                HandshakeStep::Failed(SyncError::ConnectionAttemptFailed)
            }
            ControlCode::InvalidPassword | ControlCode::IncompatibleProtocolVersion => {
                HandshakeStep::Failed(SyncError::HandshakeRejected)
            }
            ControlCode::ConnectionBanned => HandshakeStep::Failed(SyncError::ConnectionBanned),
            ControlCode::NoFreeIncomingConnections => HandshakeStep::Failed(SyncError::ServerFull),
            ControlCode::DisconnectionNotification | ControlCode::ConnectionLost => {
                HandshakeStep::Failed(SyncError::ConnectionLost)
            }
            ControlCode::AlreadyConnected
            | ControlCode::NewIncomingConnection
            | ControlCode::RemoteDisconnectionNotification
            | ControlCode::RemoteConnectionLost
            | ControlCode::RemoteNewIncomingConnection => {
                debug!(?code, "Control notice during handshake");
                HandshakeStep::Pending
            }
        }
    }
}

/// Server-side check of a connection-request payload against the version
/// token the server runs with.
pub fn verify_token(expected: &str, token: &str) -> bool {
    token == expected
}
