//! # Error Types
//!
//! Error handling for the synchronization core.
//!
//! ## Error Categories
//! - **Protocol-fatal**: handshake rejected, banned, connection lost, server full.
//!   These end the session and are surfaced to the user.
//! - **Decode-local**: truncated packets, unknown kind ids, malformed fields.
//!   Logged at the dispatch boundary; the datagram is dropped.
//! - **Bootstrap-fatal**: a local content file is missing while building the
//!   manifest. Raised before any network I/O.
//!
//! Precondition failures (cell not loaded, remote entity unknown) are not errors;
//! handlers report them as [`crate::sync::Outcome::Skipped`].
//!
//! ## Example Usage
//! ```rust
//! use worldsync::error::{Result, SyncError};
//! use tracing::{error, info};
//!
//! fn first_byte(bytes: &[u8]) -> Result<u8> {
//!     bytes.first().copied().ok_or(SyncError::TruncatedPacket {
//!         needed: 1,
//!         available: 0,
//!     })
//! }
//!
//! match first_byte(&[]) {
//!     Ok(kind) => info!(kind, "Got kind"),
//!     Err(e) => error!(error = %e, "Dropping packet"),
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error message constants used on user-facing paths.
pub mod constants {
    /// Shown when the connection attempt never got an answer
    pub const ERR_ATTEMPT_FAILED: &str = "Connection failed.\n\
        Either the IP address is wrong or a firewall on either system is blocking\n\
        UDP packets on the port you have chosen.";
    /// Shown when the server rejects our version token
    pub const ERR_OUTDATED: &str = "Connection failed.\nThe client or server is outdated.";
    pub const ERR_SERVER_FULL: &str = "The server is full.";
    pub const ERR_DISCONNECTED: &str = "We have been disconnected.";
    pub const ERR_CONNECTION_LOST: &str = "Connection lost.";
    pub const ERR_BANNED: &str = "You are banned from this server.";
    pub const ERR_NOT_CONNECTED: &str = "Session is not connected";
    pub const ERR_PLUGIN_MISMATCH: &str = "Your plugins\tShould be";
}

/// SyncError is the primary error type for all synchronization operations
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Truncated packet: needed {needed} bytes, {available} available")]
    TruncatedPacket { needed: usize, available: usize },

    #[error("Unknown packet kind: {0}")]
    UnknownKind(u8),

    #[error("Duplicate packet kind {kind} in {domain} registry")]
    DuplicateKind { domain: &'static str, kind: u8 },

    #[error("Invalid string field: {0}")]
    InvalidString(String),

    #[error("Invalid value {value} for field {field}")]
    InvalidField { field: &'static str, value: i64 },

    #[error("{}", constants::ERR_OUTDATED)]
    HandshakeRejected,

    #[error("{}", constants::ERR_BANNED)]
    ConnectionBanned,

    #[error("{}", constants::ERR_CONNECTION_LOST)]
    ConnectionLost,

    #[error("{}", constants::ERR_SERVER_FULL)]
    ServerFull,

    #[error("{}", constants::ERR_DISCONNECTED)]
    Disconnected,

    #[error("{}", constants::ERR_ATTEMPT_FAILED)]
    ConnectionAttemptFailed,

    #[error("{}", constants::ERR_NOT_CONNECTED)]
    NotConnected,

    #[error("Content file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SyncError {
    /// Whether this error terminates the session.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::HandshakeRejected
                | SyncError::ConnectionBanned
                | SyncError::ConnectionLost
                | SyncError::ServerFull
                | SyncError::Disconnected
                | SyncError::ConnectionAttemptFailed
                | SyncError::FileNotFound(_)
        )
    }

    /// Whether this error only affects the packet being decoded.
    pub fn is_decode_local(&self) -> bool {
        matches!(
            self,
            SyncError::TruncatedPacket { .. }
                | SyncError::UnknownKind(_)
                | SyncError::InvalidString(_)
                | SyncError::InvalidField { .. }
        )
    }
}

/// Type alias for Results using SyncError
pub type Result<T> = std::result::Result<T, SyncError>;
