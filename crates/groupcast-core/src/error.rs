//! Error types for groupcast

use std::net::SocketAddr;

use thiserror::Error;

/// Core groupcast errors
///
/// Only three of these ever reach a caller: `Bind` (fatal at startup),
/// `DuplicatePeer` (directory construction), and `EmbeddedNewline`
/// (rejected before a send is attempted). Per-connection and per-peer
/// I/O failures are logged at the point they occur and contained.
#[derive(Error, Debug)]
pub enum GroupcastError {
    // Startup errors
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    // Configuration errors
    #[error("duplicate peer address in directory: {0}")]
    DuplicatePeer(SocketAddr),

    // Outbound errors
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("message contains an embedded line terminator")]
    EmbeddedNewline,

    // Inbound / per-connection errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for groupcast operations
pub type GroupcastResult<T> = Result<T, GroupcastError>;
