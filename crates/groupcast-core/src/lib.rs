//! Groupcast Core - Fundamental types for the group messaging node
//!
//! This crate defines the types shared by the transport and runtime:
//! - Identifiers (Seq, PeerIndex)
//! - The append-only message log
//! - The immutable peer directory
//! - Error taxonomy

pub mod error;
pub mod id;
pub mod log;
pub mod peers;

pub use error::*;
pub use id::*;
pub use log::*;
pub use peers::*;
