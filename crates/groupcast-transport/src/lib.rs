//! Groupcast Transport - TCP line transport
//!
//! This crate provides the two halves of the wire:
//! - An inbound listener that accepts connections forever and reads
//!   exactly one line from each
//! - An outbound sender that fans one message out to every peer over
//!   short-lived connections
//!
//! Wire format: one UTF-8 line per connection, newline-terminated, no
//! framing, no handshake, no acknowledgment. The sender closes after
//! writing; the listener closes after the single-line read.

pub mod listener;
pub mod sender;

pub use listener::{InboundReceiver, LineListener};
pub use sender::{broadcast, send_line};
