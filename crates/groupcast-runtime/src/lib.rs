//! Groupcast Runtime - Node orchestration
//!
//! Composes the transport halves around the message log:
//! - the listener runs for the life of the process, feeding every
//!   received line through the log and onto the delivery channel
//! - `send_message` fans a line out to the whole peer directory
//!   without blocking the caller
//!
//! The embedding layer (UI, persistence) supplies the listen address
//! and peer directory at startup and consumes deliveries from the
//! channel; both sides of that boundary are external collaborators.

pub mod node;

pub use node::*;
