//! Peer directory - the fixed membership set
//!
//! The directory is loaded once at startup and never changes; there is
//! no discovery and no membership protocol. A peer's identity is its
//! index in the directory.

use std::net::SocketAddr;

use crate::{GroupcastError, GroupcastResult, PeerIndex};

/// Immutable table of all other nodes' addresses known to this node
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeerDirectory {
    peers: Vec<SocketAddr>,
}

impl PeerDirectory {
    /// Build a directory from a fixed address list
    ///
    /// All entries must be distinct, since a peer is identified by its
    /// position. An empty directory is legal; broadcasting to it is a
    /// no-op.
    pub fn new(peers: Vec<SocketAddr>) -> GroupcastResult<Self> {
        for (i, addr) in peers.iter().enumerate() {
            if peers[..i].contains(addr) {
                return Err(GroupcastError::DuplicatePeer(*addr));
            }
        }
        Ok(PeerDirectory { peers })
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn get(&self, index: PeerIndex) -> Option<SocketAddr> {
        self.peers.get(index.0).copied()
    }

    /// Iterate peers in directory order
    pub fn iter(&self) -> impl Iterator<Item = (PeerIndex, SocketAddr)> + '_ {
        self.peers
            .iter()
            .enumerate()
            .map(|(i, addr)| (PeerIndex::new(i), *addr))
    }
}
