//! Identity types for groupcast
//!
//! Peers are identified by their position in the peer directory;
//! received messages are identified by their receipt sequence.

use std::fmt;

/// Receipt sequence - strictly increasing index assigned to a message
/// the moment it is fully received
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Seq(pub u64);

impl Seq {
    pub const ZERO: Seq = Seq(0);

    #[inline]
    pub fn new(seq: u64) -> Self {
        Seq(seq)
    }

    /// The sequence assigned to the message received after this one
    #[inline]
    pub fn next(self) -> Self {
        Seq(self.0 + 1)
    }
}

impl fmt::Debug for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seq({})", self.0)
    }
}

impl fmt::Display for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Peer identity - position in the peer directory (0..N-1)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PeerIndex(pub usize);

impl PeerIndex {
    #[inline]
    pub fn new(index: usize) -> Self {
        PeerIndex(index)
    }
}

impl fmt::Debug for PeerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Peer({})", self.0)
    }
}

impl fmt::Display for PeerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_next() {
        assert_eq!(Seq::ZERO.next(), Seq::new(1));
        assert_eq!(Seq::new(41).next(), Seq::new(42));
    }

    #[test]
    fn test_seq_ordering() {
        assert!(Seq::new(0) < Seq::new(1));
        assert!(Seq::new(1) < Seq::new(100));
    }

    #[test]
    fn test_display() {
        assert_eq!(Seq::new(7).to_string(), "7");
        assert_eq!(PeerIndex::new(2).to_string(), "peer#2");
    }
}
