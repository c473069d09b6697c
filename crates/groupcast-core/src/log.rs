//! Message log - append-only record of everything received
//!
//! The log is the only shared mutable state in the node. Appends take
//! the write lock, so sequence assignment is serialized even when
//! multiple connection tasks race; readers take the read lock against
//! a snapshot clone and never observe a torn append.

use parking_lot::RwLock;

use crate::Seq;

/// A received message, immutable once appended
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Receipt sequence, assigned by the log
    pub seq: Seq,
    /// Message text, single line, terminator stripped
    pub text: String,
}

/// Append-only sequence of received messages, indexed by receipt order
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: RwLock<Vec<Message>>,
}

impl MessageLog {
    pub fn new() -> Self {
        MessageLog {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append a received line, assigning the next sequence number
    ///
    /// Sequences start at 0 and increment by 1 with no gaps; the write
    /// lock is the serialization point.
    pub fn append(&self, text: String) -> Seq {
        let mut entries = self.entries.write();
        let seq = Seq::new(entries.len() as u64);
        entries.push(Message { seq, text });
        seq
    }

    /// Snapshot of the log in receipt order
    pub fn snapshot(&self) -> Vec<Message> {
        self.entries.read().clone()
    }

    pub fn get(&self, seq: Seq) -> Option<Message> {
        self.entries.read().get(seq.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_append_assigns_dense_sequences() {
        let log = MessageLog::new();
        assert_eq!(log.append("hi".into()), Seq::new(0));
        assert_eq!(log.append("there".into()), Seq::new(1));

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].seq, Seq::new(0));
        assert_eq!(snapshot[0].text, "hi");
        assert_eq!(snapshot[1].seq, Seq::new(1));
        assert_eq!(snapshot[1].text, "there");
    }

    #[test]
    fn test_get_by_seq() {
        let log = MessageLog::new();
        let seq = log.append("x".into());
        assert_eq!(log.get(seq).unwrap().text, "x");
        assert_eq!(log.get(Seq::new(99)), None);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_appends() {
        let log = MessageLog::new();
        log.append("a".into());
        let snapshot = log.snapshot();
        log.append("b".into());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_concurrent_appends_no_gaps_no_duplicates() {
        let log = Arc::new(MessageLog::new());
        let mut handles = Vec::new();
        for t in 0..8 {
            let log = Arc::clone(&log);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    log.append(format!("{}:{}", t, i));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 800);
        for (i, message) in snapshot.iter().enumerate() {
            assert_eq!(message.seq, Seq::new(i as u64));
        }
    }

    proptest! {
        #[test]
        fn prop_log_preserves_order_and_density(texts in prop::collection::vec(".*", 0..64)) {
            let log = MessageLog::new();
            for text in &texts {
                log.append(text.clone());
            }
            let snapshot = log.snapshot();
            prop_assert_eq!(snapshot.len(), texts.len());
            for (i, message) in snapshot.iter().enumerate() {
                prop_assert_eq!(message.seq, Seq::new(i as u64));
                prop_assert_eq!(&message.text, &texts[i]);
            }
        }
    }
}
