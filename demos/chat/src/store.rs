//! Transcript store - seq-keyed persistence collaborator
//!
//! Append-only file of received messages, one `seq<TAB>text` record
//! per line. This is the persistence side of the delivery callback;
//! the node core never touches disk itself.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use groupcast_core::Seq;

pub struct TranscriptStore {
    file: File,
}

impl TranscriptStore {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(TranscriptStore { file })
    }

    pub fn insert(&mut self, seq: Seq, text: &str) -> std::io::Result<()> {
        writeln!(self.file, "{}\t{}", seq, text)?;
        self.file.flush()
    }
}
