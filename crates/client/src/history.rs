//! Bounded, insertion-ordered record of past exchanges, used both to chain nonces
//! (the next nonce binds to the previous reply's bytes) and to audit causality
//! across a sequence of queries.

use std::collections::VecDeque;

pub const DEFAULT_MAX_HISTORY_LEN: usize = 100;

/// One completed exchange: the nonce that was sent, the blind that produced it, and
/// the full bytes of the reply that came back.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub nonce: [u8; 64],
    pub blind: [u8; 64],
    pub reply_bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct History {
    max_len: usize,
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len: max_len.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Bytes of the most recently stored reply, or an empty slice if history is empty.
    pub fn previous_reply_bytes(&self) -> &[u8] {
        self.entries.back().map(|e| e.reply_bytes.as_slice()).unwrap_or(&[])
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_len {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn as_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}
