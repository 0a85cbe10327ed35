//! Bounded, display-only record of mutating calls.

use std::collections::VecDeque;
use std::fmt;

/// Entries kept when no capacity is given.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Insert,
    Delete,
    Update,
    Rotation,
    Error,
    Info,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpKind::Insert => "insert",
            OpKind::Delete => "delete",
            OpKind::Update => "update",
            OpKind::Rotation => "rotation",
            OpKind::Error => "error",
            OpKind::Info => "info",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LogEntry {
    /// Monotonic sequence number, unique for the lifetime of the log.
    pub seq: u64,
    pub kind: OpKind,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} [{}] {}", self.seq, self.kind, self.message)
    }
}

/// Keeps the most recent `capacity` entries, dropping the oldest first.
#[derive(Clone, Debug)]
pub struct OperationLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    seq: u64,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
            seq: 0,
        }
    }

    pub fn push(&mut self, kind: OpKind, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{kind}: {message}");
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            seq: self.seq,
            kind,
            message,
        });
        self.seq += 1;
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_entries() {
        let mut log = OperationLog::with_capacity(3);
        for i in 0..5 {
            log.push(OpKind::Insert, format!("Inserted {i}"));
        }
        assert_eq!(log.len(), 3);
        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["Inserted 2", "Inserted 3", "Inserted 4"]);
        assert_eq!(log.last().map(|e| e.seq), Some(4));
        assert_eq!(log.last().map(|e| e.to_string()).as_deref(), Some("#4 [insert] Inserted 4"));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut log = OperationLog::with_capacity(0);
        log.push(OpKind::Info, "cleared");
        assert!(log.is_empty());
    }
}
