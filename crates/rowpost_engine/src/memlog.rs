use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::{LogMessage, MessageKind};

/// Append-only, UI-facing message list shared by every producer of a run.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: RwLock<Vec<LogMessage>>,
    last_seen: AtomicUsize,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, msg: LogMessage) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push(msg);
    }

    /// Shorthand for `add(LogMessage::new(kind, text))`.
    pub fn push(&self, kind: MessageKind, text: impl Into<String>) {
        self.add(LogMessage::new(kind, text));
    }

    /// Rendered snapshot of every message so far.
    pub fn get(&self) -> Vec<String> {
        self.read().iter().map(LogMessage::render).collect()
    }

    /// Rendered messages appended after the first `cursor` entries.
    pub fn since(&self, cursor: usize) -> Vec<String> {
        self.read()
            .iter()
            .skip(cursor)
            .map(LogMessage::render)
            .collect()
    }

    /// Structured snapshot of every message so far.
    pub fn messages(&self) -> Vec<LogMessage> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reports whether messages were appended since the previous call.
    ///
    /// This advances an internal cursor: a given growth of the log is
    /// reported as new exactly once, even with several concurrent pollers.
    pub fn has_new(&self) -> bool {
        let len = self.read().len();
        let previous = self.last_seen.fetch_max(len, Ordering::AcqRel);
        len > previous
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<LogMessage>> {
        match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
