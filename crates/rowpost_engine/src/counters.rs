use std::sync::atomic::{AtomicU64, Ordering};

/// Per-run counters shared between the coordinator and its tasks.
#[derive(Debug, Default)]
pub struct RunCounters {
    lines_read: AtomicU64,
    requests_issued: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time copy of [`RunCounters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    pub lines_read: u64,
    pub requests_issued: u64,
    pub errors: u64,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_read(&self) -> u64 {
        self.lines_read.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn request_issued(&self) -> u64 {
        self.requests_issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn error(&self) -> u64 {
        self.errors.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read.load(Ordering::SeqCst)
    }

    pub fn requests_issued(&self) -> u64 {
        self.requests_issued.load(Ordering::SeqCst)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            lines_read: self.lines_read(),
            requests_issued: self.requests_issued(),
            errors: self.errors(),
        }
    }

    pub fn reset(&self) {
        self.lines_read.store(0, Ordering::SeqCst);
        self.requests_issued.store(0, Ordering::SeqCst);
        self.errors.store(0, Ordering::SeqCst);
    }
}
