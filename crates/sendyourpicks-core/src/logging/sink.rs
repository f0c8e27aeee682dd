use std::sync::{Arc, Mutex, MutexGuard};

use super::record::{LogLevel, LogRecord};

/// `tracing` target carrying rendered event lines.
///
/// Subscribers can give this target its own plain formatting layer so the
/// line reaches the output exactly as rendered.
pub const EVENT_TARGET: &str = "sendyourpicks::events";

/// Destination for rendered log records.
///
/// Implementations must not fail or block beyond writing a single line.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Emits records through `tracing`, one event per record.
///
/// Error records go out at `ERROR`, warnings at `WARN`, everything else at
/// `INFO`, so a subscriber can split the high-visibility stream by level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        let line = record.render();
        match record.level {
            LogLevel::Error => tracing::error!(target: EVENT_TARGET, "{}", line),
            LogLevel::Warn => tracing::warn!(target: EVENT_TARGET, "{}", line),
            LogLevel::Info => tracing::info!(target: EVENT_TARGET, "{}", line),
        }
    }
}

/// Collects records in memory instead of writing them anywhere.
/// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(LogRecord::render).collect()
    }

    /// Names of the captured events, in emission order.
    pub fn events(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.event.clone()).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock only ever interrupts a push, so the
    // buffer is still usable.
    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        self.lock().push(record.clone());
    }
}
