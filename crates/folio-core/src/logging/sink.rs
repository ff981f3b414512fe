//! Destinations for rendered log lines.

use std::sync::{Arc, Mutex};

use tracing::Level;

use super::entry::LogEntry;

/// Receives one rendered JSON line per event.
///
/// Sinks are shared with the global subscriber, hence `Send + Sync`.
pub trait LogSink: Send + Sync + 'static {
    fn write_line(&self, level: Level, line: &str);
}

/// Collects lines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Lines parsed back into entries. Unparseable lines are skipped.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lines()
            .iter()
            .filter_map(|line| LogEntry::from_json_line(line).ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, _level: Level, line: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_string());
    }
}
