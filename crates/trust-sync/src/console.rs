//! Injected logging sink.
//!
//! [`crate::sync::TrustSync`] writes its diagnostics through a [`Console`]
//! handed to it at construction instead of a process-wide logger.

use std::sync::Mutex;

use log::Level;

/// Log target used by [`LogConsole`].
pub const LOG_TARGET: &str = "trust_sync";

/// Destination for trust-layer diagnostics.
pub trait Console: Send + Sync {
    fn emit(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }
}

/// Forwards to the `log` facade under [`LOG_TARGET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogConsole;

impl Console for LogConsole {
    fn emit(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{message}");
    }
}

/// Keeps every line in memory. Useful in tests.
#[derive(Debug, Default)]
pub struct RecordingConsole {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded lines, oldest first.
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// `true` if any recorded line at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(l, line)| *l == level && line.contains(needle))
    }
}

impl Console for RecordingConsole {
    fn emit(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}
