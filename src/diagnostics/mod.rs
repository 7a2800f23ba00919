//! Diagnostics for the binary I/O layer
//!
//! Status and error messages are handed to a [`DiagnosticSink`]. The sink
//! decides where they go; emitting never fails and never panics.
//!
//! ```ignore
//! use profbin::diagnostics::{DiagnosticSink, JsonLogSink, Severity};
//!
//! JsonLogSink.emit("read_clouds", "Number of clouds read from clouds.bin: 3", Severity::Info);
//! ```

mod logger;

use std::fmt;
use std::sync::Mutex;

pub use logger::Logger;

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Receiver for human-readable status and error messages.
pub trait DiagnosticSink {
    /// Deliver one message. Must not fail.
    fn emit(&self, routine: &str, message: &str, severity: Severity);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, routine: &str, message: &str, severity: Severity) {
        (**self).emit(routine, message, severity)
    }
}

/// Sink that writes structured JSON lines through [`Logger`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLogSink;

impl DiagnosticSink for JsonLogSink {
    fn emit(&self, routine: &str, message: &str, severity: Severity) {
        Logger::log(
            severity,
            "PROFBIN_DIAGNOSTIC",
            &[("routine", routine), ("message", message)],
        );
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _routine: &str, _message: &str, _severity: Severity) {}
}

/// One captured message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub routine: String,
    pub message: String,
    pub severity: Severity,
}

/// In-memory sink, for tests and for callers that forward messages later.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything emitted so far
    pub fn entries(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns the messages emitted at `severity`
    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, routine: &str, message: &str, severity: Severity) {
        let entry = Diagnostic {
            routine: routine.to_string(),
            message: message.to_string(),
            severity,
        };
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}
