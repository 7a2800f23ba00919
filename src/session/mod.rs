//! File sessions: inquire, read and write collection files
//!
//! Every entry point runs to completion on the calling thread. Handles the
//! call opens are released on every exit path unless `keep_open` hands
//! them back; handles the caller supplies are left open unless
//! `close_borrowed` is set. A borrowed handle's position is advanced by the
//! call and not restored.
//!
//! Failures are reported to the session's [`DiagnosticSink`] and returned.
//! A failed read leaves the destination destroyed; a failed write into a
//! file the call opened deletes that file.

mod handle;
mod inquire;
mod read;
mod write;

use crate::diagnostics::{DiagnosticSink, JsonLogSink, Severity};
use crate::errors::BinaryError;
use crate::object::Record;

pub use handle::{AccessMode, BinaryFile, Ownership, Target};

/// Protocol implementation tag
pub const VERSION: &str = concat!("profbin ", env!("CARGO_PKG_VERSION"), " (format 1)");

/// Returns the protocol implementation tag. No I/O.
pub fn version() -> &'static str {
    VERSION
}

/// Options for [`FileSession::read`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    /// Return an owned handle instead of closing it
    pub keep_open: bool,
    /// Suppress the informational count message
    pub quiet: bool,
    /// Close a borrowed handle when the call ends
    pub close_borrowed: bool,
}

/// Options for [`FileSession::write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    pub keep_open: bool,
    pub quiet: bool,
    pub close_borrowed: bool,
    /// Layout for the written collection
    pub layout: crate::codec::Layout,
}

/// Result of a successful read
#[derive(Debug)]
pub struct ReadOutcome {
    /// Records placed at the front of the destination
    pub count: usize,
    pub ownership: Ownership,
    /// The owned handle, when `keep_open` was requested
    pub handle: Option<BinaryFile>,
}

/// Result of a successful write
#[derive(Debug)]
pub struct WriteOutcome {
    pub count: usize,
    pub ownership: Ownership,
    pub handle: Option<BinaryFile>,
}

/// Entry points for collection files, reporting to a diagnostic sink.
#[derive(Debug, Default)]
pub struct FileSession<S = JsonLogSink> {
    sink: S,
}

impl FileSession<JsonLogSink> {
    /// Session reporting through the structured JSON logger
    pub fn new() -> Self {
        Self { sink: JsonLogSink }
    }
}

impl<S: DiagnosticSink> FileSession<S> {
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Forward `err` to the sink and hand it back
    fn report(&self, routine: &str, err: BinaryError) -> BinaryError {
        self.sink.emit(routine, &err.to_string(), err.severity());
        err
    }

    fn inform(&self, routine: &str, quiet: bool, message: &str) {
        if !quiet {
            self.sink.emit(routine, message, Severity::Info);
        }
    }
}

/// Diagnostic routine name, e.g. `read_cloud_binary`
fn routine_name<T: Record>(operation: &str) -> String {
    format!("{}_{}_binary", operation, T::KIND)
}

/// Destroy every element of `records`
fn destroy_all<T: Record>(records: &mut [T]) {
    for record in records.iter_mut() {
        record.destroy();
    }
}
