//! Binary I/O error types
//!
//! Error codes:
//! - PROFBIN_NOT_FOUND (ERROR severity)
//! - PROFBIN_OPEN_FAILED (ERROR severity)
//! - PROFBIN_HEADER_READ_FAILED (ERROR severity)
//! - PROFBIN_MALFORMED_HEADER (ERROR severity)
//! - PROFBIN_ALLOCATION_FAILED (ERROR severity)
//! - PROFBIN_TRUNCATED_PAYLOAD (ERROR severity)
//! - PROFBIN_COUNT_EXCEEDS_CAPACITY (ERROR severity)
//! - PROFBIN_INVALID_OBJECT (ERROR severity)
//! - PROFBIN_INVALID_INPUT (ERROR severity)
//! - PROFBIN_WRITE_FAILED (ERROR severity)
//! - PROFBIN_READ_FAILED (ERROR severity)
//! - PROFBIN_CLOSE_FAILED (WARNING severity)
//! - PROFBIN_CHECKSUM_MISMATCH (ERROR severity)
//! - PROFBIN_SEEK_FAILED (ERROR severity)
//!
//! Every error is fatal to the call that raised it. There is no retry.

use std::fmt;
use std::io;

use crate::diagnostics::Severity;

/// Closed set of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryErrorCode {
    /// Filename does not resolve to an existing file
    NotFound,
    /// Stream could not be opened
    OpenFailed,
    /// Collection count header could not be decoded
    HeaderReadFailed,
    /// Record header could not be read in full
    MalformedHeader,
    /// Domain object could not be created from decoded dimensions
    AllocationFailed,
    /// Fewer payload bytes available than the header implies
    TruncatedPayload,
    /// Declared count exceeds destination capacity
    CountExceedsCapacity,
    /// Attempt to encode an unassociated object
    InvalidObject,
    /// Write source failed validation
    InvalidInput,
    /// Underlying stream write failed
    WriteFailed,
    /// Read entry point failed; the cause holds the underlying error
    ReadFailed,
    /// Stream close failed
    CloseFailed,
    /// Signed file trailer did not match its records
    ChecksumMismatch,
    /// Stream position could not be queried or moved
    SeekFailed,
}

impl BinaryErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            BinaryErrorCode::NotFound => "PROFBIN_NOT_FOUND",
            BinaryErrorCode::OpenFailed => "PROFBIN_OPEN_FAILED",
            BinaryErrorCode::HeaderReadFailed => "PROFBIN_HEADER_READ_FAILED",
            BinaryErrorCode::MalformedHeader => "PROFBIN_MALFORMED_HEADER",
            BinaryErrorCode::AllocationFailed => "PROFBIN_ALLOCATION_FAILED",
            BinaryErrorCode::TruncatedPayload => "PROFBIN_TRUNCATED_PAYLOAD",
            BinaryErrorCode::CountExceedsCapacity => "PROFBIN_COUNT_EXCEEDS_CAPACITY",
            BinaryErrorCode::InvalidObject => "PROFBIN_INVALID_OBJECT",
            BinaryErrorCode::InvalidInput => "PROFBIN_INVALID_INPUT",
            BinaryErrorCode::WriteFailed => "PROFBIN_WRITE_FAILED",
            BinaryErrorCode::ReadFailed => "PROFBIN_READ_FAILED",
            BinaryErrorCode::CloseFailed => "PROFBIN_CLOSE_FAILED",
            BinaryErrorCode::ChecksumMismatch => "PROFBIN_CHECKSUM_MISMATCH",
            BinaryErrorCode::SeekFailed => "PROFBIN_SEEK_FAILED",
        }
    }

    /// Returns the severity used when this error is reported
    pub fn severity(&self) -> Severity {
        match self {
            BinaryErrorCode::CloseFailed => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for BinaryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error type with full context.
///
/// A wrapping error (`ReadFailed`, `WriteFailed` around a codec failure)
/// keeps the underlying error as its cause. Failures hit while cleaning up
/// after the first error are attached as notes on the same value.
#[derive(Debug)]
pub struct BinaryError {
    /// Error code
    code: BinaryErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying error this one wraps
    cause: Option<Box<BinaryError>>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
    /// Failures raised while unwinding
    cleanup: Vec<String>,
}

impl BinaryError {
    /// Create an error without an IO source
    pub fn new(code: BinaryErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            cause: None,
            source: None,
            cleanup: Vec::new(),
        }
    }

    /// Create an error backed by an IO error
    pub fn with_io(code: BinaryErrorCode, message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(code, message)
        }
    }

    pub fn not_found(path: &std::path::Path) -> Self {
        Self::new(
            BinaryErrorCode::NotFound,
            format!("File not found: {}", path.display()),
        )
    }

    pub fn open_failed(path: &std::path::Path, source: io::Error) -> Self {
        Self::with_io(
            BinaryErrorCode::OpenFailed,
            format!("Failed to open file: {}", path.display()),
            source,
        )
    }

    pub fn header_read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::with_io(BinaryErrorCode::HeaderReadFailed, message, source)
    }

    pub fn malformed_header(message: impl Into<String>) -> Self {
        Self::new(BinaryErrorCode::MalformedHeader, message)
    }

    pub fn allocation_failed(message: impl Into<String>) -> Self {
        Self::new(BinaryErrorCode::AllocationFailed, message)
    }

    pub fn truncated_payload(message: impl Into<String>, source: io::Error) -> Self {
        Self::with_io(BinaryErrorCode::TruncatedPayload, message, source)
    }

    pub fn count_exceeds_capacity(count: usize, capacity: usize) -> Self {
        Self::new(
            BinaryErrorCode::CountExceedsCapacity,
            format!(
                "File holds {} records but destination capacity is {}",
                count, capacity
            ),
        )
    }

    pub fn invalid_object(message: impl Into<String>) -> Self {
        Self::new(BinaryErrorCode::InvalidObject, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(BinaryErrorCode::InvalidInput, message)
    }

    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::with_io(BinaryErrorCode::WriteFailed, message, source)
    }

    pub fn close_failed(path: &std::path::Path, source: io::Error) -> Self {
        Self::with_io(
            BinaryErrorCode::CloseFailed,
            format!("Failed to close file: {}", path.display()),
            source,
        )
    }

    pub fn checksum_mismatch(computed: u32, stored: u32) -> Self {
        Self::new(
            BinaryErrorCode::ChecksumMismatch,
            format!(
                "Checksum mismatch: computed {:08x}, stored {:08x}",
                computed, stored
            ),
        )
    }

    pub fn seek_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::with_io(BinaryErrorCode::SeekFailed, message, source)
    }

    /// Wrap `cause` in a `ReadFailed` error for `path`
    pub fn read_failed(path: &std::path::Path, cause: BinaryError) -> Self {
        Self::wrap(
            BinaryErrorCode::ReadFailed,
            format!("Error reading file: {}", path.display()),
            cause,
        )
    }

    /// Wrap `cause` in a `WriteFailed` error for `path`
    pub fn write_failed_for(path: &std::path::Path, cause: BinaryError) -> Self {
        Self::wrap(
            BinaryErrorCode::WriteFailed,
            format!("Error writing file: {}", path.display()),
            cause,
        )
    }

    fn wrap(code: BinaryErrorCode, message: String, cause: BinaryError) -> Self {
        Self {
            cause: Some(Box::new(cause)),
            ..Self::new(code, message)
        }
    }

    /// Attach context details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Record a failure hit while cleaning up after this error
    pub fn with_cleanup_note(mut self, note: impl fmt::Display) -> Self {
        self.cleanup.push(note.to_string());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> BinaryErrorCode {
        self.code
    }

    /// Returns the code of the innermost cause
    pub fn root_code(&self) -> BinaryErrorCode {
        match self.cause {
            Some(ref cause) => cause.root_code(),
            None => self.code,
        }
    }

    /// Returns true if this error or any cause carries `code`
    pub fn involves(&self, code: BinaryErrorCode) -> bool {
        self.code == code || self.cause.as_ref().is_some_and(|c| c.involves(code))
    }

    /// Returns the wrapped error, if any
    pub fn cause(&self) -> Option<&BinaryError> {
        self.cause.as_deref()
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns notes from failed cleanup steps
    pub fn cleanup_notes(&self) -> &[String] {
        &self.cleanup
    }
}

impl fmt::Display for BinaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        if let Some(ref cause) = self.cause {
            write!(f, "; {}", cause)?;
        }
        for note in &self.cleanup {
            write!(f, "; cleanup: {}", note)?;
        }
        Ok(())
    }
}

impl std::error::Error for BinaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Some(ref cause) = self.cause {
            return Some(cause.as_ref() as &(dyn std::error::Error + 'static));
        }
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for binary I/O operations
pub type BinaryResult<T> = Result<T, BinaryError>;
