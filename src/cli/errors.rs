//! CLI-specific error types

use std::fmt;
use std::io;

use crate::errors::BinaryError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// I/O error (stdout)
    IoError,
    /// Collection file error
    FileError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::IoError => "PROFBIN_CLI_IO_ERROR",
            Self::FileError => "PROFBIN_CLI_FILE_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::new(CliErrorCode::IoError, e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(CliErrorCode::IoError, format!("JSON error: {}", e))
    }
}

impl From<BinaryError> for CliError {
    fn from(e: BinaryError) -> Self {
        Self::new(CliErrorCode::FileError, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_is_reachable_from_a_conversion() {
        let io_err = CliError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        let json_err = CliError::from(serde_json::from_str::<u8>("x").unwrap_err());
        let file_err = CliError::from(BinaryError::invalid_input("empty"));

        assert_eq!(io_err.code(), &CliErrorCode::IoError);
        assert_eq!(json_err.code(), &CliErrorCode::IoError);
        assert_eq!(file_err.code(), &CliErrorCode::FileError);
        for err in [io_err, json_err, file_err] {
            assert!(err.to_string().starts_with("PROFBIN_CLI_"));
        }
    }

    #[test]
    fn test_binary_error_keeps_its_code_in_message() {
        let err = CliError::from(BinaryError::invalid_input("cloud 1 is not associated"));
        assert_eq!(err.code(), &CliErrorCode::FileError);
        assert!(err.to_string().starts_with("PROFBIN_CLI_FILE_ERROR"));
        assert!(err.message().contains("PROFBIN_INVALID_INPUT"));
    }
}
