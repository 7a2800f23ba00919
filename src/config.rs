//! Session configuration
//!
//! Loaded from a JSON file; every field is optional.
//!
//! ```json
//! { "keep_open": false, "quiet": true, "close_borrowed": false, "layout": "signed" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::Layout;
use crate::session::{ReadOptions, WriteOptions};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Defaults applied to every read and write of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Leave owned handles open and hand them back to the caller
    pub keep_open: bool,
    /// Suppress informational messages. Errors are always reported.
    pub quiet: bool,
    /// Close caller-supplied handles when the call ends
    pub close_borrowed: bool,
    /// Layout used for new files
    pub layout: Layout,
}

impl SessionConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse configuration from a JSON string
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            keep_open: self.keep_open,
            quiet: self.quiet,
            close_borrowed: self.close_borrowed,
        }
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            keep_open: self.keep_open,
            quiet: self.quiet,
            close_borrowed: self.close_borrowed,
            layout: self.layout,
        }
    }
}
