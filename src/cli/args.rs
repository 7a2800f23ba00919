//! CLI argument definitions using clap
//!
//! Commands:
//! - profbin inquire --kind <kind> <file>
//! - profbin verify --kind <kind> <file>
//! - profbin version

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// profbin - inspect profile collection files
#[derive(Parser, Debug)]
#[command(name = "profbin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Record type stored in a file
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Cloud,
    Atmosphere,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the collection header of a file
    Inquire {
        /// Record type stored in the file
        #[arg(long, value_enum, default_value = "cloud")]
        kind: RecordKind,

        /// Collection file
        file: PathBuf,
    },

    /// Decode every record of a file, checking signed files' checksums
    Verify {
        #[arg(long, value_enum, default_value = "cloud")]
        kind: RecordKind,

        /// Largest record count accepted
        #[arg(long)]
        capacity: Option<usize>,

        file: PathBuf,
    },

    /// Print the protocol implementation tag
    Version,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
