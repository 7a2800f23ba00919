//! CLI module for profbin
//!
//! - inquire: print a file's collection header
//! - verify: decode every record of a file
//! - version: print the implementation tag

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, RecordKind};
pub use commands::{inquire, run_command, verify};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{print_response, write_response};

/// Parse arguments, run the command, print its result
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let data = run_command(cli.command)?;
    print_response(data)
}
