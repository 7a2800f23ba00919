//! CLI command implementations
//!
//! Each command produces one JSON value; diagnostics go through the
//! structured logger and errors surface as `CliError`.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::object::{reserve_failed, zeroed, Atmosphere, Cloud, Record};
use crate::session::{version, FileSession, ReadOptions};

use super::args::{Command, RecordKind};
use super::errors::CliResult;

/// Run one command and return its JSON result
pub fn run_command(command: Command) -> CliResult<Value> {
    match command {
        Command::Inquire { kind, file } => match kind {
            RecordKind::Cloud => inquire::<Cloud>(&file),
            RecordKind::Atmosphere => inquire::<Atmosphere>(&file),
        },
        Command::Verify {
            kind,
            capacity,
            file,
        } => match kind {
            RecordKind::Cloud => verify::<Cloud>(&file, capacity),
            RecordKind::Atmosphere => verify::<Atmosphere>(&file, capacity),
        },
        Command::Version => Ok(json!({ "version": version() })),
    }
}

/// Header-only inspection
pub fn inquire<T: Record>(file: &Path) -> CliResult<Value> {
    let header = FileSession::new().inquire::<T>(file)?;
    Ok(json!({
        "kind": T::KIND,
        "file": file.display().to_string(),
        "header": serde_json::to_value(header)?,
    }))
}

/// Full decode. Capacity defaults to the count in the file header.
pub fn verify<T: Record + Clone>(file: &Path, capacity: Option<usize>) -> CliResult<Value> {
    let session = FileSession::new();
    let capacity = match capacity {
        Some(capacity) => capacity,
        None => {
            let count = session.inquire::<T>(file)?.count;
            // No more records than the file length allows; the read reports the rest.
            count.min(max_records::<T>(fs::metadata(file)?.len()))
        }
    };

    let mut destination: Vec<T> =
        zeroed(capacity).map_err(|e| reserve_failed(T::KIND, "destination", e))?;
    let options = ReadOptions {
        quiet: true,
        ..ReadOptions::default()
    };
    let outcome = session.read(file, &mut destination, options)?;

    let dimensions: Vec<Vec<usize>> = destination[..outcome.count]
        .iter()
        .map(|record| record.dimensions())
        .collect();

    Ok(json!({
        "kind": T::KIND,
        "file": file.display().to_string(),
        "count": outcome.count,
        "dimensions": dimensions,
    }))
}

fn max_records<T: Record>(file_len: u64) -> usize {
    let most = file_len / T::min_encoded_len().max(1);
    usize::try_from(most).unwrap_or(usize::MAX)
}
