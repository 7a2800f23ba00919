//! Writing a collection file, with rollback of owned output

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::handle::{AccessMode, BinaryFile, Handle, Ownership, Target};
use super::{routine_name, FileSession, WriteOptions, WriteOutcome};
use crate::codec::{encode_collection, Layout};
use crate::diagnostics::DiagnosticSink;
use crate::errors::{BinaryError, BinaryResult};
use crate::object::Record;

impl<S: DiagnosticSink> FileSession<S> {
    /// Writes `source` as one collection.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if any record is unassociated; nothing is opened in
    /// that case. Any later failure is a `WriteFailed` wrapping the
    /// underlying error. If the call opened the file, the file is deleted.
    /// A borrowed handle is left as it is.
    pub fn write<'a, T: Record>(
        &self,
        target: impl Into<Target<'a>>,
        source: &[T],
        options: WriteOptions,
    ) -> BinaryResult<WriteOutcome> {
        let routine = routine_name::<T>("write");
        let target = target.into();
        let path = target.path().to_path_buf();

        validate_source(source).map_err(|e| self.report(&routine, e))?;

        let mut handle = match target {
            Target::Path(path) => match BinaryFile::create(path) {
                Ok(file) => Handle::Owned(file),
                Err(e) => {
                    return Err(self.report(&routine, BinaryError::write_failed_for(path, e)));
                }
            },
            Target::Handle(file) => Handle::Borrowed(file),
        };
        let ownership = handle.ownership();

        if let Err(e) = encode_into(handle.file(), source, options.layout) {
            let err = BinaryError::write_failed_for(&path, e);
            let err = match handle {
                Handle::Owned(mut file) => {
                    let err = match file.close() {
                        Ok(()) => err,
                        Err(close_err) => err.with_cleanup_note(close_err),
                    };
                    remove_output(&path, err)
                }
                Handle::Borrowed(file) if options.close_borrowed => match file.close() {
                    Ok(()) => err,
                    Err(close_err) => err.with_cleanup_note(close_err),
                },
                Handle::Borrowed(_) => err,
            };
            return Err(self.report(&routine, err));
        }

        let handle = match handle.release(options.keep_open, options.close_borrowed) {
            Ok(kept) => kept,
            Err(e) => {
                let mut err = BinaryError::write_failed_for(&path, e);
                if ownership == Ownership::Owned {
                    err = remove_output(&path, err);
                }
                return Err(self.report(&routine, err));
            }
        };

        self.inform(
            &routine,
            options.quiet,
            &format!(
                "Number of {} records written to {}: {}",
                T::KIND,
                path.display(),
                source.len()
            ),
        );

        Ok(WriteOutcome {
            count: source.len(),
            ownership,
            handle,
        })
    }
}

/// Every record must be associated with all dimensions >= 1.
fn validate_source<T: Record>(source: &[T]) -> BinaryResult<()> {
    for (i, record) in source.iter().enumerate() {
        let dimensions = record.dimensions();
        if !record.is_associated() || dimensions.iter().any(|d| *d < 1) {
            return Err(BinaryError::invalid_input(format!(
                "{} {} is not associated (dimensions {:?})",
                T::KIND,
                i + 1,
                dimensions
            )));
        }
    }
    Ok(())
}

fn encode_into<T: Record>(file: &mut BinaryFile, source: &[T], layout: Layout) -> BinaryResult<()> {
    let stream = file.stream(AccessMode::Write)?;
    let mut writer = BufWriter::new(stream);
    encode_collection(&mut writer, source, layout)?;
    writer
        .flush()
        .map_err(|e| BinaryError::write_failed("Failed to flush output", e))
}

/// Deletes a partially written output file
fn remove_output(path: &Path, err: BinaryError) -> BinaryError {
    match fs::remove_file(path) {
        Ok(()) => err,
        Err(e) => err.with_cleanup_note(format!("Failed to delete {}: {}", path.display(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemorySink, Severity};
    use crate::errors::BinaryErrorCode;
    use crate::object::Cloud;
    use tempfile::TempDir;

    #[test]
    fn test_validate_source_names_first_bad_record() {
        let source = vec![Cloud::new(1).unwrap(), Cloud::default(), Cloud::default()];
        let err = validate_source(&source).unwrap_err();
        assert_eq!(err.code(), BinaryErrorCode::InvalidInput);
        assert!(err.message().contains("cloud 2"));
    }

    #[test]
    fn test_failed_removal_is_noted_on_original_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.bin");
        let cause = BinaryError::invalid_object("cloud 1 is not associated");
        let err = remove_output(&path, BinaryError::write_failed_for(&path, cause));

        assert_eq!(err.code(), BinaryErrorCode::WriteFailed);
        assert_eq!(err.root_code(), BinaryErrorCode::InvalidObject);
        assert_eq!(err.cleanup_notes().len(), 1);
        assert!(err.cleanup_notes()[0].contains("Failed to delete"));
        assert!(err.to_string().contains("; cleanup: Failed to delete"));
    }

    #[test]
    fn test_write_creates_file_and_reports_count() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clouds.bin");
        let session = FileSession::with_sink(MemorySink::new());

        let outcome = session
            .write(&path, &[Cloud::new(2).unwrap()], WriteOptions::default())
            .unwrap();

        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.ownership, Ownership::Owned);
        assert!(outcome.handle.is_none());
        // count + n_layers + type + 3 * 2 reals
        assert_eq!(fs::metadata(&path).unwrap().len(), 4 + 4 + 4 + 48);

        let info = session.sink().messages_at(Severity::Info);
        assert_eq!(info.len(), 1);
        assert!(info[0].contains("written"));
    }

    #[test]
    fn test_write_keep_open_returns_handle() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clouds.bin");
        let session = FileSession::with_sink(MemorySink::new());
        let options = WriteOptions {
            keep_open: true,
            quiet: true,
            ..WriteOptions::default()
        };

        let outcome = session.write(&path, &[Cloud::new(1).unwrap()], options).unwrap();
        let mut file = outcome.handle.expect("handle kept open");
        assert!(file.is_open());
        assert_eq!(file.position().unwrap(), 4 + 4 + 4 + 24);
        file.close().unwrap();
        assert!(session.sink().is_empty());
    }
}
