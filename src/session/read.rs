//! Reading a collection file into caller storage

use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};

use super::handle::{AccessMode, BinaryFile, Handle, Target};
use super::{destroy_all, routine_name, FileSession, ReadOptions, ReadOutcome};
use crate::codec::decode_collection_within;
use crate::diagnostics::DiagnosticSink;
use crate::errors::{BinaryError, BinaryErrorCode, BinaryResult};
use crate::object::Record;

impl<S: DiagnosticSink> FileSession<S> {
    /// Reads a collection into the front of `destination`.
    ///
    /// The destination length is the capacity: a file holding more records
    /// fails with `CountExceedsCapacity`. Slots past the returned count are
    /// left untouched on success.
    ///
    /// # Errors
    ///
    /// Every failure is a `ReadFailed` wrapping the underlying error. On
    /// failure every destination slot is destroyed and an owned handle is
    /// closed.
    pub fn read<'a, T: Record>(
        &self,
        target: impl Into<Target<'a>>,
        destination: &mut [T],
        options: ReadOptions,
    ) -> BinaryResult<ReadOutcome> {
        let routine = routine_name::<T>("read");
        let target = target.into();
        let path = target.path().to_path_buf();

        let mut handle = match target {
            Target::Path(path) => match BinaryFile::open(path) {
                Ok(file) => Handle::Owned(file),
                Err(e) => {
                    destroy_all(destination);
                    return Err(self.report(&routine, BinaryError::read_failed(path, e)));
                }
            },
            Target::Handle(file) => Handle::Borrowed(file),
        };
        let ownership = handle.ownership();

        let count = match decode_into(handle.file(), destination) {
            Ok(count) => count,
            Err(e) => {
                destroy_all(destination);
                let mut err = BinaryError::read_failed(&path, e);
                let closing = matches!(handle, Handle::Owned(_)) || options.close_borrowed;
                if closing {
                    if let Err(close_err) = handle.file().close() {
                        err = err.with_cleanup_note(close_err);
                    }
                }
                return Err(self.report(&routine, err));
            }
        };

        let handle = match handle.release(options.keep_open, options.close_borrowed) {
            Ok(kept) => kept,
            Err(e) => {
                destroy_all(destination);
                return Err(self.report(&routine, BinaryError::read_failed(&path, e)));
            }
        };

        self.inform(
            &routine,
            options.quiet,
            &format!(
                "Number of {} records read from {}: {}",
                T::KIND,
                path.display(),
                count
            ),
        );

        Ok(ReadOutcome {
            count,
            ownership,
            handle,
        })
    }
}

/// Decodes into the front of `destination` and leaves the stream positioned
/// just past the collection.
fn decode_into<T: Record>(file: &mut BinaryFile, destination: &mut [T]) -> BinaryResult<usize> {
    let stream = file.stream(AccessMode::Read)?;
    let available = remaining_bytes(stream)?;
    let mut reader = BufReader::new(stream);

    let records: Vec<T> =
        decode_collection_within(&mut reader, destination.len(), Some(available))?;

    // Drop read-ahead so the shared position matches what was consumed.
    let reposition_failed =
        |e: std::io::Error| BinaryError::seek_failed("Failed to reposition stream after read", e);
    let consumed = reader.stream_position().map_err(reposition_failed)?;
    reader
        .into_inner()
        .seek(SeekFrom::Start(consumed))
        .map_err(reposition_failed)?;

    let count = records.len();
    for (slot, record) in destination.iter_mut().zip(records) {
        *slot = record;
    }
    Ok(count)
}

/// Bytes between the current position and the end of the file
fn remaining_bytes(stream: &mut File) -> BinaryResult<u64> {
    let len = stream
        .metadata()
        .map_err(|e| BinaryError::with_io(BinaryErrorCode::ReadFailed, "Failed to stat file", e))?
        .len();
    let position = stream
        .stream_position()
        .map_err(|e| BinaryError::seek_failed("Failed to query stream position", e))?;
    Ok(len.saturating_sub(position))
}
