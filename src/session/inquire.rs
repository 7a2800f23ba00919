//! Header-only inspection of a collection file

use std::io::BufReader;
use std::path::Path;

use super::handle::{AccessMode, BinaryFile};
use super::{routine_name, FileSession};
use crate::codec::{inquire_count, CollectionHeader};
use crate::diagnostics::DiagnosticSink;
use crate::errors::BinaryResult;
use crate::object::Record;

impl<S: DiagnosticSink> FileSession<S> {
    /// Reads the collection header of `path` without decoding any record.
    ///
    /// The file is always closed before returning.
    ///
    /// # Errors
    ///
    /// `NotFound`, `OpenFailed`, `HeaderReadFailed`, or `MalformedHeader`
    /// for a signed file of an unknown format version.
    pub fn inquire<T: Record>(&self, path: impl AsRef<Path>) -> BinaryResult<CollectionHeader> {
        let routine = routine_name::<T>("inquire");

        let mut file = BinaryFile::open(path.as_ref()).map_err(|e| self.report(&routine, e))?;

        let header = file
            .stream(AccessMode::Read)
            .and_then(|stream| inquire_count(&mut BufReader::new(stream)));
        let closed = file.close();

        match (header, closed) {
            (Ok(header), Ok(())) => Ok(header),
            (Ok(_), Err(e)) => Err(self.report(&routine, e)),
            (Err(e), Ok(())) => Err(self.report(&routine, e)),
            (Err(e), Err(close_err)) => Err(self.report(&routine, e.with_cleanup_note(close_err))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Layout;
    use crate::diagnostics::{MemorySink, Severity};
    use crate::errors::BinaryErrorCode;
    use crate::object::Cloud;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_inquire_plain_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clouds.bin");
        let mut bytes = 7i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        fs::write(&path, bytes).unwrap();

        let session = FileSession::with_sink(MemorySink::new());
        let header = session.inquire::<Cloud>(&path).unwrap();

        assert_eq!(header.count, 7);
        assert_eq!(header.layout, Layout::Plain);
        assert_eq!(header.format_version, None);
        assert!(session.sink().is_empty());
    }

    #[test]
    fn test_inquire_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let session = FileSession::with_sink(MemorySink::new());

        let err = session
            .inquire::<Cloud>(temp_dir.path().join("missing.bin"))
            .unwrap_err();

        assert_eq!(err.code(), BinaryErrorCode::NotFound);
        assert_eq!(session.sink().messages_at(Severity::Error).len(), 1);
    }

    #[test]
    fn test_inquire_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.bin");
        fs::write(&path, b"").unwrap();

        let session = FileSession::with_sink(MemorySink::new());
        let err = session.inquire::<Cloud>(&path).unwrap_err();
        assert_eq!(err.code(), BinaryErrorCode::HeaderReadFailed);
    }
}
