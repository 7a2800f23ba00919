//! Open streams and who owns them
//!
//! A [`BinaryFile`] is an open file plus the path and mode it was opened
//! with. Entry points take a [`Target`]: a path, which the call opens and
//! owns, or a caller's `BinaryFile`, which the call borrows and leaves open.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::errors::{BinaryError, BinaryErrorCode, BinaryResult};

/// Direction a file was opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// An open collection file.
#[derive(Debug)]
pub struct BinaryFile {
    path: PathBuf,
    mode: AccessMode,
    file: Option<File>,
}

impl BinaryFile {
    /// Opens an existing file for reading.
    ///
    /// # Errors
    ///
    /// `NotFound` if `path` is not an existing file, `OpenFailed` if it
    /// cannot be opened.
    pub fn open(path: &Path) -> BinaryResult<Self> {
        if !path.is_file() {
            return Err(BinaryError::not_found(path));
        }
        let file = File::open(path).map_err(|e| BinaryError::open_failed(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            mode: AccessMode::Read,
            file: Some(file),
        })
    }

    /// Creates (or truncates) a file for writing.
    pub fn create(path: &Path) -> BinaryResult<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| BinaryError::open_failed(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            mode: AccessMode::Write,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Current byte position of the stream
    pub fn position(&mut self) -> BinaryResult<u64> {
        let path = self.path.clone();
        let file = self.file.as_mut().ok_or_else(|| closed(&path))?;
        file.stream_position().map_err(|e| {
            BinaryError::seek_failed(format!("Failed to query position of {}", path.display()), e)
        })
    }

    /// Moves the stream back to the first byte
    pub fn rewind(&mut self) -> BinaryResult<()> {
        let path = self.path.clone();
        let file = self.file.as_mut().ok_or_else(|| closed(&path))?;
        file.seek(SeekFrom::Start(0))
            .map(|_| ())
            .map_err(|e| BinaryError::seek_failed(format!("Failed to rewind {}", path.display()), e))
    }

    /// Closes the stream, syncing written data first. Closing twice is a no-op.
    pub fn close(&mut self) -> BinaryResult<()> {
        match self.file.take() {
            None => Ok(()),
            Some(file) => {
                if self.mode == AccessMode::Write {
                    file.sync_all()
                        .map_err(|e| BinaryError::close_failed(&self.path, e))?;
                }
                Ok(())
            }
        }
    }

    /// The open stream, if it was opened for `wanted`
    pub(crate) fn stream(&mut self, wanted: AccessMode) -> BinaryResult<&mut File> {
        if self.mode != wanted {
            return Err(BinaryError::new(
                BinaryErrorCode::OpenFailed,
                format!(
                    "{} is open for {:?}, not {:?}",
                    self.path.display(),
                    self.mode,
                    wanted
                ),
            ));
        }
        let path = &self.path;
        self.file.as_mut().ok_or_else(|| closed(path))
    }
}

fn closed(path: &Path) -> BinaryError {
    BinaryError::new(
        BinaryErrorCode::OpenFailed,
        format!("{} is closed", path.display()),
    )
}

/// Who is responsible for closing a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Opened by the call; closed by the call unless kept open
    Owned,
    /// Supplied by the caller; left open unless told otherwise
    Borrowed,
}

/// Where an entry point reads from or writes to
#[derive(Debug)]
pub enum Target<'a> {
    Path(&'a Path),
    Handle(&'a mut BinaryFile),
}

impl Target<'_> {
    pub fn path(&self) -> &Path {
        match self {
            Target::Path(path) => path,
            Target::Handle(file) => file.path(),
        }
    }
}

impl<'a> From<&'a Path> for Target<'a> {
    fn from(path: &'a Path) -> Self {
        Target::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for Target<'a> {
    fn from(path: &'a PathBuf) -> Self {
        Target::Path(path.as_path())
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(path: &'a str) -> Self {
        Target::Path(Path::new(path))
    }
}

impl<'a> From<&'a mut BinaryFile> for Target<'a> {
    fn from(file: &'a mut BinaryFile) -> Self {
        Target::Handle(file)
    }
}

/// A handle for the duration of one call
pub(crate) enum Handle<'a> {
    Owned(BinaryFile),
    Borrowed(&'a mut BinaryFile),
}

impl<'a> Handle<'a> {
    pub(crate) fn file(&mut self) -> &mut BinaryFile {
        match self {
            Handle::Owned(file) => file,
            Handle::Borrowed(file) => file,
        }
    }

    pub(crate) fn ownership(&self) -> Ownership {
        match self {
            Handle::Owned(_) => Ownership::Owned,
            Handle::Borrowed(_) => Ownership::Borrowed,
        }
    }

    /// Ends the call on success.
    ///
    /// Owned handles are closed, or returned when `keep_open` is set.
    /// Borrowed handles are closed only when `close_borrowed` is set.
    pub(crate) fn release(
        self,
        keep_open: bool,
        close_borrowed: bool,
    ) -> BinaryResult<Option<BinaryFile>> {
        match self {
            Handle::Owned(file) if keep_open => Ok(Some(file)),
            Handle::Owned(mut file) => {
                file.close()?;
                Ok(None)
            }
            Handle::Borrowed(file) => {
                if close_borrowed {
                    file.close()?;
                }
                Ok(None)
            }
        }
    }
}
