//! Collection codec
//!
//! Plain layout:
//!
//! ```text
//! +-----------------+
//! | count (i32)     |
//! +-----------------+
//! | record 1        |
//! | ...             |
//! | record count    |
//! +-----------------+
//! ```
//!
//! Signed layout adds a header and a trailer:
//!
//! ```text
//! +------------------------+
//! | FILE_MAGIC (i32 < 0)   |
//! | format version (i32)   |
//! | count (i32)            |
//! +------------------------+
//! | records                |
//! +------------------------+
//! | crc32 of records (u32) |
//! +------------------------+
//! ```
//!
//! The magic is negative, so a plain file can never be mistaken for a
//! signed one and plain files keep decoding unchanged.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::checksum::{ChecksumReader, ChecksumWriter};
use super::primitives::{read_i32, read_u32, write_i32, write_u32};
use super::record::{decode_record_within, encode_record};
use crate::errors::{BinaryError, BinaryErrorCode, BinaryResult};
use crate::object::Record;

/// Leading word of a signed file
pub const FILE_MAGIC: i32 = -0x5052_4642;

/// Format version written into signed files
pub const FORMAT_VERSION: i32 = 1;

/// On-disk layout of a collection file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Count, then records
    #[default]
    Plain,
    /// Magic, version and count, then records, then a CRC32 trailer
    Signed,
}

/// What the leading words of a collection file say
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionHeader {
    pub count: usize,
    pub layout: Layout,
    /// Present for signed files only
    pub format_version: Option<i32>,
}

fn header_failed(what: &str) -> impl FnOnce(std::io::Error) -> BinaryError + '_ {
    move |e| BinaryError::header_read_failed(format!("Failed to read {}", what), e)
}

/// Reads only the collection header. No record is touched.
pub fn inquire_count<R: Read>(reader: &mut R) -> BinaryResult<CollectionHeader> {
    let first = read_i32(reader).map_err(header_failed("collection count"))?;

    let (count, layout, format_version) = if first == FILE_MAGIC {
        let version = read_i32(reader).map_err(header_failed("format version"))?;
        if version != FORMAT_VERSION {
            return Err(BinaryError::malformed_header(format!(
                "Unsupported format version {}",
                version
            )));
        }
        let count = read_i32(reader).map_err(header_failed("collection count"))?;
        (count, Layout::Signed, Some(version))
    } else {
        (first, Layout::Plain, None)
    };

    let count = usize::try_from(count).map_err(|_| {
        BinaryError::new(
            BinaryErrorCode::HeaderReadFailed,
            format!("Invalid collection count {}", count),
        )
    })?;

    Ok(CollectionHeader {
        count,
        layout,
        format_version,
    })
}

impl CollectionHeader {
    /// Bytes taken by the header words
    pub fn encoded_len(&self) -> u64 {
        match self.layout {
            Layout::Plain => 4,
            Layout::Signed => 12,
        }
    }

    /// Bytes taken by anything after the records
    pub fn trailer_len(&self) -> u64 {
        match self.layout {
            Layout::Plain => 0,
            Layout::Signed => 4,
        }
    }
}

/// Decodes a whole collection into a fresh vector.
///
/// Fails with `CountExceedsCapacity` before touching any record if the file
/// holds more than `capacity` records. If any record fails, everything
/// decoded so far is dropped and no partial collection is returned.
pub fn decode_collection<T: Record, R: Read>(
    reader: &mut R,
    capacity: usize,
) -> BinaryResult<Vec<T>> {
    decode_collection_within(reader, capacity, None)
}

/// Decodes a whole collection from a stream with `available` bytes left.
///
/// Header values are checked against `available` before anything is sized
/// from them: a count the remaining bytes cannot hold, or a record whose
/// payload runs past the end, fails with `TruncatedPayload`.
pub fn decode_collection_within<T: Record, R: Read>(
    reader: &mut R,
    capacity: usize,
    available: Option<u64>,
) -> BinaryResult<Vec<T>> {
    let header = inquire_count(reader)?;
    let body = available.map(|a| {
        a.saturating_sub(header.encoded_len())
            .saturating_sub(header.trailer_len())
    });

    if let Some(body) = body {
        let least = (header.count as u64).saturating_mul(T::min_encoded_len());
        if least > body {
            return Err(BinaryError::new(
                BinaryErrorCode::TruncatedPayload,
                format!(
                    "{} {} records need at least {} bytes, {} left",
                    header.count,
                    T::KIND,
                    least,
                    body
                ),
            ));
        }
    }
    if header.count > capacity {
        return Err(BinaryError::count_exceeds_capacity(header.count, capacity));
    }

    match header.layout {
        Layout::Plain => decode_records(reader, header.count, body),
        Layout::Signed => {
            let mut hashed = ChecksumReader::new(reader);
            let records = decode_records(&mut hashed, header.count, body)?;
            let computed = hashed.checksum();

            let stored = read_u32(reader).map_err(|e| {
                BinaryError::truncated_payload("Failed to read checksum trailer", e)
            })?;
            if computed != stored {
                return Err(BinaryError::checksum_mismatch(computed, stored));
            }
            Ok(records)
        }
    }
}

fn decode_records<T: Record, R: Read>(
    reader: &mut R,
    count: usize,
    body: Option<u64>,
) -> BinaryResult<Vec<T>> {
    let mut tally = Tally::new(reader);
    let mut records = Vec::with_capacity(count);
    for index in 1..=count {
        let left = body.map(|b| b.saturating_sub(tally.consumed));
        records.push(decode_record_within(&mut tally, index, left)?);
    }
    Ok(records)
}

/// Reader that counts the bytes it hands out
struct Tally<'a, R> {
    inner: &'a mut R,
    consumed: u64,
}

impl<'a, R: Read> Tally<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self { inner, consumed: 0 }
    }
}

impl<R: Read> Read for Tally<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed += n as u64;
        Ok(n)
    }
}

/// Encodes a whole collection.
///
/// Stops at the first record that fails; the stream is then left truncated
/// and the caller is expected to discard it.
pub fn encode_collection<T: Record, W: Write>(
    writer: &mut W,
    records: &[T],
    layout: Layout,
) -> BinaryResult<()> {
    let count = i32::try_from(records.len()).map_err(|_| {
        BinaryError::invalid_input(format!("{} records do not fit the header", records.len()))
    })?;

    let header_write_failed =
        |e: std::io::Error| BinaryError::write_failed("Failed to write collection header", e);
    if layout == Layout::Signed {
        write_i32(writer, FILE_MAGIC).map_err(header_write_failed)?;
        write_i32(writer, FORMAT_VERSION).map_err(header_write_failed)?;
    }
    write_i32(writer, count).map_err(header_write_failed)?;

    match layout {
        Layout::Plain => encode_records(writer, records),
        Layout::Signed => {
            let mut hashed = ChecksumWriter::new(writer);
            encode_records(&mut hashed, records)?;
            let checksum = hashed.checksum();
            write_u32(writer, checksum)
                .map_err(|e| BinaryError::write_failed("Failed to write checksum trailer", e))
        }
    }
}

fn encode_records<T: Record, W: Write>(writer: &mut W, records: &[T]) -> BinaryResult<()> {
    for (i, record) in records.iter().enumerate() {
        encode_record(writer, record, i + 1)?;
    }
    Ok(())
}
