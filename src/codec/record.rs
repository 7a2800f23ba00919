//! Single-record codec
//!
//! ```text
//! +------------------------+
//! | dim_1 .. dim_k  (i32)  |  header, Record::DIMENSION_NAMES order
//! +------------------------+
//! | payload                |  length derived from the header alone
//! +------------------------+
//! ```

use std::io::{Read, Write};

use super::primitives::{read_i32, write_i32};
use crate::errors::{BinaryError, BinaryErrorCode, BinaryResult};
use crate::object::Record;

/// Decodes one record.
///
/// `index` is the 1-based position in the collection, used in messages.
/// A record that fails part way is dropped before the error is returned.
pub fn decode_record<T: Record, R: Read>(reader: &mut R, index: usize) -> BinaryResult<T> {
    decode_record_within(reader, index, None)
}

/// Decodes one record from a stream with `available` bytes left.
///
/// A header whose payload cannot fit in what is left fails with
/// `TruncatedPayload` before anything is allocated for it.
pub fn decode_record_within<T: Record, R: Read>(
    reader: &mut R,
    index: usize,
    available: Option<u64>,
) -> BinaryResult<T> {
    let mut dimensions = Vec::with_capacity(T::DIMENSION_NAMES.len());
    for name in T::DIMENSION_NAMES {
        let value = read_i32(reader).map_err(|e| {
            BinaryError::with_io(
                BinaryErrorCode::MalformedHeader,
                format!("Failed to read {} {} header field {}", T::KIND, index, name),
                e,
            )
        })?;
        // Negative values map to 0 so `create` rejects them.
        dimensions.push(usize::try_from(value).unwrap_or(0));
    }

    if let Some(available) = available {
        check_payload_fits::<T>(&dimensions, available, index)?;
    }

    let mut record = T::create(&dimensions).map_err(|e| {
        BinaryError::allocation_failed(format!("Failed to create {} {}", T::KIND, index))
            .with_details(e.message().to_string())
    })?;

    record.decode_payload(reader).map_err(|e| {
        BinaryError::truncated_payload(
            format!("Failed to read {} {} payload", T::KIND, index),
            e,
        )
        .with_details(format!("dimensions: {:?}", dimensions))
    })?;

    Ok(record)
}

/// Zero dimensions are left for `create` to reject.
fn check_payload_fits<T: Record>(
    dimensions: &[usize],
    available: u64,
    index: usize,
) -> BinaryResult<()> {
    if dimensions.contains(&0) {
        return Ok(());
    }

    let header = 4 * T::DIMENSION_NAMES.len() as u64;
    let left = available.saturating_sub(header);
    match T::payload_len(dimensions) {
        Some(needed) if needed <= left => Ok(()),
        Some(needed) => Err(BinaryError::new(
            BinaryErrorCode::TruncatedPayload,
            format!(
                "{} {} payload needs {} bytes, {} left",
                T::KIND,
                index,
                needed,
                left
            ),
        )
        .with_details(format!("dimensions: {:?}", dimensions))),
        None => Err(BinaryError::allocation_failed(format!(
            "{} {} payload size overflows for dimensions {:?}",
            T::KIND,
            index,
            dimensions
        ))),
    }
}

/// Encodes one record. Unassociated records are rejected before any byte is written.
pub fn encode_record<T: Record, W: Write>(
    writer: &mut W,
    record: &T,
    index: usize,
) -> BinaryResult<()> {
    if !record.is_associated() {
        return Err(BinaryError::invalid_object(format!(
            "{} {} is not associated",
            T::KIND,
            index
        )));
    }

    let mut header = Vec::with_capacity(T::DIMENSION_NAMES.len());
    for (name, value) in T::DIMENSION_NAMES.iter().zip(record.dimensions()) {
        let value = i32::try_from(value).map_err(|_| {
            BinaryError::invalid_object(format!(
                "{} {} dimension {} = {} does not fit the header",
                T::KIND,
                index,
                name,
                value
            ))
        })?;
        header.push(value);
    }

    for value in header {
        write_i32(writer, value).map_err(|e| {
            BinaryError::write_failed(format!("Failed to write {} {} header", T::KIND, index), e)
        })?;
    }

    record.encode_payload(writer).map_err(|e| {
        BinaryError::write_failed(format!("Failed to write {} {} payload", T::KIND, index), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{cloud_types, Atmosphere, Cloud};
    use std::io::Cursor;

    fn sample_cloud(n_layers: usize) -> Cloud {
        let mut cloud = Cloud::new(n_layers).unwrap();
        cloud.cloud_type = cloud_types::WATER;
        for k in 0..n_layers {
            cloud.effective_radius[k] = 10.0 + k as f64;
            cloud.effective_variance[k] = 0.1 * k as f64;
            cloud.water_content[k] = 0.25;
        }
        cloud
    }

    #[test]
    fn test_record_roundtrip() {
        let cloud = sample_cloud(3);
        let mut buf = Vec::new();
        encode_record(&mut buf, &cloud, 1).unwrap();

        let decoded: Cloud = decode_record(&mut Cursor::new(&buf), 1).unwrap();
        assert_eq!(decoded, cloud);
    }

    #[test]
    fn test_header_precedes_payload() {
        let atm = Atmosphere::new(3, 2).unwrap();
        let mut buf = Vec::new();
        encode_record(&mut buf, &atm, 1).unwrap();

        assert_eq!(&buf[0..4], &3i32.to_le_bytes());
        assert_eq!(&buf[4..8], &2i32.to_le_bytes());
        // climatology + 2 ids + (4 + 3 + 3 + 6) reals
        assert_eq!(buf.len(), 8 + 4 + 2 * 4 + 16 * 8);
    }

    #[test]
    fn test_unassociated_record_is_not_written() {
        let mut buf = Vec::new();
        let err = encode_record(&mut buf, &Cloud::default(), 2).unwrap_err();
        assert_eq!(err.code(), BinaryErrorCode::InvalidObject);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_short_header_is_malformed() {
        let err = decode_record::<Atmosphere, _>(&mut Cursor::new(vec![1u8, 0, 0, 0, 2]), 1)
            .unwrap_err();
        assert_eq!(err.code(), BinaryErrorCode::MalformedHeader);
    }

    #[test]
    fn test_zero_dimension_fails_allocation() {
        let buf = 0i32.to_le_bytes().to_vec();
        let err = decode_record::<Cloud, _>(&mut Cursor::new(buf), 1).unwrap_err();
        assert_eq!(err.code(), BinaryErrorCode::AllocationFailed);
    }

    #[test]
    fn test_negative_dimension_fails_allocation() {
        let buf = (-4i32).to_le_bytes().to_vec();
        let err = decode_record::<Cloud, _>(&mut Cursor::new(buf), 1).unwrap_err();
        assert_eq!(err.code(), BinaryErrorCode::AllocationFailed);
    }

    #[test]
    fn test_oversized_header_rejected_before_allocation() {
        // Header claims 100 million layers; nothing follows it.
        let buf = 100_000_000i32.to_le_bytes().to_vec();
        let err = decode_record_within::<Cloud, _>(&mut Cursor::new(buf), 1, Some(4)).unwrap_err();
        assert_eq!(err.code(), BinaryErrorCode::TruncatedPayload);
        assert!(err.message().contains("2400000004 bytes"));
    }

    #[test]
    fn test_exact_budget_decodes() {
        let cloud = sample_cloud(2);
        let mut buf = Vec::new();
        encode_record(&mut buf, &cloud, 1).unwrap();

        let available = Some(buf.len() as u64);
        let decoded: Cloud = decode_record_within(&mut Cursor::new(&buf), 1, available).unwrap();
        assert_eq!(decoded, cloud);
    }

    #[test]
    fn test_zero_dimension_within_budget_fails_allocation() {
        let buf = 0i32.to_le_bytes().to_vec();
        let err = decode_record_within::<Cloud, _>(&mut Cursor::new(buf), 1, Some(4)).unwrap_err();
        assert_eq!(err.code(), BinaryErrorCode::AllocationFailed);
    }

    #[test]
    fn test_short_payload_is_truncated() {
        let mut buf = Vec::new();
        encode_record(&mut buf, &sample_cloud(4), 1).unwrap();
        buf.truncate(buf.len() - 3);

        let err = decode_record::<Cloud, _>(&mut Cursor::new(buf), 1).unwrap_err();
        assert_eq!(err.code(), BinaryErrorCode::TruncatedPayload);
    }
}
