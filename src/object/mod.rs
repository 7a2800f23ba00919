//! In-memory profile records
//!
//! A record is a set of dimension scalars plus numeric arrays whose lengths
//! follow from those dimensions. A record is *associated* when every array
//! is allocated consistently with its dimensions; only associated records
//! may be serialized.
//!
//! # Lifecycle
//!
//! - `Default` yields an unassociated record
//! - `create` allocates every array at once or fails leaving nothing behind
//! - `destroy` releases the arrays and zeroes the dimensions (idempotent)
//! - storage is released automatically when the record is dropped

mod atmosphere;
mod cloud;

use std::collections::TryReserveError;
use std::io::{Read, Write};

use crate::errors::{BinaryError, BinaryResult};

pub use atmosphere::Atmosphere;
pub use cloud::{cloud_types, Cloud};

/// Contract between a record type and the binary codec.
///
/// The header on disk holds the values of `DIMENSION_NAMES`, in that order.
/// The payload that follows is whatever `encode_payload` writes; its length
/// must be derivable from the dimensions alone.
pub trait Record: Default {
    /// Short lowercase name used in messages and diagnostics
    const KIND: &'static str;

    /// Header fields, in canonical order
    const DIMENSION_NAMES: &'static [&'static str];

    /// Allocate a record with the given dimensions.
    ///
    /// Fails with `AllocationFailed` if the dimension count is wrong, any
    /// dimension is below 1, or the arrays cannot be reserved.
    fn create(dimensions: &[usize]) -> BinaryResult<Self>;

    /// Release all arrays and zero the dimensions. Never fails.
    fn destroy(&mut self);

    /// True iff every array is allocated and consistent with the dimensions
    fn is_associated(&self) -> bool;

    /// Current dimension values, in `DIMENSION_NAMES` order
    fn dimensions(&self) -> Vec<usize>;

    /// Encoded payload size for `dimensions`, or `None` if it overflows.
    ///
    /// Must agree with what `encode_payload` writes. Readers use it to
    /// reject a header before allocating for it.
    fn payload_len(dimensions: &[usize]) -> Option<u64>;

    /// Smallest encoded record: header plus payload with every dimension 1
    fn min_encoded_len() -> u64 {
        let rank = Self::DIMENSION_NAMES.len();
        let header = 4 * rank as u64;
        header.saturating_add(Self::payload_len(&vec![1; rank]).unwrap_or(0))
    }

    /// Write the payload arrays in canonical order
    fn encode_payload<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;

    /// Fill the already-allocated arrays from `reader`
    fn decode_payload<R: Read>(&mut self, reader: &mut R) -> std::io::Result<()>;
}

/// Checks the dimension list for `R` and returns it as a fixed array.
pub(crate) fn checked_dimensions<R: Record, const N: usize>(
    dimensions: &[usize],
) -> BinaryResult<[usize; N]> {
    let dims: [usize; N] = dimensions.try_into().map_err(|_| {
        BinaryError::allocation_failed(format!(
            "{} expects {} dimensions, got {}",
            R::KIND,
            N,
            dimensions.len()
        ))
    })?;

    for (name, value) in R::DIMENSION_NAMES.iter().zip(dims.iter()) {
        if *value < 1 {
            return Err(BinaryError::allocation_failed(format!(
                "{} dimension {} must be >= 1, got {}",
                R::KIND,
                name,
                value
            )));
        }
    }

    Ok(dims)
}

/// Allocates a zero-filled array without aborting on allocation failure.
pub(crate) fn zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>, TryReserveError> {
    let mut values = Vec::new();
    values.try_reserve_exact(len)?;
    values.resize(len, T::default());
    Ok(values)
}

pub(crate) fn reserve_failed(kind: &str, array: &str, err: TryReserveError) -> BinaryError {
    BinaryError::allocation_failed(format!("Failed to allocate {} {}: {}", kind, array, err))
}
