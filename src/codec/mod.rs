//! Binary codec for profile records and collections
//!
//! - `primitives`: fixed-width little-endian scalars and arrays
//! - `record`: one record, dimension header then payload
//! - `collection`: count header then records, optionally signed
//! - `checksum`: CRC32 streams for signed files

mod checksum;
mod collection;
pub(crate) mod primitives;
mod record;

pub use checksum::{compute_checksum, ChecksumReader, ChecksumWriter};
pub use collection::{
    decode_collection, decode_collection_within, encode_collection, inquire_count,
    CollectionHeader, Layout, FILE_MAGIC, FORMAT_VERSION,
};
pub use record::{decode_record, decode_record_within, encode_record};
