//! CRC32 checksums for signed collection files
//!
//! Uses CRC32 (IEEE polynomial). The checksum covers every record byte,
//! not the file header or the trailer itself.

use std::io::{self, Read, Write};

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Reader that hashes every byte it hands out.
pub struct ChecksumReader<'a, R> {
    inner: &'a mut R,
    hasher: Hasher,
}

impl<'a, R: Read> ChecksumReader<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
        }
    }

    /// Checksum of everything read so far
    pub fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

impl<R: Read> Read for ChecksumReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

/// Writer that hashes every byte it accepts.
pub struct ChecksumWriter<'a, W> {
    inner: &'a mut W,
    hasher: Hasher,
}

impl<'a, W: Write> ChecksumWriter<'a, W> {
    pub fn new(inner: &'a mut W) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
        }
    }

    /// Checksum of everything written so far
    pub fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

impl<W: Write> Write for ChecksumWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_deterministic() {
        let data = b"cloud profile bytes";
        assert_eq!(compute_checksum(data), compute_checksum(data));
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let mut data = vec![0x00, 0x01, 0x02, 0x03, 0x04];
        let original = compute_checksum(&data);
        data[2] ^= 0x01;
        assert_ne!(original, compute_checksum(&data));
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let data = b"layer one, layer two, layer three";

        let mut sink = Vec::new();
        let mut writer = ChecksumWriter::new(&mut sink);
        writer.write_all(&data[..10]).unwrap();
        writer.write_all(&data[10..]).unwrap();
        assert_eq!(writer.checksum(), compute_checksum(data));

        let mut source = io::Cursor::new(&data[..]);
        let mut reader = ChecksumReader::new(&mut source);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(reader.checksum(), compute_checksum(data));
    }
}
