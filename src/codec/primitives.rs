//! Fixed-width little-endian scalars and arrays.
//!
//! Integers are `i32`, reals are `f64`. Arrays carry no length prefix; the
//! caller knows the length from the record header.

use std::io::{self, Read, Write};

pub fn write_i32<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

pub fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn write_i32_array<W: Write>(writer: &mut W, values: &[i32]) -> io::Result<()> {
    let mut buf = Vec::with_capacity(values.len() * 4);
    for value in values {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    writer.write_all(&buf)
}

pub fn read_i32_array<R: Read>(reader: &mut R, values: &mut [i32]) -> io::Result<()> {
    let mut buf = [0u8; 4];
    for value in values.iter_mut() {
        reader.read_exact(&mut buf)?;
        *value = i32::from_le_bytes(buf);
    }
    Ok(())
}

pub fn write_f64_array<W: Write>(writer: &mut W, values: &[f64]) -> io::Result<()> {
    let mut buf = Vec::with_capacity(values.len() * 8);
    for value in values {
        buf.extend_from_slice(&value.to_le_bytes());
    }
    writer.write_all(&buf)
}

pub fn read_f64_array<R: Read>(reader: &mut R, values: &mut [f64]) -> io::Result<()> {
    let mut buf = [0u8; 8];
    for value in values.iter_mut() {
        reader.read_exact(&mut buf)?;
        *value = f64::from_le_bytes(buf);
    }
    Ok(())
}
