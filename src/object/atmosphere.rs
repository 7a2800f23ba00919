//! Atmosphere profile record
//!
//! ```text
//! header:  n_layers, n_absorbers                (i32, i32)
//! payload: climatology                          (i32)
//!          absorber_id[n_absorbers]             (i32)
//!          level_pressure[n_layers + 1]         (f64)
//!          pressure[n_layers]                   (f64)
//!          temperature[n_layers]                (f64)
//!          absorber[n_layers * n_absorbers]     (f64, layer-major)
//! ```

use std::io::{self, Read, Write};

use super::{checked_dimensions, reserve_failed, zeroed, Record};
use crate::codec::primitives::{
    read_f64_array, read_i32, read_i32_array, write_f64_array, write_i32, write_i32_array,
};
use crate::errors::{BinaryError, BinaryResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atmosphere {
    n_layers: usize,
    n_absorbers: usize,
    /// Climatology model code
    pub climatology: i32,
    /// Absorber identifiers
    pub absorber_id: Vec<i32>,
    /// Level pressures, one more than the layer count (hPa)
    pub level_pressure: Vec<f64>,
    /// Layer pressures (hPa)
    pub pressure: Vec<f64>,
    /// Layer temperatures (K)
    pub temperature: Vec<f64>,
    /// Absorber amounts, `n_absorbers` values per layer
    pub absorber: Vec<f64>,
}

impl Atmosphere {
    pub fn new(n_layers: usize, n_absorbers: usize) -> BinaryResult<Self> {
        Self::create(&[n_layers, n_absorbers])
    }

    pub fn n_layers(&self) -> usize {
        self.n_layers
    }

    pub fn n_absorbers(&self) -> usize {
        self.n_absorbers
    }

    /// Absorber amounts for one layer
    pub fn layer_absorbers(&self, layer: usize) -> Option<&[f64]> {
        let start = layer.checked_mul(self.n_absorbers)?;
        self.absorber.get(start..start + self.n_absorbers)
    }
}

impl Record for Atmosphere {
    const KIND: &'static str = "atmosphere";
    const DIMENSION_NAMES: &'static [&'static str] = &["n_layers", "n_absorbers"];

    fn create(dimensions: &[usize]) -> BinaryResult<Self> {
        let [n_layers, n_absorbers] = checked_dimensions::<Self, 2>(dimensions)?;

        let n_levels = n_layers.checked_add(1).ok_or_else(|| {
            BinaryError::allocation_failed(format!("n_layers {} overflows", n_layers))
        })?;
        let n_amounts = n_layers.checked_mul(n_absorbers).ok_or_else(|| {
            BinaryError::allocation_failed(format!(
                "absorber array {} x {} overflows",
                n_layers, n_absorbers
            ))
        })?;

        let kind = Self::KIND;
        Ok(Self {
            n_layers,
            n_absorbers,
            climatology: 0,
            absorber_id: zeroed(n_absorbers).map_err(|e| reserve_failed(kind, "absorber_id", e))?,
            level_pressure: zeroed(n_levels)
                .map_err(|e| reserve_failed(kind, "level_pressure", e))?,
            pressure: zeroed(n_layers).map_err(|e| reserve_failed(kind, "pressure", e))?,
            temperature: zeroed(n_layers).map_err(|e| reserve_failed(kind, "temperature", e))?,
            absorber: zeroed(n_amounts).map_err(|e| reserve_failed(kind, "absorber", e))?,
        })
    }

    fn destroy(&mut self) {
        *self = Self::default();
    }

    fn is_associated(&self) -> bool {
        self.n_layers >= 1
            && self.n_absorbers >= 1
            && self.absorber_id.len() == self.n_absorbers
            && self.level_pressure.len() == self.n_layers + 1
            && self.pressure.len() == self.n_layers
            && self.temperature.len() == self.n_layers
            && Some(self.absorber.len()) == self.n_layers.checked_mul(self.n_absorbers)
    }

    fn dimensions(&self) -> Vec<usize> {
        vec![self.n_layers, self.n_absorbers]
    }

    fn payload_len(dimensions: &[usize]) -> Option<u64> {
        let [n_layers, n_absorbers] = dimensions else {
            return None;
        };
        let n_layers = u64::try_from(*n_layers).ok()?;
        let n_absorbers = u64::try_from(*n_absorbers).ok()?;

        // level_pressure, pressure, temperature, absorber
        let reals = n_layers
            .checked_mul(3)?
            .checked_add(1)?
            .checked_add(n_layers.checked_mul(n_absorbers)?)?;
        let ints = n_absorbers.checked_add(1)?;
        ints.checked_mul(4)?.checked_add(reals.checked_mul(8)?)
    }

    fn encode_payload<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_i32(writer, self.climatology)?;
        write_i32_array(writer, &self.absorber_id)?;
        write_f64_array(writer, &self.level_pressure)?;
        write_f64_array(writer, &self.pressure)?;
        write_f64_array(writer, &self.temperature)?;
        write_f64_array(writer, &self.absorber)
    }

    fn decode_payload<R: Read>(&mut self, reader: &mut R) -> io::Result<()> {
        self.climatology = read_i32(reader)?;
        read_i32_array(reader, &mut self.absorber_id)?;
        read_f64_array(reader, &mut self.level_pressure)?;
        read_f64_array(reader, &mut self.pressure)?;
        read_f64_array(reader, &mut self.temperature)?;
        read_f64_array(reader, &mut self.absorber)
    }
}
