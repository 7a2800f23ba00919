//! Cloud profile record
//!
//! ```text
//! header:  n_layers                       (i32)
//! payload: cloud_type                     (i32)
//!          effective_radius[n_layers]     (f64)
//!          effective_variance[n_layers]   (f64)
//!          water_content[n_layers]        (f64)
//! ```

use std::io::{self, Read, Write};

use super::{checked_dimensions, reserve_failed, zeroed, Record};
use crate::codec::primitives::{read_f64_array, read_i32, write_f64_array, write_i32};
use crate::errors::BinaryResult;

/// Cloud classification codes
pub mod cloud_types {
    pub const INVALID: i32 = 0;
    pub const WATER: i32 = 1;
    pub const ICE: i32 = 2;
    pub const RAIN: i32 = 3;
    pub const SNOW: i32 = 4;
    pub const GRAUPEL: i32 = 5;
    pub const HAIL: i32 = 6;
}

/// One cloud over a layered column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cloud {
    n_layers: usize,
    /// Classification code, see [`cloud_types`]
    pub cloud_type: i32,
    /// Effective radius per layer (microns)
    pub effective_radius: Vec<f64>,
    /// Effective variance per layer
    pub effective_variance: Vec<f64>,
    /// Water content per layer (kg/m^2)
    pub water_content: Vec<f64>,
}

impl Cloud {
    /// Allocate a zero-filled cloud with `n_layers` layers
    pub fn new(n_layers: usize) -> BinaryResult<Self> {
        Self::create(&[n_layers])
    }

    pub fn n_layers(&self) -> usize {
        self.n_layers
    }

    /// Zero every array and the type code, keeping the allocation
    pub fn zero(&mut self) {
        self.cloud_type = cloud_types::INVALID;
        self.effective_radius.fill(0.0);
        self.effective_variance.fill(0.0);
        self.water_content.fill(0.0);
    }
}

impl Record for Cloud {
    const KIND: &'static str = "cloud";
    const DIMENSION_NAMES: &'static [&'static str] = &["n_layers"];

    fn create(dimensions: &[usize]) -> BinaryResult<Self> {
        let [n_layers] = checked_dimensions::<Self, 1>(dimensions)?;

        let effective_radius =
            zeroed(n_layers).map_err(|e| reserve_failed(Self::KIND, "effective_radius", e))?;
        let effective_variance =
            zeroed(n_layers).map_err(|e| reserve_failed(Self::KIND, "effective_variance", e))?;
        let water_content =
            zeroed(n_layers).map_err(|e| reserve_failed(Self::KIND, "water_content", e))?;

        Ok(Self {
            n_layers,
            cloud_type: cloud_types::INVALID,
            effective_radius,
            effective_variance,
            water_content,
        })
    }

    fn destroy(&mut self) {
        *self = Self::default();
    }

    fn is_associated(&self) -> bool {
        self.n_layers >= 1
            && self.effective_radius.len() == self.n_layers
            && self.effective_variance.len() == self.n_layers
            && self.water_content.len() == self.n_layers
    }

    fn dimensions(&self) -> Vec<usize> {
        vec![self.n_layers]
    }

    fn payload_len(dimensions: &[usize]) -> Option<u64> {
        let [n_layers] = dimensions else {
            return None;
        };
        let reals = u64::try_from(*n_layers).ok()?.checked_mul(3)?;
        reals.checked_mul(8)?.checked_add(4)
    }

    fn encode_payload<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_i32(writer, self.cloud_type)?;
        write_f64_array(writer, &self.effective_radius)?;
        write_f64_array(writer, &self.effective_variance)?;
        write_f64_array(writer, &self.water_content)
    }

    fn decode_payload<R: Read>(&mut self, reader: &mut R) -> io::Result<()> {
        self.cloud_type = read_i32(reader)?;
        read_f64_array(reader, &mut self.effective_radius)?;
        read_f64_array(reader, &mut self.effective_variance)?;
        read_f64_array(reader, &mut self.water_content)
    }
}
