//! Binary layout of processed data files
//!
//! `1r` and `2rr` hold raw intensities without header:
//!
//! 1. `DTYPP` selects 32-bit integers (0) or 64-bit floats (2)
//! 2. `BYTORDP` selects little (0) or big (1) endian
//! 3. integer intensities are multiplied by `2^NC_proc`
//!
//! 2-D data is written as consecutive `XDIM(F1) × XDIM(F2)` sub-matrices.

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use ndarray::Array2;

use super::SpectrumError;

/// Sample encoding (`DTYPP`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    /// 32-bit signed integers
    #[default]
    Int32,
    /// 64-bit floats
    Float64,
}

impl DataType {
    /// Map a `DTYPP` value
    pub fn from_dtypp(value: i64) -> Result<Self, SpectrumError> {
        match value {
            0 => Ok(DataType::Int32),
            2 => Ok(DataType::Float64),
            other => Err(SpectrumError::UnsupportedDataType(other)),
        }
    }

    /// Bytes per sample
    pub fn byte_size(&self) -> usize {
        match self {
            DataType::Int32 => 4,
            DataType::Float64 => 8,
        }
    }
}

/// Byte order (`BYTORDP`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Least significant byte first
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

impl Endianness {
    /// Map a `BYTORDP` value; anything but 1 is little endian
    pub fn from_bytordp(value: i64) -> Self {
        if value == 1 {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }
}

/// How to turn the bytes of a data file into intensities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinaryLayout {
    /// Sample encoding
    pub data_type: DataType,
    /// Byte order
    pub endianness: Endianness,
    /// Power-of-two scale of integer data (`NC_proc`)
    pub exponent: i32,
}

impl BinaryLayout {
    /// Decode `bytes`, which must hold exactly `expected` samples
    pub fn decode(&self, bytes: &[u8], expected: usize) -> Result<Vec<f64>, SpectrumError> {
        let size = self.data_type.byte_size();
        if bytes.len() % size != 0 || bytes.len() / size != expected {
            return Err(SpectrumError::Length {
                expected,
                found: bytes.len() / size,
            });
        }

        let mut cursor = Cursor::new(bytes);
        let mut values = Vec::with_capacity(expected);
        let scale = 2f64.powi(self.exponent);
        for _ in 0..expected {
            let value = match (self.data_type, self.endianness) {
                (DataType::Int32, Endianness::Little) => {
                    cursor.read_i32::<LittleEndian>()? as f64 * scale
                }
                (DataType::Int32, Endianness::Big) => cursor.read_i32::<BigEndian>()? as f64 * scale,
                (DataType::Float64, Endianness::Little) => cursor.read_f64::<LittleEndian>()?,
                (DataType::Float64, Endianness::Big) => cursor.read_f64::<BigEndian>()?,
            };
            values.push(value);
        }
        Ok(values)
    }
}

/// Reassemble sub-matrix ordered samples into a row-major `rows × cols` matrix
///
/// `xdim` is the sub-matrix shape `(F1, F2)`; a zero edge means no tiling on that axis.
pub fn untile(
    values: Vec<f64>,
    (rows, cols): (usize, usize),
    xdim: (usize, usize),
) -> Result<Array2<f64>, SpectrumError> {
    let tile_rows = if xdim.0 == 0 { rows } else { xdim.0 };
    let tile_cols = if xdim.1 == 0 { cols } else { xdim.1 };
    for (size, edge) in [(rows, tile_rows), (cols, tile_cols)] {
        if edge == 0 || size % edge != 0 {
            return Err(SpectrumError::Tiling { size, xdim: edge });
        }
    }
    let expected = rows
        .checked_mul(cols)
        .ok_or(SpectrumError::Shape { rows, cols })?;
    if values.len() != expected {
        return Err(SpectrumError::Length {
            expected,
            found: values.len(),
        });
    }

    let tiles_per_row = cols / tile_cols;
    let tile_len = tile_rows * tile_cols;
    let matrix = Array2::from_shape_fn((rows, cols), |(row, col)| {
        let tile = (row / tile_rows) * tiles_per_row + col / tile_cols;
        let within = (row % tile_rows) * tile_cols + col % tile_cols;
        values[tile * tile_len + within]
    });
    Ok(matrix)
}
