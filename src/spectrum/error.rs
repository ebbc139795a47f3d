use std::path::PathBuf;

use crate::params::ParamError;

/// Errors that can occur while reading processed spectra
#[derive(Debug, thiserror::Error)]
pub enum SpectrumError {
    /// I/O error reading data or parameter files
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed processing parameter file
    #[error("Cannot parse {}: {source}", path.display())]
    Param {
        /// Offending file
        path: PathBuf,
        /// Parse failure
        #[source]
        source: ParamError,
    },

    /// No processed data in the directory
    #[error("No processed spectrum in {}", .0.display())]
    NotFound(PathBuf),

    /// A required processing parameter is absent or not numeric
    #[error("Missing or invalid processing parameter {key} in {}", path.display())]
    MissingParameter {
        /// Parameter file
        path: PathBuf,
        /// Namespaced key
        key: String,
    },

    /// `DTYPP` value not handled
    #[error("Unsupported data type DTYPP={0}")]
    UnsupportedDataType(i64),

    /// Byte length disagrees with the declared sizes
    #[error("Data length mismatch: expected {expected} values, found {found}")]
    Length {
        /// Values implied by `SI`
        expected: usize,
        /// Values present in the file
        found: usize,
    },

    /// `SI` is not a multiple of the sub-matrix size `XDIM`
    #[error("Size {size} is not a multiple of XDIM {xdim}")]
    Tiling {
        /// Points along the axis
        size: usize,
        /// Sub-matrix edge
        xdim: usize,
    },

    /// The declared matrix does not fit in memory
    #[error("Matrix of {rows} x {cols} points is too large")]
    Shape {
        /// Points along F1
        rows: usize,
        /// Points along F2
        cols: usize,
    },
}
