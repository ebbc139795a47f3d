//! # Processed Spectra
//!
//! Reads the real part of a processed spectrum from `<experiment>/pdata/<procno>/`
//! together with its axis calibration. No processing is performed here; Fourier
//! transform, phasing and baseline correction happen upstream.
//!
//! | File     | Content                                   |
//! |----------|-------------------------------------------|
//! | `procs`  | F2 (direct) processing parameters         |
//! | `proc2s` | F1 (indirect) processing parameters (2-D) |
//! | `1r`     | real 1-D spectrum                         |
//! | `2rr`    | real 2-D spectrum, sub-matrix ordered     |

mod binary;
mod error;


use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use ndarray::Array2;

use crate::bucket::NmrAxis;
use crate::nucleus::Nucleus;
use crate::params::{ParameterSet, KEY_NAMESPACE};

pub use binary::{untile, BinaryLayout, DataType, Endianness};
pub use error::SpectrumError;

/// Processing parameters of the direct dimension
pub const PROCS_FILE: &str = "procs";

/// Processing parameters of the indirect dimension
pub const PROC2S_FILE: &str = "proc2s";

/// Real 1-D data
pub const REAL_1D_FILE: &str = "1r";

/// Real 2-D data
pub const REAL_2D_FILE: &str = "2rr";

/// Calibrated axis and nucleus of one processed dimension
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedAxis {
    /// Point to ppm mapping
    pub axis: NmrAxis,
    /// Declared nucleus (`AXNUC`), if recognised
    pub nucleus: Option<Nucleus>,
    /// Sub-matrix edge (`XDIM`), 0 when absent
    pub xdim: usize,
    /// All processing parameters
    pub params: ParameterSet,
}

impl ProcessedAxis {
    /// Read the calibration from a processing parameter file
    pub fn from_file(path: &Path) -> Result<Self, SpectrumError> {
        let params = ParameterSet::from_file(path).map_err(|source| SpectrumError::Param {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_params(params, path)
    }

    /// Build the calibration from parsed parameters; `path` is used in errors
    pub fn from_params(params: ParameterSet, path: &Path) -> Result<Self, SpectrumError> {
        let size = required(&params, path, "SI")?;
        if size < 1.0 {
            return Err(missing(path, "SI"));
        }
        let axis = NmrAxis::new(
            size as usize,
            required(&params, path, "OFFSET")?,
            required(&params, path, "SW_p")?,
            required(&params, path, "SF")?,
        );
        Ok(Self {
            axis,
            nucleus: Nucleus::from_processing(&params),
            xdim: params.number("XDIM").map_or(0, |x| x.max(0.0) as usize),
            params,
        })
    }

    /// Binary layout declared by this dimension
    pub fn layout(&self, path: &Path) -> Result<BinaryLayout, SpectrumError> {
        let dtypp = self.params.number("DTYPP").unwrap_or(0.0) as i64;
        let layout = BinaryLayout {
            data_type: DataType::from_dtypp(dtypp)?,
            endianness: Endianness::from_bytordp(
                self.params.number("BYTORDP").unwrap_or(0.0) as i64,
            ),
            exponent: self.params.number("NC_proc").map_or(0, |nc| nc as i32),
        };
        debug!("{}: {:?}", path.display(), layout);
        Ok(layout)
    }
}

/// A processed 1-D spectrum
#[derive(Debug, Clone)]
pub struct Spectrum1D {
    /// Calibration of the only axis
    pub axis: ProcessedAxis,
    /// Intensities, index 0 at the highest ppm
    pub data: Vec<f64>,
}

impl Spectrum1D {
    /// Read `procs` and `1r` from a processed data directory
    pub fn read(pdata_dir: &Path) -> Result<Self, SpectrumError> {
        let procs = pdata_dir.join(PROCS_FILE);
        let axis = ProcessedAxis::from_file(&procs)?;
        let layout = axis.layout(&procs)?;
        let bytes = fs::read(pdata_dir.join(REAL_1D_FILE))?;
        let data = layout.decode(&bytes, axis.axis.size)?;
        Ok(Self { axis, data })
    }
}

/// A processed 2-D spectrum stored as an F1 × F2 matrix
#[derive(Debug, Clone)]
pub struct Spectrum2D {
    /// Indirect dimension (rows)
    pub f1: ProcessedAxis,
    /// Direct dimension (columns)
    pub f2: ProcessedAxis,
    /// Intensities
    pub data: Array2<f64>,
}

impl Spectrum2D {
    /// Read `procs`, `proc2s` and `2rr` from a processed data directory
    pub fn read(pdata_dir: &Path) -> Result<Self, SpectrumError> {
        let procs = pdata_dir.join(PROCS_FILE);
        let f2 = ProcessedAxis::from_file(&procs)?;
        let f1 = ProcessedAxis::from_file(&pdata_dir.join(PROC2S_FILE))?;
        let layout = f2.layout(&procs)?;

        let shape = (f1.axis.size, f2.axis.size);
        let points = shape.0.checked_mul(shape.1).ok_or(SpectrumError::Shape {
            rows: shape.0,
            cols: shape.1,
        })?;
        let bytes = fs::read(pdata_dir.join(REAL_2D_FILE))?;
        let values = layout.decode(&bytes, points)?;
        let data = untile(values, shape, (f1.xdim, f2.xdim))?;
        Ok(Self { f1, f2, data })
    }
}

/// Either kind of processed spectrum
#[derive(Debug, Clone)]
pub enum ProcessedSpectrum {
    /// `1r` was found
    OneD(Spectrum1D),
    /// `2rr` was found
    TwoD(Spectrum2D),
}

impl ProcessedSpectrum {
    /// Read whatever processed data `pdata_dir` holds, preferring 2-D
    pub fn read(pdata_dir: &Path) -> Result<Self, SpectrumError> {
        if pdata_dir.join(REAL_2D_FILE).is_file() {
            Spectrum2D::read(pdata_dir).map(ProcessedSpectrum::TwoD)
        } else if pdata_dir.join(REAL_1D_FILE).is_file() {
            Spectrum1D::read(pdata_dir).map(ProcessedSpectrum::OneD)
        } else {
            Err(SpectrumError::NotFound(pdata_dir.to_path_buf()))
        }
    }
}

fn missing(path: &Path, name: &str) -> SpectrumError {
    SpectrumError::MissingParameter {
        path: PathBuf::from(path),
        key: format!("{}{}", KEY_NAMESPACE, name),
    }
}

fn required(params: &ParameterSet, path: &Path, name: &str) -> Result<f64, SpectrumError> {
    params
        .number(name)
        .filter(|v| v.is_finite())
        .ok_or_else(|| missing(path, name))
}
