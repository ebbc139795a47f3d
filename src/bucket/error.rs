use std::fmt;

/// Why a bucket request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// Bucket size is zero, negative or not finite
    NonPositiveSize,
    /// Zoom start minus half a bucket lies beyond the last point
    StartOutsideSpectrum,
    /// Zoom end plus half a bucket lies beyond the first point
    EndOutsideSpectrum,
    /// Fewer bucket widths in the zoom range than required
    ZoneTooSmall,
    /// Bucket narrower than two points
    BelowDigitalResolution,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ValidationReason::NonPositiveSize => "negative bucket size not allowed",
            ValidationReason::StartOutsideSpectrum => "starting point outside spectrum",
            ValidationReason::EndOutsideSpectrum => "ending point outside spectrum",
            ValidationReason::ZoneTooSmall => "integration zone too small or bucket too large",
            ValidationReason::BelowDigitalResolution => {
                "bucket size smaller than digital resolution"
            }
        };
        f.write_str(msg)
    }
}

/// Errors that can occur while bucketing a spectrum
#[derive(Debug, thiserror::Error)]
pub enum BucketError {
    /// The requested zoom or bucket size is not usable on this axis
    #[error("Invalid bucketing on axis {axis}: {reason}")]
    Validation {
        /// 1-based axis number (F1 = 1)
        axis: usize,
        /// Rejection reason
        reason: ValidationReason,
    },

    /// Sample count differs from the axis calibration
    #[error("Axis {axis} has {expected} points but data has {found}")]
    ShapeMismatch {
        /// 1-based axis number
        axis: usize,
        /// Points declared by the calibration
        expected: usize,
        /// Points present in the data
        found: usize,
    },

    /// I/O error writing a bucket table
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl BucketError {
    /// Validation reason, if this is a validation failure
    pub fn reason(&self) -> Option<ValidationReason> {
        match self {
            BucketError::Validation { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
