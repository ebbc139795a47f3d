use serde::Serialize;

/// Mapping between point indices and calibrated axis units
///
/// Index 0 is the left-most point, at the highest chemical shift; positions
/// decrease as the index grows.
pub trait AxisCalibration {
    /// Number of points along the axis
    fn size(&self) -> usize;

    /// Axis width of one point
    fn ppm_per_point(&self) -> f64;

    /// Position of (possibly fractional) index `index`
    fn itop(&self, index: f64) -> f64;

    /// Fractional index of position `ppm`
    fn ptoi(&self, ppm: f64) -> f64;

    /// Zoom covering the whole axis with half a bucket of margin on each side
    fn full_zoom(&self, bucket_size: f64) -> (f64, f64) {
        (
            self.itop(self.size() as f64) + bucket_size / 2.0,
            self.itop(0.0) - bucket_size / 2.0,
        )
    }
}

/// Linear chemical-shift axis of a processed spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NmrAxis {
    /// Number of real points (`SI`)
    pub size: usize,
    /// Position of point 0 in ppm (`OFFSET`)
    pub left_ppm: f64,
    /// Width of one point in ppm (`SW_p / SF / SI`)
    pub ppm_per_point: f64,
}

impl NmrAxis {
    /// Axis of `size` points starting at `offset_ppm`, spectral width `sw_hz` at
    /// spectrometer frequency `sf_mhz`
    pub fn new(size: usize, offset_ppm: f64, sw_hz: f64, sf_mhz: f64) -> Self {
        Self {
            size,
            left_ppm: offset_ppm,
            ppm_per_point: sw_hz / sf_mhz / size as f64,
        }
    }

    /// Position of the last point
    pub fn right_ppm(&self) -> f64 {
        self.itop(self.size as f64)
    }
}

impl AxisCalibration for NmrAxis {
    fn size(&self) -> usize {
        self.size
    }

    fn ppm_per_point(&self) -> f64 {
        self.ppm_per_point
    }

    fn itop(&self, index: f64) -> f64 {
        self.left_ppm - index * self.ppm_per_point
    }

    fn ptoi(&self, ppm: f64) -> f64 {
        (self.left_ppm - ppm) / self.ppm_per_point
    }
}
