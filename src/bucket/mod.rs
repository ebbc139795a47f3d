//! # Bucket Integration
//!
//! Partitions a calibrated spectrum into fixed-width windows ("buckets") and
//! reports one row of statistics per window.
//!
//! Windows are laid out from the smaller zoom bound to the larger one. Window `k`
//! is centred on `low + k·size` and spans `[low - size/2 + k·size, low + size/2 + k·size)`;
//! both edges are converted to point indices independently, so neighbouring windows
//! share their boundary index and rounding never accumulates.
//!
//! ```text
//!   ppm  low-size/2   low+size/2   low+3size/2
//!         |     k=0     |    k=1     |   ...
//!   idx  ih0         inext0=ih1    inext1
//! ```
//!
//! The integral of a window is its sum divided by `points × size` (in 2-D the
//! product over both axes), so buckets whose point count differs by one after
//! rounding remain comparable.

mod axis;
mod config;
mod error;
mod stats;
mod writer;


use log::debug;
use ndarray::{s, ArrayView2};
use serde::Serialize;

pub use axis::{AxisCalibration, NmrAxis};
pub use config::{BucketConfig, NucleusBuckets};
pub use error::{BucketError, ValidationReason};
pub use stats::{Moments, WindowStats};
pub use writer::{write_table, write_table_file, BucketTable};

/// Minimum number of bucket widths in a 1-D zoom range
pub const MIN_BUCKETS_1D: f64 = 10.0;

/// Minimum number of bucket widths per axis in a 2-D zoom range
pub const MIN_BUCKETS_2D: f64 = 4.0;

/// Tolerance on zoom bounds, in axis units
const EDGE_TOLERANCE: f64 = 1e-9;

/// Options shared by 1-D and 2-D bucketing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketOptions {
    /// Compute skewness and kurtosis per bucket
    pub moments: bool,
}

/// One window of a 1-D spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket1D {
    /// Window centre
    pub center: f64,
    /// Sum normalised by the window width, NaN when empty
    pub integral: f64,
    /// Sample statistics
    pub stats: WindowStats,
}

/// One rectangular window of a 2-D spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket2D {
    /// Window centre along F1
    pub center1: f64,
    /// Window centre along F2
    pub center2: f64,
    /// Sum normalised by the window area, NaN when empty
    pub integral: f64,
    /// Points covered along F1
    pub points1: usize,
    /// Points covered along F2
    pub points2: usize,
    /// Sample statistics
    pub stats: WindowStats,
}

/// Buckets of a 1-D spectrum in scanning order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketList1D {
    /// Ordered zoom range
    pub zoom: (f64, f64),
    /// Bucket width
    pub size: f64,
    /// Axis resolution
    pub ppm_per_point: f64,
    /// Whether buckets carry moments
    pub moments: bool,
    /// Windows from low to high
    pub buckets: Vec<Bucket1D>,
}

impl BucketList1D {
    /// Number of buckets the zoom range nominally holds
    pub fn nominal_count(&self) -> usize {
        nominal_count(self.zoom, self.size)
    }

    /// Average number of points per bucket
    pub fn mean_points(&self) -> f64 {
        self.size / self.ppm_per_point
    }
}

/// Buckets of a 2-D spectrum, F1 outer, F2 inner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketList2D {
    /// Ordered zoom ranges (F1, F2)
    pub zoom: ((f64, f64), (f64, f64)),
    /// Bucket widths (F1, F2)
    pub size: (f64, f64),
    /// Axis resolutions (F1, F2)
    pub ppm_per_point: (f64, f64),
    /// Whether buckets carry moments
    pub moments: bool,
    /// Cells in row-major order
    pub buckets: Vec<Bucket2D>,
}

impl BucketList2D {
    /// Number of cells the zoom ranges nominally hold
    pub fn nominal_count(&self) -> usize {
        nominal_count(self.zoom.0, self.size.0) * nominal_count(self.zoom.1, self.size.1)
    }

    /// Average number of points per cell along each axis
    pub fn mean_points(&self) -> (f64, f64) {
        (
            self.size.0 / self.ppm_per_point.0,
            self.size.1 / self.ppm_per_point.1,
        )
    }
}

/// Bucket a 1-D spectrum
///
/// `zoom` may be given in either order. Fails if the size is not positive, if the
/// zoom range plus half a bucket leaves the axis, if it holds fewer than
/// [`MIN_BUCKETS_1D`] buckets, or if buckets would be narrower than two points.
pub fn bucket1d<A: AxisCalibration>(
    samples: &[f64],
    axis: &A,
    zoom: (f64, f64),
    size: f64,
    options: BucketOptions,
) -> Result<BucketList1D, BucketError> {
    check_shape(1, axis, samples.len())?;
    let zoom = ordered(zoom);
    validate(1, axis, zoom, size, MIN_BUCKETS_1D)?;

    let buckets: Vec<Bucket1D> = tile(axis, zoom, size)
        .into_iter()
        .map(|w| {
            let stats =
                WindowStats::compute(samples[w.start..w.stop].iter().copied(), options.moments);
            Bucket1D {
                center: w.center,
                integral: normalise(stats.sum, &[(stats.count, size)]),
                stats,
            }
        })
        .collect();

    debug!(
        "{} buckets of {} between {} and {}",
        buckets.len(),
        size,
        zoom.0,
        zoom.1
    );
    Ok(BucketList1D {
        zoom,
        size,
        ppm_per_point: axis.ppm_per_point(),
        moments: options.moments,
        buckets,
    })
}

/// Bucket a 2-D spectrum stored as an F1 × F2 matrix
///
/// Each axis is validated like [`bucket1d`] with a minimum of [`MIN_BUCKETS_2D`]
/// buckets; cells are the Cartesian product of both tilings.
pub fn bucket2d<A1: AxisCalibration, A2: AxisCalibration>(
    samples: ArrayView2<'_, f64>,
    axes: (&A1, &A2),
    zoom: ((f64, f64), (f64, f64)),
    size: (f64, f64),
    options: BucketOptions,
) -> Result<BucketList2D, BucketError> {
    let (rows, cols) = samples.dim();
    check_shape(1, axes.0, rows)?;
    check_shape(2, axes.1, cols)?;
    let zoom = (ordered(zoom.0), ordered(zoom.1));
    validate(1, axes.0, zoom.0, size.0, MIN_BUCKETS_2D)?;
    validate(2, axes.1, zoom.1, size.1, MIN_BUCKETS_2D)?;

    let tiles1 = tile(axes.0, zoom.0, size.0);
    let tiles2 = tile(axes.1, zoom.1, size.1);
    let mut buckets = Vec::with_capacity(tiles1.len() * tiles2.len());
    for w1 in &tiles1 {
        for w2 in &tiles2 {
            let cell = samples.slice(s![w1.start..w1.stop, w2.start..w2.stop]);
            let stats = WindowStats::compute(cell.iter().copied(), options.moments);
            let (points1, points2) = (w1.stop - w1.start, w2.stop - w2.start);
            buckets.push(Bucket2D {
                center1: w1.center,
                center2: w2.center,
                integral: normalise(stats.sum, &[(points1, size.0), (points2, size.1)]),
                points1,
                points2,
                stats,
            });
        }
    }

    debug!("{} x {} rectangular buckets", tiles1.len(), tiles2.len());
    Ok(BucketList2D {
        zoom,
        size,
        ppm_per_point: (axes.0.ppm_per_point(), axes.1.ppm_per_point()),
        moments: options.moments,
        buckets,
    })
}

/// Half-open index range `[start, stop)` of one window
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    center: f64,
    start: usize,
    stop: usize,
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn nominal_count((low, high): (f64, f64), size: f64) -> usize {
    ((high - low + size) / size).round() as usize
}

fn check_shape<A: AxisCalibration>(axis_no: usize, axis: &A, found: usize) -> Result<(), BucketError> {
    if axis.size() == found {
        Ok(())
    } else {
        Err(BucketError::ShapeMismatch {
            axis: axis_no,
            expected: axis.size(),
            found,
        })
    }
}

fn validate<A: AxisCalibration>(
    axis_no: usize,
    axis: &A,
    (low, high): (f64, f64),
    size: f64,
    min_buckets: f64,
) -> Result<(), BucketError> {
    let fail = |reason: ValidationReason| -> Result<(), BucketError> {
        Err(BucketError::Validation {
            axis: axis_no,
            reason,
        })
    };
    if !(size > 0.0 && size.is_finite()) {
        return fail(ValidationReason::NonPositiveSize);
    }
    if low - size / 2.0 < axis.itop(axis.size() as f64) - EDGE_TOLERANCE {
        return fail(ValidationReason::StartOutsideSpectrum);
    }
    if high + size / 2.0 > axis.itop(0.0) + EDGE_TOLERANCE {
        return fail(ValidationReason::EndOutsideSpectrum);
    }
    if (high - low) / size < min_buckets {
        return fail(ValidationReason::ZoneTooSmall);
    }
    if size < 2.0 * axis.ppm_per_point() {
        return fail(ValidationReason::BelowDigitalResolution);
    }
    Ok(())
}

fn tile<A: AxisCalibration>(axis: &A, (low, high): (f64, f64), size: f64) -> Vec<Window> {
    let len = axis.size() as i64;
    let edge = |k: u64| low - size / 2.0 + k as f64 * size;

    let mut windows = Vec::new();
    let mut k = 0u64;
    while edge(k) < high {
        // ptoi decreases with ppm: the low-ppm edge has the larger index.
        // Half indices round to even.
        let ih = axis.ptoi(edge(k)).round_ties_even() as i64;
        let inext = axis.ptoi(edge(k + 1)).round_ties_even() as i64;
        if ih < 0 || inext < 0 {
            break;
        }
        let stop = ih.min(len);
        let start = inext.min(stop);
        windows.push(Window {
            center: low + k as f64 * size,
            start: start as usize,
            stop: stop as usize,
        });
        k += 1;
    }
    windows
}

fn normalise(sum: f64, extents: &[(usize, f64)]) -> f64 {
    let area: f64 = extents.iter().map(|&(n, size)| n as f64 * size).product();
    if area > 0.0 {
        sum / area
    } else {
        f64::NAN
    }
}
