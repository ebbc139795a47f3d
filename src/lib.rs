//! # nmrscan - Catalog, Report and Bucket Bruker NMR Experiments
//!
//! `nmrscan` walks a directory of spectrometer experiments, extracts their acquisition
//! parameters and operator annotations into a master CSV report, and summarises
//! processed spectra as fixed-width bucket tables for statistical analysis.
//!
//! ## Key Features
//!
//! - **Parameter files**: JCAMP-style `acqus`/`procs` files decoded into a typed
//!   key/value store, including multi-line arrays (`##$D= (0..63)`).
//!
//! - **Addressable columns**: report columns such as `D20` or `P1` resolve to an
//!   element of an array parameter; 2-D columns read the indirect dimension first.
//!
//! - **Title annotations**: product, concentration, solvent, temperature and
//!   reference code pulled out of free-text title files, never failing.
//!
//! - **Bucket integration**: 1-D and 2-D spectra partitioned into windows with
//!   area-normalised integrals and per-window statistics.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nmrscan::catalog::ExperimentCatalog;
//! use nmrscan::report::ReportBuilder;
//!
//! let catalog = ExperimentCatalog::scan("/data/run42")?;
//! let stats = ReportBuilder::default()
//!     .with_title(true)
//!     .write_to(&catalog, "/data/run42/report.csv")?;
//! println!("{}", stats);
//! # Ok::<(), nmrscan::report::ReportError>(())
//! ```
//!
//! Bucketing a processed spectrum:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use nmrscan::bucket::{bucket1d, write_table_file, BucketOptions};
//! use nmrscan::spectrum::Spectrum1D;
//!
//! let spectrum = Spectrum1D::read(Path::new("/data/run42/PFDA/1/pdata/1"))?;
//! let buckets = bucket1d(
//!     &spectrum.data,
//!     &spectrum.axis.axis,
//!     (0.5, 9.5),
//!     0.01,
//!     BucketOptions::default(),
//! )?;
//! write_table_file(&buckets, Path::new("1_bucketlist.csv"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`params`]: parameter-file parser and column resolver
//! - [`title`]: title annotation parser
//! - [`catalog`]: directory walk and experiment classification
//! - [`report`]: master report and analysis summary
//! - [`spectrum`]: processed-data reader (`1r`, `2rr`)
//! - [`bucket`]: bucket integration engine and table export
//! - [`peaks`]: peak-list export
//! - [`nucleus`]: observed-nucleus detection

#![deny(missing_docs)]

pub mod bucket;
pub mod catalog;
pub mod nucleus;
pub mod params;
pub mod peaks;
pub mod report;
pub mod spectrum;
pub mod title;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bucket::{
        bucket1d, bucket2d, AxisCalibration, BucketError, BucketList1D, BucketList2D,
        BucketOptions, NmrAxis,
    };
    pub use crate::catalog::{ExperimentCatalog, ExperimentDescriptor};
    pub use crate::nucleus::Nucleus;
    pub use crate::params::{ParamResolver, ParameterSet};
    pub use crate::report::{ReportBuilder, ReportColumns};
    pub use crate::spectrum::{ProcessedSpectrum, Spectrum1D, Spectrum2D};
    pub use crate::title::TitleAnnotation;
}
