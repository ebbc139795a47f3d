//! # Experiment Catalog
//!
//! A data directory holds one folder per sample ("manip"), each containing numbered
//! experiment folders written by the spectrometer:
//!
//! ```text
//! DATA/
//! ├── PFDA/
//! │   ├── 1/          acqus fid pdata/1/...          -> 1D
//! │   ├── 2/          acqus acqu2s ser pdata/1/...   -> 2D
//! │   └── 3/          acqus acqu2s ser difflist      -> 2D, DOSY
//! └── PFOA/
//!     └── 1/ ...
//! ```
//!
//! [`ExperimentCatalog::scan`] walks such a tree depth-first with directory entries
//! sorted by name at every level, so the experiment order (and with it the row order
//! of reports) does not depend on the platform.

mod error;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, TimeZone};
use log::{debug, info};
use serde::Serialize;

use crate::params::{ParameterSet, ResolveError, KEY_NAMESPACE};

pub use error::CatalogError;

/// Acquisition parameters of the direct dimension; marks a directory as an experiment
pub const ACQUISITION_FILE: &str = "acqus";

/// Acquisition parameters of the indirect dimension
pub const ACQUISITION_2D_FILE: &str = "acqu2s";

/// Raw serial data of multi-dimensional acquisitions
pub const SERIAL_DATA_FILE: &str = "ser";

/// Gradient list of diffusion experiments
pub const GRADIENT_LIST_FILE: &str = "difflist";

/// Number of acquisition dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    /// Single FID
    #[serde(rename = "1D")]
    OneD,
    /// Serial acquisition with an indirect dimension
    #[serde(rename = "2D")]
    TwoD,
}

/// One spectrometer acquisition found on disk
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentDescriptor {
    /// Sample folder name (parent directory)
    pub manip: String,
    /// Experiment number (leaf directory)
    pub expno: String,
    /// Experiment directory
    pub path: PathBuf,
    /// Acquisition date, local calendar
    pub date: NaiveDate,
    /// 1D or 2D
    pub dimension: Dimension,
    /// Whether a gradient list is present
    pub is_dosy: bool,
    /// Direct-dimension acquisition parameters
    #[serde(skip)]
    pub acquisition: ParameterSet,
    /// Indirect-dimension acquisition parameters (2D only)
    #[serde(skip)]
    pub acquisition_2d: Option<ParameterSet>,
}

impl ExperimentDescriptor {
    /// Describe the experiment stored in `dir`, or `None` if `dir` holds no
    /// acquisition file
    pub fn from_dir(dir: &Path) -> Result<Option<Self>, CatalogError> {
        let files = list_dir(dir)?.files;
        if !files.contains(&OsString::from(ACQUISITION_FILE)) {
            return Ok(None);
        }
        Self::describe(dir, &files).map(Some)
    }

    fn describe(dir: &Path, files: &HashSet<OsString>) -> Result<Self, CatalogError> {
        let has = |name: &str| files.contains(&OsString::from(name));

        let acquisition = read_params(&dir.join(ACQUISITION_FILE))?;
        let (dimension, acquisition_2d) = if has(SERIAL_DATA_FILE) {
            (
                Dimension::TwoD,
                Some(read_params(&dir.join(ACQUISITION_2D_FILE))?),
            )
        } else {
            (Dimension::OneD, None)
        };
        let date = acquisition_date(dir, &acquisition)?;

        let name_of = |p: Option<&Path>| {
            p.and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        let descriptor = Self {
            manip: name_of(dir.parent()),
            expno: name_of(Some(dir)),
            path: dir.to_path_buf(),
            date,
            dimension,
            is_dosy: has(GRADIENT_LIST_FILE),
            acquisition,
            acquisition_2d,
        };
        debug!(
            "{}/{}: {} ({:?}, dosy={})",
            descriptor.manip,
            descriptor.expno,
            descriptor.date,
            descriptor.dimension,
            descriptor.is_dosy
        );
        Ok(descriptor)
    }

    /// Whether the experiment is two-dimensional
    pub fn is_2d(&self) -> bool {
        self.dimension == Dimension::TwoD
    }

    /// Short classification label: `1D`, `2D` or `DOSY`
    pub fn kind_label(&self) -> &'static str {
        match (self.dimension, self.is_dosy) {
            (_, true) => "DOSY",
            (Dimension::TwoD, false) => "2D",
            (Dimension::OneD, false) => "1D",
        }
    }

    /// Processed data directory for the given processing number
    pub fn pdata_dir(&self, procno: u32) -> PathBuf {
        self.path.join("pdata").join(procno.to_string())
    }
}

/// Experiments of a data directory in walk order
#[derive(Debug, Clone, Default)]
pub struct ExperimentCatalog {
    root: PathBuf,
    experiments: Vec<ExperimentDescriptor>,
}

impl ExperimentCatalog {
    /// Walk `root` and describe every experiment below it
    ///
    /// Any malformed parameter file aborts the scan.
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<Self, CatalogError> {
        let root = root.as_ref();
        let mut experiments = Vec::new();
        walk(root, &mut experiments)?;
        info!("Found {} experiments in {}", experiments.len(), root.display());
        Ok(Self {
            root: root.to_path_buf(),
            experiments,
        })
    }

    /// Scanned root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Experiments in walk order
    pub fn experiments(&self) -> &[ExperimentDescriptor] {
        &self.experiments
    }

    /// Iterate over experiments in walk order
    pub fn iter(&self) -> std::slice::Iter<'_, ExperimentDescriptor> {
        self.experiments.iter()
    }

    /// Number of experiments
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Whether no experiment was found
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }
}

impl<'a> IntoIterator for &'a ExperimentCatalog {
    type Item = &'a ExperimentDescriptor;
    type IntoIter = std::slice::Iter<'a, ExperimentDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.experiments.iter()
    }
}

struct DirListing {
    files: HashSet<OsString>,
    subdirs: Vec<PathBuf>,
}

fn list_dir(dir: &Path) -> Result<DirListing, CatalogError> {
    let mut entries = fs::read_dir(dir)
        .and_then(|rd| rd.collect::<Result<Vec<_>, _>>())
        .map_err(|e| CatalogError::io(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    let mut listing = DirListing {
        files: HashSet::new(),
        subdirs: Vec::new(),
    };
    for entry in entries {
        // Symlinked directories are not followed
        let file_type = entry
            .file_type()
            .map_err(|e| CatalogError::io(entry.path(), e))?;
        if file_type.is_dir() {
            listing.subdirs.push(entry.path());
        } else {
            listing.files.insert(entry.file_name());
        }
    }
    Ok(listing)
}

fn walk(dir: &Path, out: &mut Vec<ExperimentDescriptor>) -> Result<(), CatalogError> {
    let listing = list_dir(dir)?;
    if listing.files.contains(&OsString::from(ACQUISITION_FILE)) {
        out.push(ExperimentDescriptor::describe(dir, &listing.files)?);
    }
    for subdir in &listing.subdirs {
        walk(subdir, out)?;
    }
    Ok(())
}

fn read_params(path: &Path) -> Result<ParameterSet, CatalogError> {
    ParameterSet::from_file(path).map_err(|source| CatalogError::Param {
        path: path.to_path_buf(),
        source,
    })
}

/// Calendar date of the `DATE` epoch timestamp, in the host's local time zone
pub fn acquisition_date(dir: &Path, acquisition: &ParameterSet) -> Result<NaiveDate, CatalogError> {
    let key = format!("{}DATE", KEY_NAMESPACE);
    let raw = acquisition
        .scalar(&key)
        .ok_or_else(|| CatalogError::Resolve {
            path: dir.to_path_buf(),
            source: ResolveError::KeyNotFound(key.clone()),
        })?;

    let invalid = || CatalogError::InvalidDate {
        path: dir.to_path_buf(),
        value: raw.to_string(),
    };
    let seconds = raw.trim().parse::<f64>().map_err(|_| invalid())?;
    if !seconds.is_finite() {
        return Err(invalid());
    }
    Local
        .timestamp_opt(seconds.trunc() as i64, 0)
        .single()
        .map(|dt| dt.date_naive())
        .ok_or_else(invalid)
}
