//! Peak-list export
//!
//! Peak picking and centroiding are done by the numerical pipeline; this module only
//! formats their result as per-experiment CSV tables, with the same `#` summary line
//! convention as bucket tables so both show up in the analysis summary.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// A peak of a 1-D spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak1D {
    /// Index in the peak list
    pub id: usize,
    /// Free label, often empty
    pub label: String,
    /// Position in ppm
    pub position: f64,
    /// Height
    pub intensity: f64,
    /// Width at half height in ppm
    pub width: f64,
}

/// A peak of a 2-D spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak2D {
    /// Index in the peak list
    pub id: usize,
    /// Free label, often empty
    pub label: String,
    /// Position along F1 in ppm
    pub position_f1: f64,
    /// Position along F2 in ppm
    pub position_f2: f64,
    /// Height
    pub intensity: f64,
    /// Width along F1 in ppm
    pub width_f1: f64,
    /// Width along F2 in ppm
    pub width_f2: f64,
}

/// Write `peaks` as a commented CSV table
pub fn write_peaks<T: Serialize, W: Write>(peaks: &[T], mut out: W) -> Result<(), csv::Error> {
    writeln!(out, "# {} peaks", peaks.len())?;
    let mut writer = csv::Writer::from_writer(out);
    for peak in peaks {
        writer.serialize(peak)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `peaks` to `path`; the file only appears once complete
pub fn write_peaks_file<T: Serialize>(peaks: &[T], path: &Path) -> Result<(), csv::Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write_peaks(peaks, &mut tmp)?;
    tmp.persist(path).map_err(|e| csv::Error::from(e.error))?;
    Ok(())
}

/// Read a table written by [`write_peaks`]
pub fn read_peaks<T: for<'de> Deserialize<'de>>(text: &str) -> Result<Vec<T>, csv::Error> {
    let body: String = text
        .lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    csv::Reader::from_reader(body.as_bytes())
        .deserialize()
        .collect()
}
