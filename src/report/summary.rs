//! Index of the per-experiment tables written by a batch run
//!
//! ```text
//! # report from Results
//! manip, expno, type, file, content
//! PFDA,1,1D,1_bucketlist.csv, 901 buckets with a mean size of 16.38 data points
//! PFDA,3,DOSY,DOSY_3_bucketlist.csv, 1600 rectangular buckets with ...
//! ```

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use tempfile::NamedTempFile;

use super::ReportError;

/// Sub-directory of a sample holding 1-D tables
pub const DIR_1D: &str = "1D";

/// Sub-directory of a sample holding 2-D tables
pub const DIR_2D: &str = "2D";

/// Header line of the summary
pub const SUMMARY_HEADER: &str = "manip, expno, type, file, content";

/// One table found in a results directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisEntry {
    /// Sample directory name
    pub manip: String,
    /// Experiment number parsed from the file name
    pub expno: String,
    /// `1D`, `2D` or `DOSY`
    pub kind: String,
    /// File name
    pub file: String,
    /// First line of the file without its leading `#`
    pub content: String,
}

/// Collect every CSV table below `results_dir`, samples and files sorted by name
pub fn collect_analysis(results_dir: &Path) -> Result<Vec<AnalysisEntry>, ReportError> {
    let mut entries = Vec::new();
    for sample in sorted_entries(results_dir)? {
        if !sample.is_dir() {
            continue;
        }
        let manip = file_name(&sample);
        for (sub, is_2d) in [(DIR_1D, false), (DIR_2D, true)] {
            let dir = sample.join(sub);
            if !dir.is_dir() {
                continue;
            }
            for table in sorted_entries(&dir)? {
                if table.extension().and_then(|e| e.to_str()) != Some("csv") {
                    continue;
                }
                let file = file_name(&table);
                let tokens: Vec<&str> = file.split('_').collect();
                let (kind, expno) = if is_2d {
                    (tokens[0], tokens.get(1).copied().unwrap_or_default())
                } else {
                    (DIR_1D, tokens[0])
                };
                let entry = AnalysisEntry {
                    manip: manip.clone(),
                    expno: expno.to_string(),
                    kind: kind.to_string(),
                    content: first_line(&table)?,
                    file,
                };
                debug!("{}: {}", entry.manip, entry.file);
                entries.push(entry);
            }
        }
    }
    Ok(entries)
}

/// Render the summary of `results_dir`
pub fn analysis_summary(results_dir: &Path) -> Result<String, ReportError> {
    let entries = collect_analysis(results_dir)?;
    let mut out = format!("# report from {}\n{}\n", results_dir.display(), SUMMARY_HEADER);
    for e in &entries {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            e.manip, e.expno, e.kind, e.file, e.content
        ));
    }
    Ok(out)
}

/// Write the summary of `results_dir` to `path`, returning the number of tables
pub fn write_analysis_summary(results_dir: &Path, path: &Path) -> Result<usize, ReportError> {
    let text = analysis_summary(results_dir)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;

    // header lines are not tables
    let tables = text.lines().count() - 2;
    info!("Analysis summary of {} tables written to {}", tables, path.display());
    Ok(tables)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let mut paths = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn first_line(path: &Path) -> Result<String, ReportError> {
    let mut line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut line)?;
    let line = line.trim_end_matches(['\n', '\r']);
    Ok(line.strip_prefix('#').unwrap_or(line).to_string())
}
