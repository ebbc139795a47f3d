//! # Master Report
//!
//! One CSV row per experiment with its acquisition parameters:
//!
//! ```text
//! # report from /data/run42
//! #,,,parameters,,,,,,,,,,2D,,,,,,DOSY,
//! manip,expno,date,PULPROG,SFO1,NS,TE,TD,RG,SW,O1,D1,P1,SFO1,TD,SW,O1,D9,FnMODE,D20,P30
//! PFDA,1,2016-03-03,zg30,600.1337061,64,298.0,65536,101,20.0254,2820.61,2,9.5,-,-,-,-,-,-,-,-
//!
//! PFOA,1,2016-03-04,...
//! ```
//!
//! A blank line separates consecutive samples. Any column that cannot be resolved
//! aborts the whole report: a blank cell would hide a malformed or unexpected
//! experiment layout.

mod columns;
mod error;
pub mod summary;

#[cfg(test)]
mod tests;

use std::fmt;
use std::io::Write;
use std::path::Path;

use log::{info, warn};
use tempfile::NamedTempFile;

use crate::catalog::{ExperimentCatalog, ExperimentDescriptor};
use crate::params::{ParamResolver, ParameterSet};
use crate::title::{TitleAnnotation, NO_TITLE_FILE, TITLE_FIELDS};

pub use columns::{
    ReportColumns, DEFAULT_PARAMETERS, DEFAULT_PARAMETERS_2D, DEFAULT_PARAMETERS_DOSY,
    IDENTITY_COLUMNS, NOT_APPLICABLE,
};
pub use error::ReportError;

/// Statistics from a generated report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportStats {
    /// Number of experiment rows
    pub entries: usize,
    /// Number of distinct consecutive sample groups
    pub manips: usize,
}

impl fmt::Display for ReportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "found {} entries in {} samples", self.entries, self.manips)
    }
}

/// Builds the master CSV report from a set of experiments
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    columns: ReportColumns,
    resolver: ParamResolver,
    include_title: bool,
}

impl ReportBuilder {
    /// Create a builder for the given columns and resolver
    pub fn new(columns: ReportColumns, resolver: ParamResolver) -> Self {
        Self {
            columns,
            resolver,
            include_title: false,
        }
    }

    /// Append the title annotation fields to every row
    pub fn with_title(mut self, include_title: bool) -> Self {
        self.include_title = include_title;
        self
    }

    /// Configured columns
    pub fn columns(&self) -> &ReportColumns {
        &self.columns
    }

    /// Render the report for `experiments`, labelled as coming from `source`
    pub fn build(
        &self,
        source: &Path,
        experiments: &[ExperimentDescriptor],
    ) -> Result<String, ReportError> {
        self.render(source, experiments).map(|(text, _)| text)
    }

    /// Render the report for a scanned catalog
    pub fn build_catalog(&self, catalog: &ExperimentCatalog) -> Result<String, ReportError> {
        self.build(catalog.root(), catalog.experiments())
    }

    /// Write the report for `catalog` to `path`
    ///
    /// The text is written to a temporary file next to `path` and only moved into
    /// place once complete.
    pub fn write_to<P: AsRef<Path>>(
        &self,
        catalog: &ExperimentCatalog,
        path: P,
    ) -> Result<ReportStats, ReportError> {
        let path = path.as_ref();
        let (text, stats) = self.render(catalog.root(), catalog.experiments())?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        if stats.entries == 0 {
            warn!("No experiment found in {}", catalog.root().display());
        } else {
            info!("{} - results are in {}", stats, path.display());
        }
        Ok(stats)
    }

    /// Cells of one experiment row
    pub fn row(&self, experiment: &ExperimentDescriptor) -> Result<Vec<String>, ReportError> {
        let width = self.columns.width(self.include_title);
        let mut row = Vec::with_capacity(width);
        row.push(experiment.manip.clone());
        row.push(experiment.expno.clone());
        row.push(experiment.date.to_string());

        for name in &self.columns.parameters {
            row.push(self.resolve(experiment, name, None)?);
        }

        match (&experiment.acquisition_2d, experiment.is_2d()) {
            (Some(second), true) => {
                for name in &self.columns.parameters_2d {
                    row.push(self.resolve(experiment, name, Some(second))?);
                }
            }
            _ => fill(&mut row, NOT_APPLICABLE, self.columns.parameters_2d.len()),
        }

        if experiment.is_dosy {
            for name in &self.columns.parameters_dosy {
                row.push(self.resolve(experiment, name, None)?);
            }
        } else {
            fill(&mut row, NOT_APPLICABLE, self.columns.parameters_dosy.len());
        }

        if self.include_title {
            match TitleAnnotation::locate(&experiment.path) {
                Some(path) => {
                    let title = TitleAnnotation::from_file(&path)?;
                    row.extend(title.fields().iter().map(|s| s.to_string()));
                }
                None => fill(&mut row, NO_TITLE_FILE, TITLE_FIELDS.len()),
            }
        }
        Ok(row)
    }

    fn resolve(
        &self,
        experiment: &ExperimentDescriptor,
        name: &str,
        secondary: Option<&ParameterSet>,
    ) -> Result<String, ReportError> {
        self.resolver
            .resolve(name, &experiment.acquisition, secondary)
            .map(str::to_string)
            .map_err(|source| ReportError::Resolve {
                manip: experiment.manip.clone(),
                expno: experiment.expno.clone(),
                source,
            })
    }

    fn render(
        &self,
        source: &Path,
        experiments: &[ExperimentDescriptor],
    ) -> Result<(String, ReportStats), ReportError> {
        let mut out: Vec<u8> = Vec::new();
        writeln!(out, "# report from {}", source.display())?;
        writeln!(out, "{}", self.columns.section_labels(self.include_title))?;
        write_record(&mut out, &self.columns.header(self.include_title))?;

        let mut stats = ReportStats::default();
        let mut current: Option<&str> = None;
        for experiment in experiments {
            let row = self.row(experiment)?;
            if current != Some(experiment.manip.as_str()) {
                // blank line between samples, never before the first row
                if current.is_some() {
                    out.push(b'\n');
                }
                current = Some(experiment.manip.as_str());
                stats.manips += 1;
            }
            write_record(&mut out, &row)?;
            stats.entries += 1;
        }

        Ok((String::from_utf8_lossy(&out).into_owned(), stats))
    }
}

fn fill(row: &mut Vec<String>, placeholder: &str, count: usize) {
    row.extend(std::iter::repeat(placeholder.to_string()).take(count));
}

fn write_record(out: &mut Vec<u8>, record: &[String]) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(record)?;
    writer.flush()?;
    Ok(())
}
