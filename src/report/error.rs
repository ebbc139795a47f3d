use crate::catalog::CatalogError;
use crate::params::ResolveError;

/// Errors that can occur while generating a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// I/O error writing the report or reading a title file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Scanning the data directory failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A configured column cannot be resolved for an experiment
    #[error("Cannot report {manip}/{expno}: {source}")]
    Resolve {
        /// Sample of the offending row
        manip: String,
        /// Experiment number of the offending row
        expno: String,
        /// Lookup failure
        #[source]
        source: ResolveError,
    },
}
