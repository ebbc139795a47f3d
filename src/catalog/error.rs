use std::path::PathBuf;

use crate::params::{ParamError, ResolveError};

/// Errors that can occur while scanning a data directory
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// I/O error while walking the directory tree
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Directory or file being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A parameter file of an experiment is malformed
    #[error("Malformed parameter file {}: {source}", path.display())]
    Param {
        /// Offending file
        path: PathBuf,
        /// Parse failure
        #[source]
        source: ParamError,
    },

    /// A parameter needed for classification is missing
    #[error("Experiment {}: {source}", path.display())]
    Resolve {
        /// Experiment directory
        path: PathBuf,
        /// Lookup failure
        #[source]
        source: ResolveError,
    },

    /// The acquisition timestamp is not a valid epoch value
    #[error("Experiment {}: invalid acquisition timestamp {value:?}", path.display())]
    InvalidDate {
        /// Experiment directory
        path: PathBuf,
        /// Raw `DATE` value
        value: String,
    },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}
