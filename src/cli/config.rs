//! TOML run configuration.
//!
//! Every field is optional; an empty file reproduces the built-in defaults:
//!
//! ```toml
//! # nmrscan.toml
//! [report]
//! add = ["D8", "CNST2"]
//! title = true
//!
//! [bucket]
//! dosy_size = 0.1
//! moments = false
//!
//! [bucket.nuclei.1H]
//! limits = [0.5, 9.5]
//! size_1d = 0.01
//! size_2d = 0.03
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use nmrscan::bucket::BucketConfig;
use nmrscan::params::{ArrayFamilies, ParamResolver};
use nmrscan::report::{
    ReportBuilder, ReportColumns, DEFAULT_PARAMETERS, DEFAULT_PARAMETERS_2D,
    DEFAULT_PARAMETERS_DOSY,
};

/// Root configuration structure for nmrscan.toml files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Master report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Bucketing settings.
    #[serde(default)]
    pub bucket: BucketConfig,
}

/// Configuration of the master report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Parameters reported for every experiment.
    pub parameters: Vec<String>,

    /// Parameters reported for 2D experiments.
    pub parameters_2d: Vec<String>,

    /// Parameters reported for DOSY experiments.
    pub parameters_dosy: Vec<String>,

    /// Appended to `parameters`.
    pub add: Vec<String>,

    /// Appended to `parameters_2d`.
    pub add_2d: Vec<String>,

    /// Appended to `parameters_dosy`.
    pub add_dosy: Vec<String>,

    /// Append title annotation columns.
    pub title: bool,

    /// Array parameter families (`D20` reads entry 20 of `D`).
    pub array_families: ArrayFamilies,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            parameters: owned(&DEFAULT_PARAMETERS),
            parameters_2d: owned(&DEFAULT_PARAMETERS_2D),
            parameters_dosy: owned(&DEFAULT_PARAMETERS_DOSY),
            add: Vec::new(),
            add_2d: Vec::new(),
            add_dosy: Vec::new(),
            title: false,
            array_families: ArrayFamilies::default(),
        }
    }
}

impl ReportConfig {
    /// Column groups with the `add*` lists appended.
    pub fn columns(&self) -> ReportColumns {
        let mut columns = ReportColumns {
            parameters: self.parameters.clone(),
            parameters_2d: self.parameters_2d.clone(),
            parameters_dosy: self.parameters_dosy.clone(),
        };
        columns.extend(
            self.add.iter().cloned(),
            self.add_2d.iter().cloned(),
            self.add_dosy.iter().cloned(),
        );
        columns
    }

    /// Report builder for this configuration.
    pub fn builder(&self) -> ReportBuilder {
        ReportBuilder::new(
            self.columns(),
            ParamResolver::new(self.array_families.clone()),
        )
        .with_title(self.title)
    }
}

impl RunConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Serialize the full configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmrscan::nucleus::Nucleus;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [report]
            add = ["D8", "CNST2"]
            add_dosy = ["P19"]
            title = true
            array_families = ["D", "P", "CNST"]

            [bucket]
            dosy_size = 0.2
            moments = true

            [bucket.nuclei.1H]
            limits = [0.8, 9.0]
            size_1d = 0.02
            size_2d = 0.05
        "#;

        let config = RunConfig::from_str(toml).unwrap();
        assert!(config.report.title);
        let columns = config.report.columns();
        assert_eq!(columns.parameters.len(), 12);
        assert_eq!(columns.parameters.last().map(String::as_str), Some("CNST2"));
        assert_eq!(columns.parameters_dosy, vec!["D20", "P30", "P19"]);
        assert!(config.report.array_families.contains("CNST"));

        assert_eq!(config.bucket.dosy_size, 0.2);
        assert!(config.bucket.moments);
        let proton = config.bucket.for_nucleus(Nucleus::H1).unwrap();
        assert_eq!(proton.limits, (0.8, 9.0));
        // an explicit nuclei table replaces the defaults
        assert!(config.bucket.for_nucleus(Nucleus::C13).is_none());
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [report]
            parameters = ["PULPROG", "NS"]
        "#;

        let config = RunConfig::from_str(toml).unwrap();
        assert_eq!(config.report.parameters, vec!["PULPROG", "NS"]);
        assert_eq!(config.report.parameters_2d.len(), 6);
        assert_eq!(config.bucket, BucketConfig::default());
    }

    #[test]
    fn test_empty_config() {
        let config = RunConfig::from_str("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert!(!config.report.title);
    }

    #[test]
    fn test_template_round_trip() {
        let text = RunConfig::default().to_toml().unwrap();
        assert!(text.contains("[bucket.nuclei.1H]"));
        assert_eq!(RunConfig::from_str(&text).unwrap(), RunConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(RunConfig::from_str("[report]\ntitle = \"yes\"").is_err());
    }
}
