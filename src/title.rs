//! # Title Annotations
//!
//! Operators describe each sample in the free-text `title` file of the first
//! processing. When they follow the lab convention
//!
//! ```text
//! [PFDA] = 10 mM, ds DMSO 5mm TE 298K
//! EMGE_016
//! ```
//!
//! the text carries a product name, its concentration, the solvent, the temperature
//! and a product reference. [`TitleAnnotation::parse`] extracts these with independent
//! pattern searches and keeps whatever is left over as a free comment.
//!
//! Every search runs on the whole text. Matched spans are then removed from a working
//! copy one after the other, so when two matches overlap (a temperature-like
//! `..K` inside a reference token, say) the second removal may strip text the first
//! one already consumed, or nothing at all.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder for a field whose pattern did not match
pub const MISSING_FIELD: &str = "-";

/// Placeholder for the concentration when no product/concentration pair matched
pub const MISSING_CONCENTRATION: &str = "NaN";

/// Placeholder used by reports when no title file exists at all
pub const NO_TITLE_FILE: &str = "...";

/// Column names of the annotation fields, in report order
pub const TITLE_FIELDS: [&str; 6] = [
    "product",
    "concentration",
    "solvent",
    "temperature",
    "product_reference",
    "comment",
];

/// Candidate title file names, searched in order under `pdata/1`
pub const TITLE_FILE_NAMES: [&str; 4] = ["title", "TITLE", "title.txt", "TITLE.TXT"];

/// `[name] = 10 mM,`
static PRODUCT_AND_CONCENTRATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([\w\s]+)\]\s*=\s*([0-9.]*\s\w+),?").expect("product regex")
});

/// `ds DMSO`
static SOLVENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ds +([0-9a-zA-Z/-]+)").expect("solvent regex"));

/// `298K`, `298 K`
static TEMPERATURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *([0-9]+) *K").expect("temperature regex"));

/// `EMGE_016` at the start of any line
static PRODUCT_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([0-9a-zA-Z]+[_-][0-9a-zA-Z_-]+)").expect("reference regex")
});

/// Fields extracted from a title file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleAnnotation {
    /// Product name (between brackets)
    pub product: String,
    /// Concentration with its unit
    pub concentration: String,
    /// Solvent name
    pub solvent: String,
    /// Temperature value, unit stripped
    pub temperature: String,
    /// Internal product reference
    pub product_reference: String,
    /// Remaining text once every match has been removed
    pub comment: String,
}

impl TitleAnnotation {
    /// Extract the annotation fields from a title text. Never fails.
    ///
    /// `\r\n` and lone `\r` line endings are read as `\n`.
    pub fn parse(text: &str) -> Self {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let text = text.as_str();
        let product = PRODUCT_AND_CONCENTRATION.captures(text);
        let solvent = SOLVENT.captures(text);
        let temperature = TEMPERATURE.captures(text);
        let reference = PRODUCT_REFERENCE.find(text);

        let group = |caps: &Option<regex::Captures<'_>>, i: usize| {
            caps.as_ref()
                .and_then(|c| c.get(i))
                .map(|m| m.as_str().to_string())
        };

        let (product_name, concentration) = match (group(&product, 1), group(&product, 2)) {
            (Some(name), Some(conc)) => (name, conc),
            _ => (MISSING_FIELD.to_string(), MISSING_CONCENTRATION.to_string()),
        };

        let spans: Vec<String> = [
            group(&product, 0),
            group(&solvent, 0),
            group(&temperature, 0),
            reference.map(|m| m.as_str().to_string()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut residue = text.to_string();
        for span in &spans {
            residue = residue.replace(span.as_str(), "");
        }
        let comment = residue.trim().replace(',', " ").replace('\n', " ");

        Self {
            product: product_name,
            concentration,
            solvent: group(&solvent, 1).unwrap_or_else(|| MISSING_FIELD.to_string()),
            temperature: group(&temperature, 1).unwrap_or_else(|| MISSING_FIELD.to_string()),
            product_reference: reference
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| MISSING_FIELD.to_string()),
            comment,
        }
    }

    /// First existing title file of an experiment, searched under `pdata/1`
    pub fn locate(experiment_dir: &Path) -> Option<PathBuf> {
        let pdata = experiment_dir.join("pdata").join("1");
        TITLE_FILE_NAMES
            .iter()
            .map(|name| pdata.join(name))
            .find(|path| path.is_file())
    }

    /// Read and parse a title file; undecodable bytes are replaced, not rejected
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Field values in [`TITLE_FIELDS`] order
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.product,
            &self.concentration,
            &self.solvent,
            &self.temperature,
            &self.product_reference,
            &self.comment,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_title() {
        let title = TitleAnnotation::parse("[PFDA] = 10 mM, ds DMSO 5mm TE 298K\nEMGE_016");

        assert_eq!(title.product, "PFDA");
        assert!(title.concentration.contains("10 mM"));
        assert_eq!(title.solvent, "DMSO");
        assert_eq!(title.temperature, "298");
        assert!(title.product_reference.starts_with("EMGE_016"));
        assert_eq!(title.comment, "5mm TE");
        for consumed in ["[PFDA]", "10 mM", "ds DMSO", "298K", "EMGE_016", ","] {
            assert!(!title.comment.contains(consumed), "{} left in comment", consumed);
        }
    }

    #[test]
    fn test_missing_product() {
        let title = TitleAnnotation::parse("ds water 300K\nSAMPLE_1");

        assert_eq!(title.product, "-");
        assert_eq!(title.concentration, "NaN");
        assert_eq!(title.solvent, "water");
        assert_eq!(title.temperature, "300");
        assert_eq!(title.product_reference, "SAMPLE_1");
        assert_eq!(title.comment, "");
    }

    #[test]
    fn test_free_text_only() {
        let title = TitleAnnotation::parse("quick proton check, no lock\n");

        assert_eq!(title.product, MISSING_FIELD);
        assert_eq!(title.concentration, MISSING_CONCENTRATION);
        assert_eq!(title.solvent, MISSING_FIELD);
        assert_eq!(title.temperature, MISSING_FIELD);
        assert_eq!(title.product_reference, MISSING_FIELD);
        assert_eq!(title.comment, "quick proton check  no lock");
    }

    #[test]
    fn test_empty_title() {
        let title = TitleAnnotation::parse("");
        assert_eq!(title.fields(), ["-", "NaN", "-", "-", "-", ""]);
    }

    #[test]
    fn test_reference_on_any_line() {
        let title = TitleAnnotation::parse("noesy 1D\nbatch-7 rerun\n");
        assert_eq!(title.product_reference, "batch-7");
        assert_eq!(title.comment, "noesy 1D  rerun");
    }

    #[test]
    fn test_crlf_line_endings() {
        let title = TitleAnnotation::parse("quick check\r\nno lock\r\nREF_1\r\n");
        assert_eq!(title.product_reference, "REF_1");
        assert_eq!(title.comment, "quick check no lock");
        assert!(!title.comment.contains('\r'));

        let unix = TitleAnnotation::parse("ds D2O 300K\nEMGE_016\nrerun");
        let dos = TitleAnnotation::parse("ds D2O 300K\r\nEMGE_016\r\nrerun");
        assert_eq!(dos, unix);
    }

    #[test]
    fn test_multiword_product() {
        let title = TitleAnnotation::parse("[citric acid] = 2.5 mM ds D2O 310 K");

        assert_eq!(title.product, "citric acid");
        assert_eq!(title.concentration, "2.5 mM");
        assert_eq!(title.solvent, "D2O");
        assert_eq!(title.temperature, "310");
    }

    #[test]
    fn test_locate_candidates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let pdata = dir.path().join("pdata").join("1");
        std::fs::create_dir_all(&pdata).unwrap();
        assert_eq!(TitleAnnotation::locate(dir.path()), None);

        std::fs::write(pdata.join("title.txt"), "ds CDCl3").unwrap();
        assert_eq!(TitleAnnotation::locate(dir.path()), Some(pdata.join("title.txt")));

        std::fs::write(pdata.join("title"), "ds D2O\nREF_1").unwrap();
        let found = TitleAnnotation::locate(dir.path()).unwrap();
        assert_eq!(found, pdata.join("title"));
        assert_eq!(TitleAnnotation::from_file(&found).unwrap().solvent, "D2O");
    }

    #[test]
    fn test_overlapping_matches_double_strip() {
        // The temperature search hits the "2K" inside the reference token. Removing
        // it first cuts the reference, which then no longer matches its own span.
        let title = TitleAnnotation::parse("LOT_2K-A\nplain");

        assert_eq!(title.product_reference, "LOT_2K-A");
        assert_eq!(title.temperature, "2");
        assert_eq!(title.comment, "LOT_-A plain");
    }
}
