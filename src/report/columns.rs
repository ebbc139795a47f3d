use serde::{Deserialize, Serialize};

use crate::title::TITLE_FIELDS;

/// Parameters reported for every experiment
pub const DEFAULT_PARAMETERS: [&str; 10] =
    ["PULPROG", "SFO1", "NS", "TE", "TD", "RG", "SW", "O1", "D1", "P1"];

/// Parameters reported for 2D experiments, read from the indirect dimension first
pub const DEFAULT_PARAMETERS_2D: [&str; 6] = ["SFO1", "TD", "SW", "O1", "D9", "FnMODE"];

/// Parameters reported for DOSY experiments
pub const DEFAULT_PARAMETERS_DOSY: [&str; 2] = ["D20", "P30"];

/// Leading identification columns
pub const IDENTITY_COLUMNS: [&str; 3] = ["manip", "expno", "date"];

/// Placeholder for 2D/DOSY columns of experiments they do not apply to
pub const NOT_APPLICABLE: &str = "-";

/// Column groups of the master report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportColumns {
    /// Resolved against the direct dimension of every experiment
    pub parameters: Vec<String>,
    /// Resolved against the indirect dimension of 2D experiments, falling back to
    /// the direct dimension
    pub parameters_2d: Vec<String>,
    /// Resolved against the direct dimension of DOSY experiments
    pub parameters_dosy: Vec<String>,
}

impl Default for ReportColumns {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            parameters: owned(&DEFAULT_PARAMETERS),
            parameters_2d: owned(&DEFAULT_PARAMETERS_2D),
            parameters_dosy: owned(&DEFAULT_PARAMETERS_DOSY),
        }
    }
}

impl ReportColumns {
    /// Append extra parameters to each group
    pub fn extend(
        &mut self,
        parameters: impl IntoIterator<Item = String>,
        parameters_2d: impl IntoIterator<Item = String>,
        parameters_dosy: impl IntoIterator<Item = String>,
    ) {
        self.parameters.extend(parameters);
        self.parameters_2d.extend(parameters_2d);
        self.parameters_dosy.extend(parameters_dosy);
    }

    /// Column names of the CSV header
    pub fn header(&self, include_title: bool) -> Vec<String> {
        let mut header: Vec<String> = IDENTITY_COLUMNS.iter().map(|s| s.to_string()).collect();
        header.extend(self.parameters.iter().cloned());
        header.extend(self.parameters_2d.iter().cloned());
        header.extend(self.parameters_dosy.iter().cloned());
        if include_title {
            header.extend(TITLE_FIELDS.iter().map(|s| s.to_string()));
        }
        header
    }

    /// `#`-prefixed line labelling each column group above its first column
    pub fn section_labels(&self, include_title: bool) -> String {
        let mut cells = vec!["#".to_string()];
        cells.extend(std::iter::repeat(String::new()).take(IDENTITY_COLUMNS.len() - 1));

        let mut groups = vec![
            ("parameters", self.parameters.len()),
            ("2D", self.parameters_2d.len()),
            ("DOSY", self.parameters_dosy.len()),
        ];
        if include_title {
            groups.push(("title", TITLE_FIELDS.len()));
        }
        for (label, width) in groups {
            if width == 0 {
                continue;
            }
            cells.push(label.to_string());
            cells.extend(std::iter::repeat(String::new()).take(width - 1));
        }
        cells.join(",")
    }

    /// Total number of data columns
    pub fn width(&self, include_title: bool) -> usize {
        self.header(include_title).len()
    }
}
