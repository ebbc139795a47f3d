//! # Bruker Parameter Files
//!
//! Acquisition (`acqus`, `acqu2s`) and processing (`procs`, `proc2s`) parameters are
//! stored in a JCAMP-DX flavoured text format:
//!
//! ```text
//! ##TITLE= Parameter file, TOPSPIN		Version 3.5
//! $$ 2016-03-03 10:51:22.374 +0100  nmrsu@spect
//! ##$SFO1= 600.1337061
//! ##$PULPROG= <zg30>
//! ##$D= (0..63)
//! 0 1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0.1 0 0 0 0 0 0 0 0 0 0 0
//! 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
//! ```
//!
//! [`parse_str`] turns such a file into a [`ParameterSet`]; [`ParamResolver`] then
//! addresses scalar parameters (`SFO1`) and array elements (`D20`) inside it.

mod error;
mod parser;
mod resolver;


use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

pub use error::{ParamError, ResolveError};
pub use parser::{parse_bytes, parse_str, COMMENT_MARKER, KEY_MARKER};
pub use resolver::{
    ArrayFamilies, ParamAddress, ParamResolver, DEFAULT_ARRAY_FAMILIES, KEY_NAMESPACE,
};

/// A single parameter value: either a scalar or an ordered array of tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Scalar value, stored as the text found in the file
    Scalar(String),
    /// Array value, one entry per whitespace-separated token
    Array(Vec<String>),
}

impl ParamValue {
    /// Scalar text, or `None` for arrays
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(s) => Some(s),
            ParamValue::Array(_) => None,
        }
    }

    /// Array tokens, or `None` for scalars
    pub fn as_array(&self) -> Option<&[String]> {
        match self {
            ParamValue::Scalar(_) => None,
            ParamValue::Array(a) => Some(a),
        }
    }
}

/// Decoded content of one parameter file
///
/// Keys are stored exactly as written after the `##` marker, so instrument
/// parameters keep their `$` namespace (`$SFO1`) while JCAMP core labels do not
/// (`TITLE`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterSet {
    values: HashMap<String, ParamValue>,
    comments: String,
}

impl ParameterSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a parameter file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParamError> {
        let bytes = std::fs::read(path)?;
        parse_bytes(bytes)
    }

    /// Look up a raw key
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// Look up a raw key holding a scalar
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_scalar)
    }

    /// Look up a raw key holding an array
    pub fn array(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(ParamValue::as_array)
    }

    /// Look up an instrument parameter (`$`-namespaced) and parse it as a float
    pub fn number(&self, name: &str) -> Option<f64> {
        self.scalar(&format!("{}{}", KEY_NAMESPACE, name))
            .and_then(|v| v.trim().parse().ok())
    }

    /// Whether the raw key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// All comment lines, each preceded by a newline, in file order
    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set holds no keys
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all keys (unordered)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Insert a value, returning the previous one for this key
    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) -> Option<ParamValue> {
        self.values.insert(key.into(), value)
    }

    pub(crate) fn push_comment(&mut self, line: &str) {
        self.comments.push('\n');
        self.comments.push_str(line);
    }
}
