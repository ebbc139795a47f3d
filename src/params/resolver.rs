use log::debug;
use serde::{Deserialize, Serialize};

use super::{ParamValue, ParameterSet, ResolveError};

/// Namespace prefix the instrument puts in front of its own parameter keys
pub const KEY_NAMESPACE: &str = "$";

/// Array parameter families recognised by default (`D20` is entry 20 of `$D`)
pub const DEFAULT_ARRAY_FAMILIES: [&str; 5] = ["D", "P", "PL", "PCPD", "SP"];

/// Set of array-parameter family names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrayFamilies(Vec<String>);

impl Default for ArrayFamilies {
    fn default() -> Self {
        Self(DEFAULT_ARRAY_FAMILIES.iter().map(|s| s.to_string()).collect())
    }
}

impl ArrayFamilies {
    /// Build from an explicit list of family names
    pub fn new<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(families.into_iter().map(Into::into).collect())
    }

    /// Whether `name` is a recognised family
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f == name)
    }

    /// Family names in configuration order
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Where a parameter name points inside a [`ParameterSet`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamAddress {
    /// Direct scalar key
    Scalar(String),
    /// Entry `index` of array `key`
    Element {
        /// Namespaced array key
        key: String,
        /// 0-based entry
        index: usize,
    },
}

/// Maps report column names onto parameter-set values
#[derive(Debug, Clone, Default)]
pub struct ParamResolver {
    families: ArrayFamilies,
}

impl ParamResolver {
    /// Create a resolver recognising the given array families
    pub fn new(families: ArrayFamilies) -> Self {
        Self { families }
    }

    /// Array families this resolver recognises
    pub fn families(&self) -> &ArrayFamilies {
        &self.families
    }

    /// Translate a column name into a namespaced key address
    ///
    /// `<Family><digits>` with a recognised family is an array element; anything
    /// else is a scalar key.
    pub fn address(&self, name: &str) -> ParamAddress {
        let digits_at = name
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i);

        if let Some(split) = digits_at {
            let (family, digits) = name.split_at(split);
            if self.families.contains(family) {
                if let Ok(index) = digits.parse::<usize>() {
                    return ParamAddress::Element {
                        key: format!("{}{}", KEY_NAMESPACE, family),
                        index,
                    };
                }
            }
        }
        ParamAddress::Scalar(format!("{}{}", KEY_NAMESPACE, name))
    }

    /// Resolve `name`, trying `secondary` first and falling back to `primary`
    /// when the key is absent from `secondary`
    pub fn resolve<'a>(
        &self,
        name: &str,
        primary: &'a ParameterSet,
        secondary: Option<&'a ParameterSet>,
    ) -> Result<&'a str, ResolveError> {
        if let Some(secondary) = secondary {
            match self.resolve_in(name, secondary) {
                Err(ResolveError::KeyNotFound(key)) => {
                    debug!("{} absent from second dimension, using first dimension", key);
                }
                other => return other,
            }
        }
        self.resolve_in(name, primary)
    }

    /// Resolve `name` against a single parameter set
    pub fn resolve_in<'a>(
        &self,
        name: &str,
        params: &'a ParameterSet,
    ) -> Result<&'a str, ResolveError> {
        match self.address(name) {
            ParamAddress::Scalar(key) => match params.get(&key) {
                Some(ParamValue::Scalar(value)) => Ok(value.as_str()),
                Some(ParamValue::Array(_)) => Err(ResolveError::NotAScalar(key)),
                None => Err(ResolveError::KeyNotFound(key)),
            },
            ParamAddress::Element { key, index } => match params.get(&key) {
                Some(ParamValue::Array(values)) => {
                    values
                        .get(index)
                        .map(String::as_str)
                        .ok_or(ResolveError::IndexOutOfRange {
                            len: values.len(),
                            key,
                            index,
                        })
                }
                Some(ParamValue::Scalar(_)) => Err(ResolveError::NotAnArray(key)),
                None => Err(ResolveError::KeyNotFound(key)),
            },
        }
    }
}
