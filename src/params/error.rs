/// Errors that can occur while decoding a parameter file
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// I/O error reading the parameter file
    #[error("Failed to read parameter file: {0}")]
    IoError(#[from] std::io::Error),

    /// File content is not valid text
    #[error("Parameter file is not valid UTF-8 text: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// An array declaration does not match its element count
    #[error("Array parameter {key} declares {declared} entries but {found} were found")]
    ArrayLength {
        /// Key of the offending array
        key: String,
        /// Number of entries announced by the `(0..N)` bound
        declared: usize,
        /// Number of whitespace-separated tokens actually present
        found: usize,
    },
}

/// Errors that can occur while resolving a parameter against a [`super::ParameterSet`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The resolved key is absent from every searched parameter set
    #[error("Parameter not found: {0}")]
    KeyNotFound(String),

    /// Array index past the end of the array
    #[error("Index {index} out of range for array {key} of length {len}")]
    IndexOutOfRange {
        /// Array key
        key: String,
        /// Requested index
        index: usize,
        /// Actual array length
        len: usize,
    },

    /// An array-family address points at a scalar value
    #[error("Parameter {0} is not an array")]
    NotAnArray(String),

    /// A scalar address points at an array value
    #[error("Parameter {0} is an array, address one of its entries")]
    NotAScalar(String),
}
