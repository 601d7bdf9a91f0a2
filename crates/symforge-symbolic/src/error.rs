//! Error types for constraint compilation

use symforge_core::MeasureError;
use thiserror::Error;

/// Main error type for symbolic compilation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolicError {
    /// A constraint line contains none of `=`, `<`, `>`.
    #[error("invalid constraint on line {line}: {text}")]
    MalformedConstraint { line: usize, text: String },

    /// Matrix and right-hand side row counts disagree.
    #[error("dimensions of {matrix} and {vector} are not consistent: {rows} rows, {values} values")]
    DimensionMismatch {
        matrix: &'static str,
        vector: &'static str,
        rows: usize,
        values: usize,
    },

    /// A coefficient row has a different width than the first row.
    #[error("row {row} of {matrix} has {found} coefficients, expected {expected}")]
    RaggedMatrix {
        matrix: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A normalized expression cannot be compiled in the execution environment.
    #[error("cannot compile `{expression}`: {message}")]
    Compile { expression: String, message: String },

    /// A per-entry kind list does not match the number of entries.
    #[error("expected {expected} kinds, found {found}")]
    KindCountMismatch { expected: usize, found: usize },

    /// A vector value does not fit the assignment target.
    #[error("cannot assign {found} values to a target of length {expected}")]
    LengthMismatch { expected: usize, found: usize },

    /// An aggregate projection has no solution for the given samples.
    #[error(transparent)]
    Measure(#[from] MeasureError),
}

impl SymbolicError {
    pub(crate) fn compile(expression: &str, message: impl Into<String>) -> Self {
        SymbolicError::Compile {
            expression: expression.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for symbolic compilation
pub type Result<T> = std::result::Result<T, SymbolicError>;
