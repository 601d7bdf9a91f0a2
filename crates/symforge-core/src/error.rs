//! Error types for SymForge measures

use thiserror::Error;

/// Error raised when an aggregate property cannot be imposed on a sample set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// The requested target is outside the measure's range (e.g. a negative variance).
    #[error("cannot impose {measure} = {target}: target out of range")]
    InvalidTarget { measure: &'static str, target: f64 },

    /// The samples carry no information to rescale (e.g. all values equal).
    #[error("cannot impose {measure} = {target} on degenerate samples")]
    Degenerate { measure: &'static str, target: f64 },
}

/// Result type alias for measure projections
pub type Result<T> = std::result::Result<T, MeasureError>;
