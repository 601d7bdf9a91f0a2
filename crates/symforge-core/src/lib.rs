//! SymForge Core - shared types for symbolic constraint compilation
//!
//! This crate provides the fundamental abstractions used by the compiler:
//! - Relation and condition classification for parsed constraints
//! - Variable naming schemes
//! - Aggregate measures (`mean`, `variance`, `spread`, ...) and their
//!   `impose_*` projections

pub mod constraint;
pub mod error;
pub mod measures;
pub mod variables;


pub use constraint::{ConditionKind, Relation};
pub use error::MeasureError;
pub use variables::VariableScheme;
