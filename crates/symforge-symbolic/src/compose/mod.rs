//! Composition of many compiled functions into one penalty or constraint.
//!
//! A composite keeps an explicit ordered list of `(kind, payload)` steps and
//! threads the running sum (penalties) or point (constraints) through them.

mod constraint;
mod penalty;

#[cfg(test)]
mod tests;

pub use constraint::{compose_constraint, ConstraintFunction, ConstraintStep, CouplingKind};
pub use penalty::{compose_penalty, PenaltyFunction, PenaltyKind, PenaltyStep};

use crate::error::{Result, SymbolicError};

/// Which kind to pair with each composed entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Kinds<K> {
    /// The kind's own default for every entry.
    Default,
    /// One kind for every entry.
    All(K),
    /// One kind per entry, in order.
    Each(Vec<K>),
}

impl<K> Default for Kinds<K> {
    fn default() -> Self {
        Kinds::Default
    }
}

impl<K: Copy> Kinds<K> {
    pub fn all(kind: K) -> Self {
        Kinds::All(kind)
    }

    pub fn each(kinds: impl IntoIterator<Item = K>) -> Self {
        Kinds::Each(kinds.into_iter().collect())
    }

    /// Resolves to exactly `count` kinds.
    ///
    /// # Errors
    ///
    /// `KindCountMismatch` when a per-entry list has the wrong length.
    pub(crate) fn resolve(&self, count: usize, default: impl Fn(usize) -> K) -> Result<Vec<K>> {
        match self {
            Kinds::Default => Ok((0..count).map(default).collect()),
            Kinds::All(kind) => Ok(vec![*kind; count]),
            Kinds::Each(kinds) if kinds.len() == count => Ok(kinds.clone()),
            Kinds::Each(kinds) => Err(SymbolicError::KindCountMismatch {
                expected: count,
                found: kinds.len(),
            }),
        }
    }
}
