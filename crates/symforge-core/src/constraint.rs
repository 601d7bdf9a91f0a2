//! Core constraint types.
//!
//! This module provides the classification types shared by the constraint
//! parser, the function builders and the composers.

use std::fmt;

/// Relational operator of a single constraint line.
///
/// # Example
///
/// ```
/// use symforge_core::{ConditionKind, Relation};
///
/// assert_eq!(Relation::Gt.symbol(), '>');
/// assert_eq!(Relation::Eq.condition_kind(), ConditionKind::Equality);
/// assert_eq!(Relation::Lt.condition_kind(), ConditionKind::Inequality);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `lhs = rhs`
    Eq,
    /// `lhs < rhs` (also `<=`)
    Lt,
    /// `lhs > rhs` (also `>=`)
    Gt,
}

impl Relation {
    /// Operators in the order the parser tries them.
    pub const SEARCH_ORDER: [Relation; 3] = [Relation::Gt, Relation::Lt, Relation::Eq];

    /// Returns the operator character.
    pub fn symbol(self) -> char {
        match self {
            Relation::Eq => '=',
            Relation::Lt => '<',
            Relation::Gt => '>',
        }
    }

    /// Returns the provenance tag of conditions derived from this relation.
    pub fn condition_kind(self) -> ConditionKind {
        match self {
            Relation::Eq => ConditionKind::Equality,
            Relation::Lt | Relation::Gt => ConditionKind::Inequality,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Provenance tag of a compiled condition.
///
/// An equality condition is satisfied when it evaluates to exactly zero,
/// an inequality condition when it evaluates to a value `<= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConditionKind {
    Equality,
    Inequality,
}

impl ConditionKind {
    /// Returns the lowercase tag name.
    pub fn name(self) -> &'static str {
        match self {
            ConditionKind::Equality => "equality",
            ConditionKind::Inequality => "inequality",
        }
    }

    /// Returns true if `value` satisfies a condition of this kind within `tol`.
    pub fn is_satisfied(self, value: f64, tol: f64) -> bool {
        match self {
            ConditionKind::Equality => value.abs() <= tol,
            ConditionKind::Inequality => value <= tol,
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
