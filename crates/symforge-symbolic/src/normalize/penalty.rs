//! Penalty form: signed expressions that are `<= 0` (inequality) or `== 0`
//! (equality) exactly when the constraint holds.

use std::sync::LazyLock;

use symforge_config::ParseMode;
use symforge_core::{Relation, VariableScheme};

use super::{canonicalize, enforce, split_lines, MalformedLine, ParsedConstraint};
use crate::error::Result;
use crate::scan::CallAliases;

/// Aggregate names rewritten to the numeric-library spelling.
static PENALTY_ALIASES: LazyLock<CallAliases> = LazyLock::new(|| {
    CallAliases::new(&[("spread", "ptp"), ("mean", "average"), ("variance", "var")])
        .unwrap_or_else(|e| panic!("BUG: invalid penalty alias pattern: {e}"))
});

/// Output of the penalty-form normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenaltyForm {
    /// Expressions satisfied when `<= 0`, in declaration order.
    pub inequalities: Vec<String>,
    /// Expressions satisfied when `== 0`, in declaration order.
    pub equalities: Vec<String>,
    /// Dimensionality the expressions were compiled against.
    pub ndim: usize,
    /// Lines without a relational operator.
    pub rejected: Vec<MalformedLine>,
}

impl PenaltyForm {
    /// Applies the parse mode: strict mode turns the first rejected line into an error.
    pub fn enforce(self, mode: ParseMode) -> Result<Self> {
        enforce(&self.rejected, mode)?;
        Ok(self)
    }
}

/// Normalizes constraint text into penalty expressions.
///
/// # Example
///
/// ```
/// use symforge_core::VariableScheme;
/// use symforge_symbolic::to_penalty_form;
///
/// let form = to_penalty_form("x2 = x0/2.\nx0 >= 0.", &VariableScheme::default(), Some(3));
/// assert_eq!(form.inequalities, ["-(x[0] - (0.))"]);
/// assert_eq!(form.equalities, ["x[2] - (x[0]/2.)"]);
/// ```
pub fn to_penalty_form(text: &str, variables: &VariableScheme, nvars: Option<usize>) -> PenaltyForm {
    let canonical = canonicalize(text, variables, nvars);
    let (parsed, rejected) = split_lines(&canonical, |line| PENALTY_ALIASES.apply(line));

    let mut form = PenaltyForm {
        ndim: canonical.ndim,
        rejected,
        ..PenaltyForm::default()
    };
    for constraint in &parsed {
        let expression = signed_difference(constraint);
        match constraint.relation {
            Relation::Eq => form.equalities.push(expression),
            Relation::Lt | Relation::Gt => form.inequalities.push(expression),
        }
    }
    form
}

fn signed_difference(c: &ParsedConstraint) -> String {
    let difference = format!("{} - ({})", c.lhs, c.rhs);
    match c.relation {
        Relation::Gt => format!("-({difference})"),
        Relation::Lt | Relation::Eq => difference,
    }
}
