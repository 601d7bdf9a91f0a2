//! Solver form: assignments that repair a point so one constraint holds.

use std::sync::LazyLock;

use symforge_config::ParseMode;
use symforge_core::{Relation, VariableScheme};

use super::{canonicalize, enforce, split_lines, MalformedLine, ParsedConstraint};
use crate::error::Result;
use crate::scan::{whole_call, CallAliases};

/// Numeric-library spellings rewritten to the imposable vocabulary.
static SOLVER_ALIASES: LazyLock<CallAliases> = LazyLock::new(|| {
    CallAliases::new(&[
        ("ptp", "spread"),
        ("average", "mean"),
        ("var", "variance"),
        ("prod", "product"),
    ])
    .unwrap_or_else(|e| panic!("BUG: invalid solver alias pattern: {e}"))
});

/// Aggregates with an `impose_<name>` projector.
const IMPOSABLE: [&str; 5] = ["spread", "mean", "variance", "sum", "product"];

/// Output of the solver-form normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverForm {
    /// Assignment statements in declaration order.
    pub statements: Vec<String>,
    /// Dimensionality the statements were compiled against.
    pub ndim: usize,
    /// Lines without a relational operator.
    pub rejected: Vec<MalformedLine>,
}

impl SolverForm {
    /// Applies the parse mode: strict mode turns the first rejected line into an error.
    pub fn enforce(self, mode: ParseMode) -> Result<Self> {
        enforce(&self.rejected, mode)?;
        Ok(self)
    }
}

/// Normalizes constraint text into repair assignments.
///
/// `>` becomes `lhs = max(rhs, lhs)`, `<` becomes `lhs = min(rhs, lhs)` and
/// `=` becomes `lhs = rhs`. When the left side is an aggregate call such as
/// `mean(x)`, the call is stripped from the target and the value is wrapped
/// in the matching projector: `x = impose_mean(rhs, x)`.
///
/// # Example
///
/// ```
/// use symforge_core::VariableScheme;
/// use symforge_symbolic::to_solver_form;
///
/// let form = to_solver_form("x2 = x0/2.\nx0 >= 0.", &VariableScheme::default(), Some(3));
/// assert_eq!(form.statements, ["x[2] = x[0]/2.", "x[0] = max(0., x[0])"]);
///
/// let form = to_solver_form("average(x) = 5", &VariableScheme::default(), Some(3));
/// assert_eq!(form.statements, ["x = impose_mean(5, x)"]);
/// ```
pub fn to_solver_form(text: &str, variables: &VariableScheme, nvars: Option<usize>) -> SolverForm {
    let canonical = canonicalize(text, variables, nvars);
    let (parsed, rejected) = split_lines(&canonical, |line| SOLVER_ALIASES.apply(line));

    SolverForm {
        statements: parsed.iter().map(assignment).collect(),
        ndim: canonical.ndim,
        rejected,
    }
}

fn assignment(c: &ParsedConstraint) -> String {
    let value = match c.relation {
        Relation::Gt => format!("max({}, {})", c.rhs, c.lhs),
        Relation::Lt => format!("min({}, {})", c.rhs, c.lhs),
        Relation::Eq => c.rhs.clone(),
    };
    match whole_call(&c.lhs, &IMPOSABLE) {
        Some((aggregate, target)) => format!("{target} = impose_{aggregate}({value}, {target})"),
        None => format!("{} = {}", c.lhs, value),
    }
}
