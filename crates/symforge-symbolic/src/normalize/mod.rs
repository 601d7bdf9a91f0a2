//! Normalization of constraint text into penalty form and solver form.
//!
//! Both forms share the same front end: variables are rewritten to indexed
//! point access (`x[i]`), then each non-blank line is split on its relational
//! operator. `>` is tried first, then `<`, then `=`; the left side ends at the
//! first occurrence of the operator and the right side starts after its last
//! occurrence, so a trailing `=` of `<=` / `>=` is absorbed by the split.

mod penalty;
mod solver;


pub use penalty::{to_penalty_form, PenaltyForm};
pub use solver::{to_solver_form, SolverForm};

use symforge_config::ParseMode;
use symforge_core::{Relation, VariableScheme};
use tracing::warn;

use crate::error::{Result, SymbolicError};
use crate::extract::inferred_dimension;
use crate::rename::{replace_variables, DEFAULT_MARKER};
use crate::scan::IndexedPattern;

/// One constraint line split on its relational operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConstraint {
    /// 1-based line number in the original text.
    pub line: usize,
    /// The canonicalized line.
    pub raw: String,
    pub relation: Relation,
    pub lhs: String,
    pub rhs: String,
}

impl ParsedConstraint {
    /// Splits a single line, or returns `None` if it has no relational operator.
    ///
    /// # Example
    ///
    /// ```
    /// use symforge_core::Relation;
    /// use symforge_symbolic::ParsedConstraint;
    ///
    /// let parsed = ParsedConstraint::parse(1, "x[0] >= 0.").unwrap();
    /// assert_eq!(parsed.relation, Relation::Gt);
    /// assert_eq!(parsed.lhs, "x[0]");
    /// assert_eq!(parsed.rhs, "0.");
    ///
    /// assert!(ParsedConstraint::parse(2, "x[0] + 1").is_none());
    /// ```
    pub fn parse(line: usize, text: &str) -> Option<Self> {
        Relation::SEARCH_ORDER.iter().find_map(|&relation| {
            let symbol = relation.symbol();
            let first = text.find(symbol)?;
            let last = text.rfind(symbol)?;
            Some(Self {
                line,
                raw: text.to_string(),
                relation,
                lhs: text[..first].trim_end_matches('=').trim().to_string(),
                rhs: text[last + 1..].trim_start_matches('=').trim().to_string(),
            })
        })
    }
}

/// A line that was left out of the compiled output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number in the original text.
    pub line: usize,
    pub text: String,
}

impl From<&MalformedLine> for SymbolicError {
    fn from(m: &MalformedLine) -> Self {
        SymbolicError::MalformedConstraint {
            line: m.line,
            text: m.text.clone(),
        }
    }
}

/// Fails on the first rejected line in strict mode.
pub(crate) fn enforce(rejected: &[MalformedLine], mode: ParseMode) -> Result<()> {
    match (mode, rejected.first()) {
        (ParseMode::Strict, Some(first)) => Err(first.into()),
        _ => Ok(()),
    }
}

/// Constraint text rewritten to indexed point access.
#[derive(Debug)]
pub(crate) struct Canonical {
    pub lines: Vec<(usize, String)>,
    pub ndim: usize,
}

/// Rewrites every variable to `x[i]` and drops blank lines.
///
/// The dimensionality is `nvars` when given, else the length of the name
/// list, else `max index + 1` over the indexed variables in the text.
pub(crate) fn canonicalize(
    text: &str,
    variables: &VariableScheme,
    nvars: Option<usize>,
) -> Canonical {
    let (marked, base, ndim) = match variables.truncated(nvars) {
        VariableScheme::Names(names) => {
            let marked = replace_variables(text, &names, &VariableScheme::Base(DEFAULT_MARKER.into()));
            (marked, DEFAULT_MARKER.to_string(), names.len())
        }
        VariableScheme::Base(base) => {
            let ndim = inferred_dimension(text, &base);
            (text.to_string(), base, ndim)
        }
    };
    let ndim = nvars.unwrap_or(ndim);
    let pattern = IndexedPattern::new(&base);

    let lines = marked
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let fixed = match &pattern {
                Some(pattern) => pattern.substitute(line, |idx| (idx < ndim).then(|| format!("x[{idx}]"))),
                None => line.to_string(),
            };
            (i + 1, fixed.trim().to_string())
        })
        .collect();

    Canonical { lines, ndim }
}

/// Splits canonical lines, applying `rewrite` to each line before the split.
pub(crate) fn split_lines<F>(
    canonical: &Canonical,
    rewrite: F,
) -> (Vec<ParsedConstraint>, Vec<MalformedLine>)
where
    F: Fn(&str) -> String,
{
    let mut parsed = Vec::new();
    let mut rejected = Vec::new();
    for (line, text) in &canonical.lines {
        let text = rewrite(text);
        match ParsedConstraint::parse(*line, &text) {
            Some(constraint) => parsed.push(constraint),
            None => {
                warn!(event = "malformed_line", line = *line, text = %text, "invalid constraint");
                rejected.push(MalformedLine { line: *line, text });
            }
        }
    }
    (parsed, rejected)
}
