//! Extraction of the variables referenced by constraint text.

use std::collections::BTreeSet;

use symforge_core::VariableScheme;

use crate::rename::{segment, Segment};
use crate::scan::IndexedPattern;

/// Returns the distinct variables referenced by `text`.
///
/// With a base scheme, every `<base><digits>` token is returned once, in
/// first-seen order. With an explicit name list, the names that occur in the
/// text are returned in list (index) order.
///
/// # Example
///
/// ```
/// use symforge_core::VariableScheme;
/// use symforge_symbolic::get_variables;
///
/// let text = "x1 + x2 = x3*4\nx3 = x2*x4";
/// assert_eq!(get_variables(text, &VariableScheme::default()), ["x1", "x2", "x3", "x4"]);
///
/// let text = "y = min(u,v) - z*x\nz = x**2 + 1.0\nu = v*z";
/// let names = VariableScheme::names("pqrstuvwxyz".chars().map(String::from));
/// assert_eq!(get_variables(text, &names), ["u", "v", "x", "y", "z"]);
/// ```
pub fn get_variables(text: &str, scheme: &VariableScheme) -> Vec<String> {
    match scheme {
        VariableScheme::Base(base) => {
            let mut found: Vec<String> = Vec::new();
            let Some(pattern) = IndexedPattern::new(base) else {
                return found;
            };
            for line in text.lines() {
                for token in pattern.tokens(line) {
                    let name = &line[token.span];
                    if !found.iter().any(|f| f == name) {
                        found.push(name.to_string());
                    }
                }
            }
            found
        }
        VariableScheme::Names(names) => referenced_indices(text, names)
            .into_iter()
            .map(|i| names[i].clone())
            .collect(),
    }
}

/// Indices into `names` of the names that occur in `text`, ascending.
pub(crate) fn referenced_indices(text: &str, names: &[String]) -> BTreeSet<usize> {
    segment(text, names)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Var(i) => Some(i),
            Segment::Text(_) => None,
        })
        .collect()
}

/// Dimensionality implied by the indexed variables in `text`: `max index + 1`.
///
/// An index of `usize::MAX` has no representable dimension and is ignored.
pub(crate) fn inferred_dimension(text: &str, base: &str) -> usize {
    let Some(pattern) = IndexedPattern::new(base) else {
        return 0;
    };
    text.lines()
        .flat_map(|line| pattern.tokens(line))
        .filter_map(|token| token.index.checked_add(1))
        .max()
        .unwrap_or(0)
}
