//! Collision-safe renaming of surface variable names.
//!
//! Names are substituted longest first. Every substitution splits the
//! remaining plain text around the matched name, so text produced by an
//! earlier substitution is never matched again: a canonical marker can not
//! be corrupted by a later, shorter name even when the requested marker is
//! itself one of the surface names.
//!
//! A surface name that also occurs inside a function name or keyword (`x`
//! inside `max`) is still replaced there; callers must avoid such names.

use symforge_core::VariableScheme;
use tracing::debug;

/// Default marker base, chosen because it is never part of an identifier.
pub const DEFAULT_MARKER: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    Var(usize),
}

/// Splits `text` into plain text and variable occurrences.
///
/// `Var(i)` refers to `variables[i]`.
pub(crate) fn segment<'a, S: AsRef<str>>(text: &'a str, variables: &[S]) -> Vec<Segment<'a>> {
    let mut order: Vec<usize> = (0..variables.len())
        .filter(|&i| !variables[i].as_ref().is_empty())
        .collect();
    // stable: equal lengths keep declaration order
    order.sort_by(|&a, &b| variables[b].as_ref().len().cmp(&variables[a].as_ref().len()));

    let mut segments = vec![Segment::Text(text)];
    for idx in order {
        let name = variables[idx].as_ref();
        let mut next = Vec::with_capacity(segments.len());
        for seg in segments {
            match seg {
                Segment::Text(plain) => {
                    let mut last = 0;
                    for (start, _) in plain.match_indices(name) {
                        if start > last {
                            next.push(Segment::Text(&plain[last..start]));
                        }
                        next.push(Segment::Var(idx));
                        last = start + name.len();
                    }
                    if last < plain.len() {
                        next.push(Segment::Text(&plain[last..]));
                    }
                }
                var => next.push(var),
            }
        }
        segments = next;
    }
    segments
}

/// Replaces each surface name in `text` with its marker.
///
/// With a base marker the `i`-th name becomes `<marker><i>`; with a list of
/// markers it becomes `markers[i]` (names without a marker are left as they
/// are).
///
/// # Example
///
/// ```
/// use symforge_symbolic::replace_variables;
///
/// let text = replace_variables("spam + eggs - 42", &["spam", "eggs"], &"x".into());
/// assert_eq!(text, "x0 + x1 - 42");
///
/// let markers = symforge_core::VariableScheme::names(["x", "y", "z"]);
/// let text = replace_variables("min(x1*x2) - sin(x3)", &["x1", "x2", "x3"], &markers);
/// assert_eq!(text, "min(x*y) - sin(z)");
/// ```
pub fn replace_variables<S: AsRef<str>>(
    text: &str,
    variables: &[S],
    markers: &VariableScheme,
) -> String {
    if let VariableScheme::Base(marker) = markers {
        if variables.iter().any(|v| v.as_ref() == marker) {
            debug!(
                marker = %marker,
                "marker collides with a surface variable name; substituting in isolation"
            );
        }
    }

    let mut out = String::with_capacity(text.len());
    for seg in segment(text, variables) {
        match seg {
            Segment::Text(plain) => out.push_str(plain),
            Segment::Var(idx) => match markers {
                VariableScheme::Base(marker) => {
                    out.push_str(marker);
                    out.push_str(&idx.to_string());
                }
                VariableScheme::Names(names) => match names.get(idx) {
                    Some(name) => out.push_str(name),
                    None => out.push_str(variables[idx].as_ref()),
                },
            },
        }
    }
    out
}
