//! Variable naming schemes.
//!
//! A constraint system refers to the components of a candidate point either
//! through indexed names sharing a common base (`x0`, `x1`, ...) or through an
//! explicit, ordered list of surface names (`spam`, `eggs`, ...).

use std::fmt;

/// How variables are named in constraint text.
///
/// # Example
///
/// ```
/// use symforge_core::VariableScheme;
///
/// let scheme = VariableScheme::default();
/// assert_eq!(scheme.base(), Some("x"));
///
/// let named = VariableScheme::names(["spam", "eggs", "ham"]);
/// assert_eq!(named.base(), None);
/// assert_eq!(named.truncated(Some(2)).to_string(), "[spam, eggs]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum VariableScheme {
    /// Indexed names `<base><index>`.
    Base(String),
    /// One explicit name per position.
    Names(Vec<String>),
}

impl Default for VariableScheme {
    fn default() -> Self {
        VariableScheme::Base("x".to_string())
    }
}

impl VariableScheme {
    /// Creates a scheme from an ordered list of names.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        VariableScheme::Names(names.into_iter().map(Into::into).collect())
    }

    /// Returns the base string for indexed schemes.
    pub fn base(&self) -> Option<&str> {
        match self {
            VariableScheme::Base(base) => Some(base),
            VariableScheme::Names(_) => None,
        }
    }

    /// Truncates an explicit name list to its first `nvars` names.
    pub fn truncated(&self, nvars: Option<usize>) -> VariableScheme {
        match (self, nvars) {
            (VariableScheme::Names(names), Some(n)) if n < names.len() => {
                VariableScheme::Names(names[..n].to_vec())
            }
            _ => self.clone(),
        }
    }
}

impl From<&str> for VariableScheme {
    fn from(base: &str) -> Self {
        VariableScheme::Base(base.to_string())
    }
}

impl From<Vec<String>> for VariableScheme {
    fn from(names: Vec<String>) -> Self {
        VariableScheme::Names(names)
    }
}

impl fmt::Display for VariableScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableScheme::Base(base) => write!(f, "{base}<i>"),
            VariableScheme::Names(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_names() {
        let scheme = VariableScheme::names(["a", "b", "c"]);
        assert_eq!(scheme.truncated(Some(2)), VariableScheme::names(["a", "b"]));
        assert_eq!(scheme.truncated(Some(5)), scheme);
        assert_eq!(scheme.truncated(None), scheme);
    }

    #[test]
    fn test_base_is_not_truncated() {
        let scheme = VariableScheme::default();
        assert_eq!(scheme.truncated(Some(1)), scheme);
    }

    #[test]
    fn test_display() {
        assert_eq!(VariableScheme::default().to_string(), "x<i>");
        assert_eq!(VariableScheme::names(["u", "v"]).to_string(), "[u, v]");
    }
}
