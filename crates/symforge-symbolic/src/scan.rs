//! Token-level text scanning shared by the renamer, extractor and normalizers.

use std::ops::Range;

use regex::{Captures, Regex};

/// An occurrence of `<base><digits>` in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexedToken {
    pub span: Range<usize>,
    pub index: usize,
}

/// Matcher for `<base><digits>` tokens of one variable base.
#[derive(Debug, Clone)]
pub(crate) struct IndexedPattern {
    re: Regex,
}

impl IndexedPattern {
    /// Returns `None` for an empty base, which names no variables.
    pub fn new(base: &str) -> Option<Self> {
        if base.is_empty() {
            return None;
        }
        let re = Regex::new(&format!("{}([0-9]+)", regex::escape(base))).ok()?;
        Some(Self { re })
    }

    /// Every token in `text`, consuming the longest digit run.
    ///
    /// Tokens whose digit run overflows `usize` are skipped.
    pub fn tokens<'t>(&'t self, text: &'t str) -> impl Iterator<Item = IndexedToken> + 't {
        self.re.captures_iter(text).filter_map(|caps| {
            let index = caps[1].parse::<usize>().ok()?;
            Some(IndexedToken {
                span: caps.get(0)?.range(),
                index,
            })
        })
    }

    /// Replaces the tokens for which `replace` returns a value.
    pub fn substitute<F>(&self, text: &str, mut replace: F) -> String
    where
        F: FnMut(usize) -> Option<String>,
    {
        self.re
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| replace(index))
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// A table of call renames `from(` to `to(`, applied in one pass.
#[derive(Debug, Clone)]
pub(crate) struct CallAliases {
    re: Regex,
    renames: &'static [(&'static str, &'static str)],
}

impl CallAliases {
    pub fn new(renames: &'static [(&'static str, &'static str)]) -> Result<Self, regex::Error> {
        let names = renames
            .iter()
            .map(|(from, _)| regex::escape(from))
            .collect::<Vec<_>>()
            .join("|");
        let re = Regex::new(&format!(r"\b({names})\("))?;
        Ok(Self { re, renames })
    }

    /// Renames calls whose name starts an identifier.
    pub fn apply(&self, text: &str) -> String {
        self.re
            .replace_all(text, |caps: &Captures| {
                let name = &caps[1];
                let to = self
                    .renames
                    .iter()
                    .find(|(from, _)| *from == name)
                    .map_or(name, |(_, to)| *to);
                format!("{to}(")
            })
            .into_owned()
    }
}

/// If `text` is exactly one call `name(args)` with a name from `names`,
/// returns the name and the argument text.
pub(crate) fn whole_call<'a>(text: &'a str, names: &[&'static str]) -> Option<(&'static str, &'a str)> {
    let text = text.trim();
    let open = text.find('(')?;
    let name = names.iter().find(|n| text[..open].trim_end() == **n)?;
    if !text.ends_with(')') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && open + i != text.len() - 1 {
                    return None;
                }
            }
            _ => {}
        }
    }
    Some((name, text[open + 1..text.len() - 1].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_tokens_longest_digit_run() {
        let pattern = IndexedPattern::new("x").unwrap();
        let tokens: Vec<_> = pattern.tokens("x1 + x10 - x").collect();
        assert_eq!(
            tokens,
            vec![
                IndexedToken { span: 0..2, index: 1 },
                IndexedToken { span: 5..8, index: 10 },
            ]
        );
    }

    #[test]
    fn test_indexed_tokens_multichar_base() {
        let pattern = IndexedPattern::new("$").unwrap();
        let tokens: Vec<_> = pattern.tokens("$0*$12").collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].index, 12);
        assert!(IndexedPattern::new("").is_none());
    }

    #[test]
    fn test_indexed_tokens_base_is_literal() {
        let pattern = IndexedPattern::new("a.").unwrap();
        let tokens: Vec<_> = pattern.tokens("ab1 + a.2").collect();
        assert_eq!(tokens, vec![IndexedToken { span: 6..9, index: 2 }]);
    }

    #[test]
    fn test_indexed_tokens_skip_overflowing_index() {
        let pattern = IndexedPattern::new("x").unwrap();
        let text = "x99999999999999999999999 + x3";
        let tokens: Vec<_> = pattern.tokens(text).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].index, 3);
    }

    #[test]
    fn test_substitute_indexed_skips_unmapped() {
        let pattern = IndexedPattern::new("x").unwrap();
        let out = pattern.substitute("x0 + x1 + x7", |i| (i < 2).then(|| format!("x[{i}]")));
        assert_eq!(out, "x[0] + x[1] + x7");
    }

    #[test]
    fn test_rename_calls_respects_identifier_start() {
        let aliases = CallAliases::new(&[("mean", "average"), ("variance", "var")]).unwrap();
        let out = aliases.apply("mean(x) + impose_mean(1, x) + variance(x) + 2mean(x)");
        assert_eq!(out, "average(x) + impose_mean(1, x) + var(x) + 2mean(x)");
    }

    #[test]
    fn test_rename_calls_single_pass() {
        let aliases = CallAliases::new(&[("ptp", "spread"), ("spread", "ptp")]).unwrap();
        assert_eq!(aliases.apply("ptp(x) - spread(x)"), "spread(x) - ptp(x)");
    }

    #[test]
    fn test_whole_call() {
        let names = ["mean", "sum"];
        assert_eq!(whole_call("mean(x)", &names), Some(("mean", "x")));
        assert_eq!(
            whole_call(" sum( x[0:2] ) ", &names),
            Some(("sum", "x[0:2]"))
        );
        assert_eq!(whole_call("mean(x) + mean(x)", &names), None);
        assert_eq!(whole_call("2*mean(x)", &names), None);
        assert_eq!(whole_call("spread(x)", &names), None);
    }
}
