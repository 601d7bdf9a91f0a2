//! Lexer: tokenizes one normalized expression or assignment.

use std::fmt;

use crate::error::{Result, SymbolicError};

/// A token produced by the lexer
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// The raw text of the token
    pub text: String,
    /// Byte offset in the input
    pub offset: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Identifier,
    Number,

    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Assign,

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Colon,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::Number => write!(f, "number"),
            Self::Plus => write!(f, "`+`"),
            Self::Minus => write!(f, "`-`"),
            Self::Star => write!(f, "`*`"),
            Self::StarStar => write!(f, "`**`"),
            Self::Slash => write!(f, "`/`"),
            Self::Percent => write!(f, "`%`"),
            Self::Assign => write!(f, "`=`"),
            Self::OpenParen => write!(f, "`(`"),
            Self::CloseParen => write!(f, "`)`"),
            Self::OpenBracket => write!(f, "`[`"),
            Self::CloseBracket => write!(f, "`]`"),
            Self::Comma => write!(f, "`,`"),
            Self::Colon => write!(f, "`:`"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenize the entire input, ending with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.input.len() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    text: String::new(),
                    offset: self.pos,
                });
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Err(SymbolicError::compile(self.input, "unexpected end of input"));
        };

        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' if self.peek_second() == Some('*') => {
                self.pos += 1;
                TokenKind::StarStar
            }
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => TokenKind::Assign,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenBracket,
            ']' => TokenKind::CloseBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            c if c.is_ascii_digit() => return Ok(self.number(start)),
            '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                return Ok(self.number(start))
            }
            c if c.is_alphabetic() || c == '_' => return Ok(self.identifier(start)),
            c => {
                return Err(SymbolicError::compile(
                    self.input,
                    format!("unexpected character `{c}` at offset {start}"),
                ))
            }
        };
        self.pos += 1;
        Ok(Token {
            kind,
            text: self.input[start..self.pos].to_string(),
            offset: start,
        })
    }

    fn take_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    /// `digits [. digits] [(e|E) [+|-] digits]`, also `.5` and `5.`
    fn number(&mut self, start: usize) -> Token {
        self.take_digits();
        if self.peek() == Some('.') {
            self.pos += 1;
            self.take_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.take_digits();
            } else {
                // `2e` is a number followed by an identifier
                self.pos = mark;
            }
        }
        Token {
            kind: TokenKind::Number,
            text: self.input[start..self.pos].to_string(),
            offset: start,
        }
    }

    fn identifier(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            self.pos += c.len_utf8();
        }
        Token {
            kind: TokenKind::Identifier,
            text: self.input[start..self.pos].to_string(),
            offset: start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_power_is_one_token() {
        use TokenKind::*;
        assert_eq!(
            kinds("x[0]**2 * 3"),
            vec![Identifier, OpenBracket, Number, CloseBracket, StarStar, Number, Star, Number, Eof]
        );
    }

    #[test]
    fn test_number_forms() {
        let tokens = Lexer::new("0. .5 1e-3 2E+2 7").tokenize().unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["0.", ".5", "1e-3", "2E+2", "7", ""]);
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("x[0] & 1").tokenize().unwrap_err();
        assert!(matches!(err, SymbolicError::Compile { .. }));
    }
}
