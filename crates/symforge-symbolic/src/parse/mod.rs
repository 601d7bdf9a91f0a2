//! Recursive descent parser for normalized constraint expressions.
//!
//! Precedence: `**` binds tightest and is right-associative
//! (its exponent may carry a unary sign, and `-a**b` is `-(a**b)`), then
//! unary `+`/`-`, then `* / %`, then `+ -`. The only indexable name is the
//! point `x`; indices and slice bounds are non-negative integer literals.
//! Shapes are checked while the tree is built, so arithmetic between two
//! vectors or a vector-valued condition never reaches evaluation.

mod lexer;

#[cfg(test)]
mod tests;

use crate::env::Environment;
use crate::error::{Result, SymbolicError};
use crate::expr::{Expr, Function, Shape, Statement, Target};
use lexer::{Lexer, Token, TokenKind};

/// Name of the point inside compiled expressions.
pub const POINT: &str = "x";

/// Parses a single expression such as `-(x[0] - (0.))`.
///
/// `ndim`, when given, bounds the indices accepted in `x[i]`.
pub fn parse_expr(text: &str, env: &Environment, ndim: Option<usize>) -> Result<Expr> {
    let mut parser = Parser::new(text, env, ndim)?;
    let expr = parser.parse_sum()?;
    parser.expect(TokenKind::Eof)?;
    Ok(expr)
}

/// Parses an assignment such as `x[0] = max(0., x[0])`.
pub fn parse_statement(text: &str, env: &Environment, ndim: Option<usize>) -> Result<Statement> {
    let mut parser = Parser::new(text, env, ndim)?;
    let lhs = parser.parse_sum()?;
    parser.expect(TokenKind::Assign)?;
    let value = parser.parse_sum()?;
    parser.expect(TokenKind::Eof)?;

    let target = match lhs {
        Expr::Var(i) => Target::Index(i),
        Expr::Point => Target::Whole,
        Expr::Slice { start, end } => Target::Slice { start, end },
        Expr::List(items) => {
            let indices = items
                .iter()
                .map(|item| match item {
                    Expr::Var(i) => Some(*i),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| parser.error("only indexed variables can be assigned in a list"))?;
            Target::Indices(indices)
        }
        _ => return Err(parser.error("left-hand side is not assignable")),
    };
    if target.shape() == Shape::Scalar && value.shape() == Shape::Vector {
        return Err(parser.error("cannot assign a vector to a single variable"));
    }
    Ok(Statement { target, value })
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    env: &'a Environment,
    ndim: Option<usize>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, env: &'a Environment, ndim: Option<usize>) -> Result<Self> {
        Ok(Self {
            source,
            tokens: Lexer::new(source).tokenize()?,
            pos: 0,
            env,
            ndim,
        })
    }

    fn parse_sum(&mut self) -> Result<Expr> {
        let mut expr = self.parse_term()?;
        while matches!(self.peek_kind(), TokenKind::Plus | TokenKind::Minus) {
            let op = self.advance().kind;
            let rhs = self.parse_term()?;
            expr = self.binary(op, expr, rhs)?;
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut expr = self.parse_unary()?;
        while matches!(
            self.peek_kind(),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent
        ) {
            let op = self.advance().kind;
            let rhs = self.parse_unary()?;
            expr = self.binary(op, expr, rhs)?;
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        match self.peek_kind() {
            TokenKind::Minus => {
                self.advance();
                Ok(-self.parse_unary()?)
            }
            TokenKind::Plus => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        if self.check(TokenKind::StarStar) {
            self.advance();
            let exponent = self.parse_unary()?;
            return self.binary(TokenKind::StarStar, base, exponent);
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.advance().clone();
        match token.kind {
            TokenKind::Number => token
                .text
                .parse::<f64>()
                .map(Expr::Literal)
                .map_err(|_| self.error(format!("invalid number `{}`", token.text))),
            TokenKind::OpenParen => {
                let expr = self.parse_sum()?;
                self.expect(TokenKind::CloseParen)?;
                Ok(expr)
            }
            TokenKind::OpenBracket => self.parse_list(),
            TokenKind::Identifier if self.check(TokenKind::OpenParen) => self.parse_call(&token.text),
            TokenKind::Identifier if token.text == POINT => {
                if self.check(TokenKind::OpenBracket) {
                    self.advance();
                    self.parse_subscript()
                } else {
                    Ok(Expr::Point)
                }
            }
            TokenKind::Identifier => match self.env.constant(&token.text) {
                Some(value) => Ok(Expr::Literal(value)),
                None if Function::from_name(&token.text).is_some() => {
                    Err(self.error(format!("function `{}` must be called", token.text)))
                }
                None => Err(self.error(format!("unknown name `{}`", token.text))),
            },
            TokenKind::Eof => Err(self.error("unexpected end of input")),
            kind => Err(self.error(format!("unexpected {kind} at offset {}", token.offset))),
        }
    }

    /// After `[`: a list of scalar expressions.
    fn parse_list(&mut self) -> Result<Expr> {
        let mut items = Vec::new();
        if !self.check(TokenKind::CloseBracket) {
            loop {
                let item = self.parse_sum()?;
                if item.shape() == Shape::Vector {
                    return Err(self.error("list items must be scalars"));
                }
                items.push(item);
                if !self.check(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.expect(TokenKind::CloseBracket)?;
        Ok(Expr::List(items))
    }

    /// After `x[`: an index or a slice.
    fn parse_subscript(&mut self) -> Result<Expr> {
        let start = self.optional_index()?;
        if self.check(TokenKind::Colon) {
            self.advance();
            let end = self.optional_index()?;
            self.expect(TokenKind::CloseBracket)?;
            return Ok(Expr::Slice { start, end });
        }
        self.expect(TokenKind::CloseBracket)?;
        let index = start.ok_or_else(|| self.error("empty subscript"))?;
        if let Some(ndim) = self.ndim.filter(|&n| index >= n) {
            return Err(self.error(format!(
                "variable index {index} out of range for {ndim} variables"
            )));
        }
        Ok(Expr::Var(index))
    }

    fn optional_index(&mut self) -> Result<Option<usize>> {
        if !self.check(TokenKind::Number) {
            return Ok(None);
        }
        let token = self.advance().clone();
        token
            .text
            .parse::<usize>()
            .map(Some)
            .map_err(|_| self.error(format!("index `{}` is not a non-negative integer", token.text)))
    }

    /// After a function name, with `(` next.
    fn parse_call(&mut self, name: &str) -> Result<Expr> {
        let function = Function::from_name(name)
            .ok_or_else(|| self.error(format!("unknown function `{name}`")))?;
        self.expect(TokenKind::OpenParen)?;
        let mut args = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                args.push(self.parse_sum()?);
                if !self.check(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.expect(TokenKind::CloseParen)?;

        let arity = function.arity();
        if !arity.accepts(args.len()) {
            return Err(self.error(format!(
                "`{function}` takes {arity}, found {}",
                args.len()
            )));
        }
        let vectors = args.iter().filter(|a| a.shape() == Shape::Vector).count();
        if function.is_projector() && args[0].shape() == Shape::Vector {
            return Err(self.error(format!("the target of `{function}` must be a scalar")));
        }
        if !function.is_aggregate() && !function.is_projector() && vectors > 1 {
            return Err(self.error(format!(
                "`{function}` cannot combine two vectors elementwise"
            )));
        }
        Ok(Expr::call(function, args))
    }

    fn binary(&self, op: TokenKind, lhs: Expr, rhs: Expr) -> Result<Expr> {
        if lhs.shape() == Shape::Vector && rhs.shape() == Shape::Vector {
            return Err(self.error(format!("{op} between two vectors is not supported")));
        }
        Ok(match op {
            TokenKind::Plus => lhs + rhs,
            TokenKind::Minus => lhs - rhs,
            TokenKind::Star => lhs * rhs,
            TokenKind::Slash => lhs / rhs,
            TokenKind::Percent => lhs % rhs,
            TokenKind::StarStar => Expr::pow(lhs, rhs),
            other => return Err(self.error(format!("{other} is not a binary operator"))),
        })
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> &Token {
        let idx = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self.peek();
            let message = match found.kind {
                TokenKind::Eof => format!("expected {kind}, found end of input"),
                _ => format!("expected {kind}, found `{}` at offset {}", found.text, found.offset),
            };
            Err(self.error(message))
        }
    }

    fn error(&self, message: impl Into<String>) -> SymbolicError {
        SymbolicError::compile(self.source, message)
    }
}
