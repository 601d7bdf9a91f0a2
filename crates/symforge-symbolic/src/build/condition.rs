//! Compiled condition functions.

use std::fmt;
use std::sync::Arc;

use symforge_core::ConditionKind;
use tracing::{debug, warn};

use crate::env::Environment;
use crate::error::{Result, SymbolicError};
use crate::eval::{eval_expr, EvalContext};
use crate::expr::{Expr, Shape};
use crate::jit::{self, JitError, JitFn};
use crate::parse::parse_expr;

/// A compiled penalty-form expression `f(point) -> scalar`.
///
/// An inequality condition holds when its value is `<= 0`, an equality
/// condition when it is `== 0`. Cloning is cheap; the tree and native code
/// are shared.
#[derive(Debug, Clone)]
pub struct Condition {
    text: String,
    kind: ConditionKind,
    expr: Arc<Expr>,
    jit: Option<Arc<JitFn>>,
}

impl Condition {
    /// Compiles one penalty-form expression.
    ///
    /// # Errors
    ///
    /// `Compile` when the text does not parse, references an unbound name,
    /// or evaluates to a vector.
    pub fn compile(
        text: &str,
        kind: ConditionKind,
        env: &Environment,
        ndim: Option<usize>,
    ) -> Result<Self> {
        let expr = parse_expr(text, env, ndim)?;
        if expr.shape() == Shape::Vector {
            return Err(SymbolicError::compile(text, "a condition must evaluate to a scalar"));
        }
        debug!(event = "condition_compiled", kind = %kind, expression = text);
        Ok(Self {
            text: text.to_string(),
            kind,
            expr: Arc::new(expr),
            jit: None,
        })
    }

    /// Attaches native code when the expression is JIT-compilable.
    ///
    /// Conditions that cannot be compiled keep running on the interpreter.
    pub fn with_jit(mut self) -> Self {
        match jit::compile(&self.expr) {
            Ok(native) => self.jit = Some(Arc::new(native)),
            Err(JitError::Unsupported(reason)) => {
                debug!(event = "jit_skipped", expression = %self.text, reason = %reason);
            }
            Err(e) => {
                warn!(event = "jit_failed", expression = %self.text, error = %e);
            }
        }
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ConditionKind {
        self.kind
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn is_jitted(&self) -> bool {
        self.jit.is_some()
    }

    /// Evaluates the condition, surfacing projection failures.
    pub fn try_evaluate(&self, point: &[f64]) -> Result<f64> {
        if let Some(value) = self.jit.as_ref().and_then(|native| native.call(point)) {
            return Ok(value);
        }
        let value = eval_expr(&self.expr, &EvalContext::new(point))?;
        Ok(value.as_scalar().unwrap_or(f64::NAN))
    }

    /// Evaluates the condition; a failed evaluation reads as NaN.
    pub fn evaluate(&self, point: &[f64]) -> f64 {
        self.try_evaluate(point).unwrap_or(f64::NAN)
    }

    /// Whether the condition holds at `point` within `tolerance`.
    pub fn is_satisfied(&self, point: &[f64], tolerance: f64) -> bool {
        self.kind.is_satisfied(self.evaluate(point), tolerance)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Conditions compiled from one constraint text, split by kind.
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    pub inequalities: Vec<Condition>,
    pub equalities: Vec<Condition>,
}

impl Conditions {
    /// Inequalities first, then equalities, each in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.inequalities.iter().chain(&self.equalities)
    }

    pub fn len(&self) -> usize {
        self.inequalities.len() + self.equalities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every condition holds at `point` within `tolerance`.
    pub fn is_satisfied(&self, point: &[f64], tolerance: f64) -> bool {
        self.iter().all(|c| c.is_satisfied(point, tolerance))
    }

    pub fn into_vec(self) -> Vec<Condition> {
        let mut all = self.inequalities;
        all.extend(self.equalities);
        all
    }
}
