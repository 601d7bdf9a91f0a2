//! Compiled repair (solver) functions.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::env::Environment;
use crate::error::Result;
use crate::eval::apply_statement;
use crate::expr::Statement;
use crate::parse::parse_statement;

/// A compiled solver-form assignment `g(point) -> point'`.
#[derive(Debug, Clone)]
pub struct Solver {
    text: String,
    statement: Arc<Statement>,
}

impl Solver {
    /// Compiles one solver-form assignment.
    pub fn compile(text: &str, env: &Environment, ndim: Option<usize>) -> Result<Self> {
        let statement = parse_statement(text, env, ndim)?;
        debug!(event = "solver_compiled", expression = text);
        Ok(Self {
            text: text.to_string(),
            statement: Arc::new(statement),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Repairs `point` in place. On error the point is unchanged.
    pub fn apply_in_place(&self, point: &mut [f64]) -> Result<()> {
        apply_statement(&self.statement, point)
    }

    /// Returns the repaired copy of `point`, surfacing projection failures.
    pub fn try_apply(&self, point: &[f64]) -> Result<Vec<f64>> {
        let mut repaired = point.to_vec();
        self.apply_in_place(&mut repaired)?;
        Ok(repaired)
    }

    /// Returns the repaired copy of `point`.
    ///
    /// A step that cannot be applied (an impossible projection) returns the
    /// point unchanged.
    pub fn apply(&self, point: &[f64]) -> Vec<f64> {
        let mut repaired = point.to_vec();
        if let Err(e) = self.apply_in_place(&mut repaired) {
            debug!(event = "solver_skipped", expression = %self.text, error = %e);
        }
        repaired
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
