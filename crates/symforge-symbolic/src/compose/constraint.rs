//! Constraint (repair) composition.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, info};

use super::Kinds;
use crate::build::Solver;
use crate::error::Result;

/// How a solver is coupled to the pipeline built before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CouplingKind {
    /// The solver is wrapped inside the pipeline: it runs before every
    /// previously added solver.
    #[default]
    Inner,
    /// The pipeline is wrapped inside the solver: it runs after every
    /// previously added solver.
    Outer,
}

impl CouplingKind {
    pub fn name(self) -> &'static str {
        match self {
            CouplingKind::Inner => "inner",
            CouplingKind::Outer => "outer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "inner" => Some(CouplingKind::Inner),
            "outer" => Some(CouplingKind::Outer),
            _ => None,
        }
    }
}

impl fmt::Display for CouplingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `(kind, solver)` pair of a constraint function.
#[derive(Debug, Clone)]
pub struct ConstraintStep {
    pub kind: CouplingKind,
    pub solver: Solver,
}

/// A composed repair function `constraint(point) -> point'`.
///
/// Steps are kept in declaration order; `order` lists them in execution
/// order.
#[derive(Debug, Clone)]
pub struct ConstraintFunction {
    steps: Vec<ConstraintStep>,
    order: Vec<usize>,
}

impl ConstraintFunction {
    fn new(steps: Vec<ConstraintStep>) -> Self {
        let mut order = VecDeque::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            match step.kind {
                CouplingKind::Inner => order.push_front(i),
                CouplingKind::Outer => order.push_back(i),
            }
        }
        Self {
            steps,
            order: order.into(),
        }
    }

    /// Repairs a copy of `point`. Steps that cannot be applied are skipped.
    pub fn apply(&self, point: &[f64]) -> Vec<f64> {
        let mut repaired = point.to_vec();
        for step in self.execution_order() {
            if let Err(e) = step.solver.apply_in_place(&mut repaired) {
                debug!(event = "solver_skipped", expression = %step.solver, error = %e);
            }
        }
        repaired
    }

    /// Repairs a copy of `point`, stopping at the first failing step.
    pub fn try_apply(&self, point: &[f64]) -> Result<Vec<f64>> {
        let mut repaired = point.to_vec();
        for step in self.execution_order() {
            step.solver.apply_in_place(&mut repaired)?;
        }
        Ok(repaired)
    }

    /// Steps in the order they run.
    pub fn execution_order(&self) -> impl Iterator<Item = &ConstraintStep> {
        self.order.iter().map(|&i| &self.steps[i])
    }

    /// Steps in declaration order.
    pub fn steps(&self) -> &[ConstraintStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for ConstraintFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", step.kind, step.solver)?;
        }
        Ok(())
    }
}

/// Combines solvers into one constraint function.
///
/// Conflicting solvers are not detected: a later step may undo what an
/// earlier one imposed.
///
/// # Example
///
/// ```
/// use symforge_config::CompilerConfig;
/// use symforge_symbolic::{build_solvers, compose_constraint, Kinds};
///
/// let config = CompilerConfig::default().with_nvars(3);
/// let solvers = build_solvers("x2 = x0/2.\nx0 >= 0.", &config).unwrap();
/// let constraint = compose_constraint(&solvers, &Kinds::Default).unwrap();
///
/// assert_eq!(constraint.apply(&[-1.0, 2.0, -3.0]), vec![0.0, 2.0, 0.0]);
/// assert_eq!(constraint.apply(&[1.0, 2.0, 3.0]), vec![1.0, 2.0, 0.5]);
/// ```
pub fn compose_constraint(
    solvers: &[Solver],
    kinds: &Kinds<CouplingKind>,
) -> Result<ConstraintFunction> {
    let kinds = kinds.resolve(solvers.len(), |_| CouplingKind::default())?;
    let steps: Vec<ConstraintStep> = kinds
        .into_iter()
        .zip(solvers.iter().cloned())
        .map(|(kind, solver)| ConstraintStep { kind, solver })
        .collect();

    let constraint = ConstraintFunction::new(steps);
    info!(event = "constraint_composed", steps = constraint.len());
    Ok(constraint)
}
