//! Penalty composition.

use std::fmt;

use symforge_config::PenaltyConfig;
use symforge_core::ConditionKind;
use tracing::info;

use super::Kinds;
use crate::build::Condition;
use crate::error::Result;

/// How a condition value `c` is turned into a non-negative penalty term.
///
/// Equality kinds penalize `c != 0`, inequality kinds penalize `c > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PenaltyKind {
    /// `k * |c|`
    LinearEquality,
    /// `k * c²`
    QuadraticEquality,
    /// `k` when `c != 0`
    UniformEquality,
    /// `k * max(0, c)`
    LinearInequality,
    /// `k * max(0, c)²`
    QuadraticInequality,
    /// `k` when `c > 0`
    UniformInequality,
    /// `-1 / (k * c)` strictly inside the feasible region, `+inf` elsewhere.
    BarrierInequality,
}

impl PenaltyKind {
    pub const ALL: [PenaltyKind; 7] = [
        PenaltyKind::LinearEquality,
        PenaltyKind::QuadraticEquality,
        PenaltyKind::UniformEquality,
        PenaltyKind::LinearInequality,
        PenaltyKind::QuadraticInequality,
        PenaltyKind::UniformInequality,
        PenaltyKind::BarrierInequality,
    ];

    /// Quadratic penalty matching the condition's tag.
    pub fn default_for(kind: ConditionKind) -> Self {
        match kind {
            ConditionKind::Equality => PenaltyKind::QuadraticEquality,
            ConditionKind::Inequality => PenaltyKind::QuadraticInequality,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PenaltyKind::LinearEquality => "linear_equality",
            PenaltyKind::QuadraticEquality => "quadratic_equality",
            PenaltyKind::UniformEquality => "uniform_equality",
            PenaltyKind::LinearInequality => "linear_inequality",
            PenaltyKind::QuadraticInequality => "quadratic_inequality",
            PenaltyKind::UniformInequality => "uniform_inequality",
            PenaltyKind::BarrierInequality => "barrier_inequality",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The condition tag this kind treats as satisfied at zero.
    pub fn condition_kind(self) -> ConditionKind {
        match self {
            PenaltyKind::LinearEquality
            | PenaltyKind::QuadraticEquality
            | PenaltyKind::UniformEquality => ConditionKind::Equality,
            _ => ConditionKind::Inequality,
        }
    }

    /// Penalty term for condition value `c` with multiplier `k`.
    ///
    /// A NaN condition value, such as `sqrt` of a negative number, contributes
    /// nothing to the linear, quadratic and uniform inequality kinds because
    /// `f64::max` drops NaN. [`PenaltyFunction::is_feasible`] still reports such
    /// a point as infeasible. Equality kinds propagate NaN or charge `k`, and the
    /// barrier kind charges infinity.
    pub fn term(self, c: f64, k: f64) -> f64 {
        match self {
            PenaltyKind::LinearEquality => k * c.abs(),
            PenaltyKind::QuadraticEquality => k * c * c,
            PenaltyKind::UniformEquality => {
                if c != 0.0 {
                    k
                } else {
                    0.0
                }
            }
            PenaltyKind::LinearInequality => k * c.max(0.0),
            PenaltyKind::QuadraticInequality => {
                let excess = c.max(0.0);
                k * excess * excess
            }
            PenaltyKind::UniformInequality => {
                if c > 0.0 {
                    k
                } else {
                    0.0
                }
            }
            PenaltyKind::BarrierInequality => {
                if c < 0.0 {
                    -1.0 / (k * c)
                } else {
                    f64::INFINITY
                }
            }
        }
    }
}

impl fmt::Display for PenaltyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `(kind, condition)` pair of a penalty function.
#[derive(Debug, Clone)]
pub struct PenaltyStep {
    pub kind: PenaltyKind,
    pub condition: Condition,
}

/// A composed penalty `penalty(point) -> scalar`: the sum of every step's term.
#[derive(Debug, Clone)]
pub struct PenaltyFunction {
    steps: Vec<PenaltyStep>,
    k: f64,
    h: f64,
}

impl PenaltyFunction {
    pub fn evaluate(&self, point: &[f64]) -> f64 {
        self.steps.iter().fold(0.0, |acc, step| {
            acc + step.kind.term(step.condition.evaluate(point), self.k)
        })
    }

    /// Whether every condition holds at `point` within `tolerance`.
    pub fn is_feasible(&self, point: &[f64], tolerance: f64) -> bool {
        self.steps
            .iter()
            .all(|step| step.condition.is_satisfied(point, tolerance))
    }

    /// The same penalty with its multiplier scaled by `h`.
    pub fn escalate(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            k: self.k * self.h,
            h: self.h,
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.k
    }

    pub fn escalation(&self) -> f64 {
        self.h
    }

    pub fn steps(&self) -> &[PenaltyStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for PenaltyFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", step.kind, step.condition)?;
        }
        Ok(())
    }
}

/// Combines conditions into one penalty function.
///
/// With `Kinds::Default` every inequality condition gets
/// `quadratic_inequality` and every equality condition `quadratic_equality`.
///
/// # Example
///
/// ```
/// use symforge_config::{CompilerConfig, PenaltyConfig};
/// use symforge_symbolic::{build_conditions, compose_penalty, Kinds};
///
/// let config = CompilerConfig::default().with_nvars(3);
/// let conditions = build_conditions("x2 = x0/2.\nx0 >= 0.", &config).unwrap();
/// let penalty = compose_penalty(&conditions.into_vec(), &Kinds::Default, &PenaltyConfig::default()).unwrap();
///
/// assert_eq!(penalty.evaluate(&[1.0, 2.0, 0.0]), 25.0);
/// assert_eq!(penalty.evaluate(&[1.0, 2.0, 0.5]), 0.0);
/// ```
pub fn compose_penalty(
    conditions: &[Condition],
    kinds: &Kinds<PenaltyKind>,
    config: &PenaltyConfig,
) -> Result<PenaltyFunction> {
    let kinds = kinds.resolve(conditions.len(), |i| {
        PenaltyKind::default_for(conditions[i].kind())
    })?;
    let steps: Vec<PenaltyStep> = kinds
        .into_iter()
        .zip(conditions.iter().cloned())
        .map(|(kind, condition)| PenaltyStep { kind, condition })
        .collect();

    info!(
        event = "penalty_composed",
        terms = steps.len(),
        k = config.k,
        h = config.h,
    );
    Ok(PenaltyFunction {
        steps,
        k: config.k,
        h: config.h,
    })
}
