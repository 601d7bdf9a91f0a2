//! Expression evaluation against a candidate point.

mod evaluator;


pub use evaluator::{apply_statement, eval_expr};

/// The value of an evaluated expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Value {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Vector(_) => None,
        }
    }

    /// The value as a sample set; a scalar is a single sample.
    pub fn into_samples(self) -> Vec<f64> {
        match self {
            Value::Scalar(v) => vec![v],
            Value::Vector(vs) => vs,
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(v) => Value::Scalar(f(v)),
            Value::Vector(vs) => Value::Vector(vs.into_iter().map(f).collect()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(vs: Vec<f64>) -> Self {
        Value::Vector(vs)
    }
}

/// Context for expression evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// The candidate point; `x[i]` reads `point[i]`.
    pub point: &'a [f64],
}

impl<'a> EvalContext<'a> {
    pub fn new(point: &'a [f64]) -> Self {
        Self { point }
    }

    /// Reads `x[i]`; positions past the end of the point read as NaN.
    pub fn get(&self, index: usize) -> f64 {
        self.point.get(index).copied().unwrap_or(f64::NAN)
    }
}
