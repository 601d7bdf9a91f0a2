//! Expression trees for compiled constraint expressions.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// An expression tree node evaluated against a candidate point.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    /// `x[i]`
    Var(usize),
    /// `x`, the whole point.
    Point,
    /// `x[start:end]`, bounds clamped to the point length.
    Slice {
        start: Option<usize>,
        end: Option<usize>,
    },
    /// `[a, b, ...]`
    List(Vec<Expr>),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// Floored modulo, sign follows the divisor.
    Mod(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

/// Static shape of an expression's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Vector,
}

impl Expr {
    pub fn literal(value: f64) -> Self {
        Expr::Literal(value)
    }

    pub fn var(index: usize) -> Self {
        Expr::Var(index)
    }

    pub fn point() -> Self {
        Expr::Point
    }

    pub fn slice(start: Option<usize>, end: Option<usize>) -> Self {
        Expr::Slice { start, end }
    }

    pub fn list(items: Vec<Expr>) -> Self {
        Expr::List(items)
    }

    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::Pow(Box::new(base), Box::new(exponent))
    }

    pub fn call(function: Function, args: Vec<Expr>) -> Self {
        Expr::Call { function, args }
    }

    pub fn min(left: Expr, right: Expr) -> Self {
        Expr::call(Function::Min, vec![left, right])
    }

    pub fn max(left: Expr, right: Expr) -> Self {
        Expr::call(Function::Max, vec![left, right])
    }

    /// Static shape of the value this expression produces.
    pub fn shape(&self) -> Shape {
        match self {
            Expr::Literal(_) | Expr::Var(_) => Shape::Scalar,
            Expr::Point | Expr::Slice { .. } | Expr::List(_) => Shape::Vector,
            Expr::Neg(inner) => inner.shape(),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Mod(l, r)
            | Expr::Pow(l, r) => widest(l.shape(), r.shape()),
            Expr::Call { function, args } => function.result_shape(args),
        }
    }

    /// Largest variable index referenced directly through `x[i]`.
    pub fn max_index(&self) -> Option<usize> {
        match self {
            Expr::Var(i) => Some(*i),
            Expr::Literal(_) | Expr::Point | Expr::Slice { .. } => None,
            Expr::List(items) => items.iter().filter_map(Expr::max_index).max(),
            Expr::Neg(inner) => inner.max_index(),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Mod(l, r)
            | Expr::Pow(l, r) => l.max_index().max(r.max_index()),
            Expr::Call { args, .. } => args.iter().filter_map(Expr::max_index).max(),
        }
    }
}

fn widest(a: Shape, b: Shape) -> Shape {
    if a == Shape::Vector || b == Shape::Vector {
        Shape::Vector
    } else {
        Shape::Scalar
    }
}

// std::ops traits for operator syntax

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

impl Rem for Expr {
    type Output = Expr;

    fn rem(self, rhs: Self) -> Self::Output {
        Expr::Mod(Box::new(self), Box::new(rhs))
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        Expr::Neg(Box::new(self))
    }
}

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(1) => write!(f, "1 argument"),
            Arity::Exact(n) => write!(f, "{n} arguments"),
            Arity::AtLeast(n) => write!(f, "at least {n} argument(s)"),
        }
    }
}

/// The fixed registry of callable functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    // elementwise, one argument
    Abs,
    Sqrt,
    Exp,
    Log,
    Log10,
    Log2,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Floor,
    Ceil,
    Round,
    Sign,
    // elementwise, two arguments
    Atan2,
    Hypot,
    Pow,
    // one argument reduces a vector, several compare elementwise
    Min,
    Max,
    // aggregates
    Mean,
    Variance,
    Std,
    Spread,
    Sum,
    Product,
    // projectors: (target, samples) -> samples
    ImposeMean,
    ImposeVariance,
    ImposeSpread,
    ImposeSum,
    ImposeProduct,
}

impl Function {
    /// Looks a function up by name, accepting the numeric-library aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        use Function::*;
        let function = match name {
            "abs" | "fabs" => Abs,
            "sqrt" => Sqrt,
            "exp" => Exp,
            "log" => Log,
            "log10" => Log10,
            "log2" => Log2,
            "sin" => Sin,
            "cos" => Cos,
            "tan" => Tan,
            "asin" => Asin,
            "acos" => Acos,
            "atan" => Atan,
            "sinh" => Sinh,
            "cosh" => Cosh,
            "tanh" => Tanh,
            "floor" => Floor,
            "ceil" => Ceil,
            "round" => Round,
            "sign" => Sign,
            "atan2" => Atan2,
            "hypot" => Hypot,
            "pow" => Pow,
            "min" => Min,
            "max" => Max,
            "mean" | "average" => Mean,
            "variance" | "var" => Variance,
            "std" => Std,
            "spread" | "ptp" => Spread,
            "sum" => Sum,
            "product" | "prod" => Product,
            "impose_mean" => ImposeMean,
            "impose_variance" => ImposeVariance,
            "impose_spread" => ImposeSpread,
            "impose_sum" => ImposeSum,
            "impose_product" => ImposeProduct,
            _ => return None,
        };
        Some(function)
    }

    pub fn name(self) -> &'static str {
        use Function::*;
        match self {
            Abs => "abs",
            Sqrt => "sqrt",
            Exp => "exp",
            Log => "log",
            Log10 => "log10",
            Log2 => "log2",
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Asin => "asin",
            Acos => "acos",
            Atan => "atan",
            Sinh => "sinh",
            Cosh => "cosh",
            Tanh => "tanh",
            Floor => "floor",
            Ceil => "ceil",
            Round => "round",
            Sign => "sign",
            Atan2 => "atan2",
            Hypot => "hypot",
            Pow => "pow",
            Min => "min",
            Max => "max",
            Mean => "mean",
            Variance => "variance",
            Std => "std",
            Spread => "spread",
            Sum => "sum",
            Product => "product",
            ImposeMean => "impose_mean",
            ImposeVariance => "impose_variance",
            ImposeSpread => "impose_spread",
            ImposeSum => "impose_sum",
            ImposeProduct => "impose_product",
        }
    }

    pub fn arity(self) -> Arity {
        use Function::*;
        match self {
            Atan2 | Hypot | Pow => Arity::Exact(2),
            ImposeMean | ImposeVariance | ImposeSpread | ImposeSum | ImposeProduct => {
                Arity::Exact(2)
            }
            Min | Max => Arity::AtLeast(1),
            _ => Arity::Exact(1),
        }
    }

    pub fn is_aggregate(self) -> bool {
        use Function::*;
        matches!(self, Mean | Variance | Std | Spread | Sum | Product)
    }

    pub fn is_projector(self) -> bool {
        use Function::*;
        matches!(
            self,
            ImposeMean | ImposeVariance | ImposeSpread | ImposeSum | ImposeProduct
        )
    }

    fn result_shape(self, args: &[Expr]) -> Shape {
        use Function::*;
        match self {
            _ if self.is_aggregate() => Shape::Scalar,
            _ if self.is_projector() => Shape::Vector,
            Min | Max if args.len() == 1 => Shape::Scalar,
            _ => args
                .iter()
                .map(Expr::shape)
                .fold(Shape::Scalar, widest),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Left-hand side of a solver assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `x[i]`
    Index(usize),
    /// `x`
    Whole,
    /// `x[start:end]`
    Slice {
        start: Option<usize>,
        end: Option<usize>,
    },
    /// `[x[i], x[j], ...]`
    Indices(Vec<usize>),
}

impl Target {
    /// Point positions written by this target for a point of length `len`.
    ///
    /// Positions past the end of the point are kept; writes to them are
    /// dropped by the evaluator.
    pub fn positions(&self, len: usize) -> Vec<usize> {
        match self {
            Target::Index(i) => vec![*i],
            Target::Whole => (0..len).collect(),
            Target::Slice { start, end } => {
                let (start, end) = slice_bounds(*start, *end, len);
                (start..end).collect()
            }
            Target::Indices(indices) => indices.clone(),
        }
    }

    /// The value this target denotes when read back as an expression.
    pub fn as_expr(&self) -> Expr {
        match self {
            Target::Index(i) => Expr::Var(*i),
            Target::Whole => Expr::Point,
            Target::Slice { start, end } => Expr::slice(*start, *end),
            Target::Indices(indices) => {
                Expr::List(indices.iter().map(|&i| Expr::Var(i)).collect())
            }
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Target::Index(_) => Shape::Scalar,
            _ => Shape::Vector,
        }
    }
}

/// Clamps slice bounds to `0..=len`.
pub(crate) fn slice_bounds(start: Option<usize>, end: Option<usize>, len: usize) -> (usize, usize) {
    let end = end.unwrap_or(len).min(len);
    let start = start.unwrap_or(0).min(end);
    (start, end)
}

/// A compiled assignment `target = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub target: Target,
    pub value: Expr,
}
