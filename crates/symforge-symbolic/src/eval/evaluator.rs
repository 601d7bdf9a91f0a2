//! Main expression evaluation function for point contexts.

use smallvec::SmallVec;
use symforge_core::measures;

use super::{EvalContext, Value};
use crate::error::{Result, SymbolicError};
use crate::expr::{slice_bounds, Expr, Function, Statement};

/// Evaluates an expression in the given context.
///
/// Arithmetic follows IEEE-754: division by zero yields an infinity or NaN
/// rather than an error. Only the aggregate projectors can fail.
pub fn eval_expr(expr: &Expr, ctx: &EvalContext) -> Result<Value> {
    let value = match expr {
        Expr::Literal(v) => Value::Scalar(*v),

        Expr::Var(i) => Value::Scalar(ctx.get(*i)),

        Expr::Point => Value::Vector(ctx.point.to_vec()),

        Expr::Slice { start, end } => {
            let (start, end) = slice_bounds(*start, *end, ctx.point.len());
            Value::Vector(ctx.point[start..end].to_vec())
        }

        Expr::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.extend(eval_expr(item, ctx)?.into_samples());
            }
            Value::Vector(values)
        }

        Expr::Neg(inner) => eval_expr(inner, ctx)?.map(|v| -v),

        Expr::Add(l, r) => zip_with(eval_expr(l, ctx)?, eval_expr(r, ctx)?, |a, b| a + b)?,
        Expr::Sub(l, r) => zip_with(eval_expr(l, ctx)?, eval_expr(r, ctx)?, |a, b| a - b)?,
        Expr::Mul(l, r) => zip_with(eval_expr(l, ctx)?, eval_expr(r, ctx)?, |a, b| a * b)?,
        Expr::Div(l, r) => zip_with(eval_expr(l, ctx)?, eval_expr(r, ctx)?, |a, b| a / b)?,
        Expr::Mod(l, r) => zip_with(eval_expr(l, ctx)?, eval_expr(r, ctx)?, floored_mod)?,
        Expr::Pow(l, r) => zip_with(eval_expr(l, ctx)?, eval_expr(r, ctx)?, f64::powf)?,

        Expr::Call { function, args } => {
            let args = args
                .iter()
                .map(|arg| eval_expr(arg, ctx))
                .collect::<Result<SmallVec<[Value; 2]>>>()?;
            call(*function, args)?
        }
    };
    Ok(value)
}

/// Evaluates `statement` and writes the result into `point`.
///
/// A scalar value is written to every target position; a vector value must
/// match the number of target positions. Writes past the end of the point
/// are dropped. On error the point is left untouched.
pub fn apply_statement(statement: &Statement, point: &mut [f64]) -> Result<()> {
    let value = eval_expr(&statement.value, &EvalContext::new(point))?;
    let positions = statement.target.positions(point.len());
    match value {
        Value::Scalar(v) => {
            for p in positions {
                if let Some(slot) = point.get_mut(p) {
                    *slot = v;
                }
            }
        }
        Value::Vector(values) => {
            if values.len() != positions.len() {
                return Err(SymbolicError::LengthMismatch {
                    expected: positions.len(),
                    found: values.len(),
                });
            }
            for (p, v) in positions.into_iter().zip(values) {
                if let Some(slot) = point.get_mut(p) {
                    *slot = v;
                }
            }
        }
    }
    Ok(())
}

/// Floored `%`: the result takes the sign of the divisor.
fn floored_mod(a: f64, b: f64) -> f64 {
    a - b * (a / b).floor()
}

/// `sign(0) == 0`, NaN stays NaN.
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        v
    }
}

fn zip_with(a: Value, b: Value, f: impl Fn(f64, f64) -> f64) -> Result<Value> {
    let value = match (a, b) {
        (Value::Scalar(x), Value::Scalar(y)) => Value::Scalar(f(x, y)),
        (Value::Vector(xs), Value::Scalar(y)) => {
            Value::Vector(xs.into_iter().map(|x| f(x, y)).collect())
        }
        (Value::Scalar(x), Value::Vector(ys)) => {
            Value::Vector(ys.into_iter().map(|y| f(x, y)).collect())
        }
        (Value::Vector(xs), Value::Vector(ys)) => {
            if xs.len() != ys.len() {
                return Err(SymbolicError::LengthMismatch {
                    expected: xs.len(),
                    found: ys.len(),
                });
            }
            Value::Vector(xs.into_iter().zip(ys).map(|(x, y)| f(x, y)).collect())
        }
    };
    Ok(value)
}

fn scalar(value: &Value) -> f64 {
    value.as_scalar().unwrap_or(f64::NAN)
}

fn call(function: Function, mut args: SmallVec<[Value; 2]>) -> Result<Value> {
    use Function::*;

    if let Some(unary) = elementwise(function) {
        let arg = args.pop().unwrap_or(Value::Scalar(f64::NAN));
        return Ok(arg.map(unary));
    }

    let value = match function {
        Atan2 | Hypot | Pow => {
            let f: fn(f64, f64) -> f64 = match function {
                Atan2 => f64::atan2,
                Hypot => f64::hypot,
                _ => f64::powf,
            };
            let mut args = args.into_iter();
            match (args.next(), args.next()) {
                (Some(a), Some(b)) => zip_with(a, b, f)?,
                _ => Value::Scalar(f64::NAN),
            }
        }

        Min | Max => {
            let f: fn(f64, f64) -> f64 = if function == Min { f64::min } else { f64::max };
            if args.len() == 1 {
                let samples = args.into_iter().flat_map(Value::into_samples);
                Value::Scalar(samples.reduce(f).unwrap_or(f64::NAN))
            } else {
                let mut args = args.into_iter();
                let first = args.next().unwrap_or(Value::Scalar(f64::NAN));
                args.try_fold(first, |acc, next| zip_with(acc, next, f))?
            }
        }

        Mean | Variance | Std | Spread | Sum | Product => {
            let samples: Vec<f64> = args.into_iter().flat_map(Value::into_samples).collect();
            Value::Scalar(match function {
                Mean => measures::mean(&samples),
                Variance => measures::variance(&samples),
                Std => measures::std(&samples),
                Spread => measures::spread(&samples),
                Sum => measures::sum(&samples),
                _ => measures::product(&samples),
            })
        }

        ImposeMean | ImposeVariance | ImposeSpread | ImposeSum | ImposeProduct => {
            let target = args.first().map(scalar).unwrap_or(f64::NAN);
            let samples = args.pop().map(Value::into_samples).unwrap_or_default();
            Value::Vector(match function {
                ImposeMean => measures::impose_mean(target, &samples),
                ImposeVariance => measures::impose_variance(target, &samples)?,
                ImposeSpread => measures::impose_spread(target, &samples)?,
                ImposeSum => measures::impose_sum(target, &samples),
                _ => measures::impose_product(target, &samples)?,
            })
        }

        _ => Value::Scalar(f64::NAN),
    };
    Ok(value)
}

fn elementwise(function: Function) -> Option<fn(f64) -> f64> {
    use Function::*;
    let f: fn(f64) -> f64 = match function {
        Abs => f64::abs,
        Sqrt => f64::sqrt,
        Exp => f64::exp,
        Log => f64::ln,
        Log10 => f64::log10,
        Log2 => f64::log2,
        Sin => f64::sin,
        Cos => f64::cos,
        Tan => f64::tan,
        Asin => f64::asin,
        Acos => f64::acos,
        Atan => f64::atan,
        Sinh => f64::sinh,
        Cosh => f64::cosh,
        Tanh => f64::tanh,
        Floor => f64::floor,
        Ceil => f64::ceil,
        Round => f64::round_ties_even,
        Sign => sign,
        _ => return None,
    };
    Some(f)
}
