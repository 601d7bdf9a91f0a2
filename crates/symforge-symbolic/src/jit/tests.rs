//! Tests for JIT-compiled conditions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::compiler::{compile, is_compilable, JitError};
use crate::env::Environment;
use crate::eval::{eval_expr, EvalContext};
use crate::expr::Expr;
use crate::parse::parse_expr;

fn parse(text: &str) -> Expr {
    parse_expr(text, &Environment::new(), None).unwrap()
}

fn interpret(expr: &Expr, point: &[f64]) -> f64 {
    eval_expr(expr, &EvalContext::new(point))
        .unwrap()
        .as_scalar()
        .unwrap()
}

#[test]
fn test_variable_access() {
    let f = compile(&Expr::var(2)).unwrap();
    assert_eq!(f.nvars(), 3);
    assert_eq!(f.call(&[10.0, 20.0, 30.0]), Some(30.0));
}

#[test]
fn test_variable_offset_overflow_is_unsupported() {
    assert!(!is_compilable(&Expr::var(300_000_000)));
    assert!(matches!(
        compile(&Expr::var(300_000_000)),
        Err(JitError::Unsupported(_))
    ));
    assert!(matches!(
        compile(&parse("x[0] + x[4294967296]")),
        Err(JitError::Unsupported(_))
    ));
    // largest index whose offset still fits
    assert!(is_compilable(&Expr::var(268_435_455)));
}

#[test]
fn test_literal() {
    let f = compile(&Expr::literal(42.5)).unwrap();
    assert_eq!(f.nvars(), 0);
    assert_eq!(f.call(&[]), Some(42.5));
}

#[test]
fn test_short_point_is_refused() {
    let f = compile(&parse("x[0] + x[3]")).unwrap();
    assert_eq!(f.call(&[1.0, 2.0]), None);
}

#[test]
fn test_penalty_expressions() {
    let f = compile(&parse("-(x[0] - (0.))")).unwrap();
    assert_eq!(f.call(&[-1.0, 2.0, -3.0]), Some(1.0));

    let f = compile(&parse("x[2] - (x[0]/2.)")).unwrap();
    assert_eq!(f.call(&[-1.0, 2.0, -3.0]), Some(-2.5));
}

#[test]
fn test_min_max_ignore_nan() {
    let f = compile(&parse("max(x[0], x[1])")).unwrap();
    assert_eq!(f.call(&[f64::NAN, 1.0]), Some(1.0));
    assert_eq!(f.call(&[1.0, f64::NAN]), Some(1.0));

    let f = compile(&parse("min(x[0], x[1], -2)")).unwrap();
    assert_eq!(f.call(&[3.0, 1.0]), Some(-2.0));
}

#[test]
fn test_round_ties_to_even() {
    let f = compile(&parse("round(x[0])")).unwrap();
    assert_eq!(f.call(&[2.5]), Some(2.0));
    assert_eq!(f.call(&[-3.5]), Some(-4.0));
}

#[test]
fn test_unsupported_nodes() {
    assert!(!is_compilable(&parse("sin(x[0])")));
    assert!(!is_compilable(&parse("x[0] ** 2")));
    assert!(!is_compilable(&parse("x[0] % 2")));
    assert!(!is_compilable(&parse("mean(x)")));
    assert!(matches!(
        compile(&parse("exp(x[1])")),
        Err(JitError::Unsupported(_))
    ));
}

#[test]
fn test_matches_interpreter() {
    let sources = [
        "x[0]*x[1] - 3.5*x[2] + 1",
        "-(abs(x[0]) - sqrt(abs(x[1])))",
        "max(x[0], 0.) / (1 + x[2]*x[2])",
        "floor(x[1]) - ceil(x[0]) + round(x[2])",
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for source in sources {
        let expr = parse(source);
        let f = compile(&expr).unwrap();
        for _ in 0..50 {
            let point: Vec<f64> = (0..3).map(|_| rng.random_range(-10.0..10.0)).collect();
            let native = f.call(&point).unwrap();
            let interpreted = interpret(&expr, &point);
            assert_eq!(native.to_bits(), interpreted.to_bits(), "{source} at {point:?}");
        }
    }
}
