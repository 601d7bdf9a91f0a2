use super::*;
use crate::expr::{Function, Target};

fn expr(text: &str) -> Expr {
    parse_expr(text, &Environment::new(), None).unwrap()
}

fn compile_error(result: Result<impl std::fmt::Debug>) -> String {
    match result {
        Err(SymbolicError::Compile { message, .. }) => message,
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn test_penalty_expression() {
    assert_eq!(expr("-(x[0] - (0.))"), -(Expr::var(0) - Expr::literal(0.0)));
    assert_eq!(
        expr("x[2] - (x[0]/2.)"),
        Expr::var(2) - Expr::var(0) / Expr::literal(2.0)
    );
}

#[test]
fn test_precedence() {
    assert_eq!(
        expr("1 + 2 * 3 % 4"),
        Expr::literal(1.0) + (Expr::literal(2.0) * Expr::literal(3.0)) % Expr::literal(4.0)
    );
    assert_eq!(
        expr("1 - 2 - 3"),
        (Expr::literal(1.0) - Expr::literal(2.0)) - Expr::literal(3.0)
    );
}

#[test]
fn test_power_binds_tighter_than_unary_minus() {
    assert_eq!(
        expr("-x[0]**2"),
        -Expr::pow(Expr::var(0), Expr::literal(2.0))
    );
    assert_eq!(
        expr("2**-1"),
        Expr::pow(Expr::literal(2.0), -Expr::literal(1.0))
    );
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(
        expr("2**3**2"),
        Expr::pow(
            Expr::literal(2.0),
            Expr::pow(Expr::literal(3.0), Expr::literal(2.0))
        )
    );
}

#[test]
fn test_point_slices_and_lists() {
    assert_eq!(expr("mean(x)"), Expr::call(Function::Mean, vec![Expr::point()]));
    assert_eq!(
        expr("ptp(x[1:])"),
        Expr::call(Function::Spread, vec![Expr::slice(Some(1), None)])
    );
    assert_eq!(
        expr("sum([x[0], 2*x[2]])"),
        Expr::call(
            Function::Sum,
            vec![Expr::list(vec![Expr::var(0), Expr::literal(2.0) * Expr::var(2)])]
        )
    );
    assert_eq!(expr("x[:]"), Expr::slice(None, None));
}

#[test]
fn test_constants() {
    let env = Environment::new().with_constant("limit", 4.0);
    assert_eq!(
        parse_expr("x[0] - limit", &env, None).unwrap(),
        Expr::var(0) - Expr::literal(4.0)
    );
    assert_eq!(expr("pi"), Expr::literal(std::f64::consts::PI));
}

#[test]
fn test_unknown_names_are_compile_errors() {
    let env = Environment::new();
    let message = compile_error(parse_expr("x[0] - y", &env, None));
    assert!(message.contains("unknown name `y`"), "{message}");

    let message = compile_error(parse_expr("foo(x[0])", &env, None));
    assert!(message.contains("unknown function `foo`"), "{message}");

    let message = compile_error(parse_expr("x5 + 0", &env, None));
    assert!(message.contains("unknown name `x5`"), "{message}");
}

#[test]
fn test_syntax_errors() {
    let env = Environment::new();
    assert!(parse_expr("x[0] +", &env, None).is_err());
    assert!(parse_expr("(x[0]", &env, None).is_err());
    assert!(parse_expr("x[0] = 1", &env, None).is_err());
    assert!(parse_expr("x[-1]", &env, None).is_err());
    assert!(parse_expr("x[0.5]", &env, None).is_err());
}

#[test]
fn test_index_bound() {
    let env = Environment::new();
    assert!(parse_expr("x[2]", &env, Some(3)).is_ok());
    let message = compile_error(parse_expr("x[3]", &env, Some(3)));
    assert!(message.contains("out of range"), "{message}");
}

#[test]
fn test_arity() {
    let env = Environment::new();
    let message = compile_error(parse_expr("sin(x[0], x[1])", &env, None));
    assert!(message.contains("takes 1 argument"), "{message}");
    assert!(parse_expr("min(x[0], x[1], 3)", &env, None).is_ok());
    assert!(parse_expr("hypot(x[0])", &env, None).is_err());
}

#[test]
fn test_vector_vector_arithmetic_rejected() {
    let env = Environment::new();
    assert!(parse_expr("x * 2", &env, None).is_ok());
    let message = compile_error(parse_expr("x + x[0:2]", &env, None));
    assert!(message.contains("two vectors"), "{message}");
    assert!(parse_expr("max(x, x)", &env, None).is_err());
    assert!(parse_expr("impose_mean(x, x)", &env, None).is_err());
}

#[test]
fn test_statements() {
    let env = Environment::new();
    let stmt = parse_statement("x[0] = max(0., x[0])", &env, Some(3)).unwrap();
    assert_eq!(stmt.target, Target::Index(0));
    assert_eq!(stmt.value, Expr::max(Expr::literal(0.0), Expr::var(0)));

    let stmt = parse_statement("x = impose_mean(5, x)", &env, Some(3)).unwrap();
    assert_eq!(stmt.target, Target::Whole);

    let stmt = parse_statement("x[0:2] = impose_sum(1, x[0:2])", &env, Some(3)).unwrap();
    assert_eq!(stmt.target, Target::Slice { start: Some(0), end: Some(2) });

    let stmt = parse_statement("[x[0], x[2]] = impose_product(2, [x[0], x[2]])", &env, Some(3)).unwrap();
    assert_eq!(stmt.target, Target::Indices(vec![0, 2]));
}

#[test]
fn test_invalid_assignment_targets() {
    let env = Environment::new();
    assert!(parse_statement("mean(x) + x[0] = 1", &env, None).is_err());
    assert!(parse_statement("[x[0], 1] = 1", &env, None).is_err());
    assert!(parse_statement("x[0] = x", &env, None).is_err());
    assert!(parse_statement("x[0] + 1", &env, None).is_err());
}
