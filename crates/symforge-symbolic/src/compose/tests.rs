use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use symforge_config::{CompilerConfig, PenaltyConfig};
use symforge_core::ConditionKind;

use super::*;
use crate::build::{build_conditions, build_solvers, Condition};
use crate::error::SymbolicError;

const SCENARIO: &str = "x2 = x0/2.\nx0 >= 0.";

fn conditions(text: &str, nvars: usize) -> Vec<Condition> {
    build_conditions(text, &CompilerConfig::default().with_nvars(nvars))
        .unwrap()
        .into_vec()
}

fn constraint(text: &str, nvars: usize, kinds: &Kinds<CouplingKind>) -> ConstraintFunction {
    let solvers = build_solvers(text, &CompilerConfig::default().with_nvars(nvars)).unwrap();
    compose_constraint(&solvers, kinds).unwrap()
}

#[test]
fn test_default_penalty() {
    let penalty = compose_penalty(&conditions(SCENARIO, 3), &Kinds::Default, &PenaltyConfig::default()).unwrap();
    assert_eq!(penalty.evaluate(&[1.0, 2.0, 0.0]), 25.0);
    assert_eq!(penalty.evaluate(&[1.0, 2.0, 0.5]), 0.0);
    // x0 < 0 violates the inequality as well
    assert_eq!(penalty.evaluate(&[-1.0, 2.0, -0.5]), 100.0);
}

#[test]
fn test_penalty_description() {
    let penalty = compose_penalty(&conditions(SCENARIO, 3), &Kinds::Default, &PenaltyConfig::default()).unwrap();
    assert_eq!(
        penalty.to_string(),
        "quadratic_inequality: -(x[0] - (0.))\nquadratic_equality: x[2] - (x[0]/2.)"
    );
}

#[test]
fn test_penalty_kind_terms() {
    let k = 10.0;
    assert_eq!(PenaltyKind::LinearEquality.term(-2.0, k), 20.0);
    assert_eq!(PenaltyKind::QuadraticEquality.term(-2.0, k), 40.0);
    assert_eq!(PenaltyKind::UniformEquality.term(-2.0, k), 10.0);
    assert_eq!(PenaltyKind::UniformEquality.term(0.0, k), 0.0);
    assert_eq!(PenaltyKind::LinearInequality.term(-2.0, k), 0.0);
    assert_eq!(PenaltyKind::LinearInequality.term(3.0, k), 30.0);
    assert_eq!(PenaltyKind::QuadraticInequality.term(3.0, k), 90.0);
    assert_eq!(PenaltyKind::UniformInequality.term(0.5, k), 10.0);
    assert_eq!(PenaltyKind::BarrierInequality.term(-0.5, k), 0.2);
    assert_eq!(PenaltyKind::BarrierInequality.term(0.0, k), f64::INFINITY);
}

#[test]
fn test_nan_condition_terms() {
    let k = 10.0;
    assert_eq!(PenaltyKind::LinearInequality.term(f64::NAN, k), 0.0);
    assert_eq!(PenaltyKind::QuadraticInequality.term(f64::NAN, k), 0.0);
    assert_eq!(PenaltyKind::UniformInequality.term(f64::NAN, k), 0.0);
    assert_eq!(PenaltyKind::BarrierInequality.term(f64::NAN, k), f64::INFINITY);
    assert_eq!(PenaltyKind::UniformEquality.term(f64::NAN, k), 10.0);
    assert!(PenaltyKind::QuadraticEquality.term(f64::NAN, k).is_nan());
}

#[test]
fn test_undefined_condition_is_unpenalized_but_infeasible() {
    let penalty = compose_penalty(&conditions("sqrt(x0) >= 1", 1), &Kinds::Default, &PenaltyConfig::default()).unwrap();
    assert_eq!(penalty.evaluate(&[-4.0]), 0.0);
    assert!(!penalty.is_feasible(&[-4.0], 1e-9));
    assert!(penalty.is_feasible(&[4.0], 1e-9));
}

#[test]
fn test_penalty_kind_names() {
    for kind in PenaltyKind::ALL {
        assert_eq!(PenaltyKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(PenaltyKind::from_name("cubic_equality"), None);
    assert_eq!(PenaltyKind::QuadraticEquality.condition_kind(), ConditionKind::Equality);
    assert_eq!(PenaltyKind::BarrierInequality.condition_kind(), ConditionKind::Inequality);
}

#[test]
fn test_broadcast_and_per_entry_kinds() {
    let conditions = conditions(SCENARIO, 3);
    let config = PenaltyConfig::new(2.0, 3.0);

    let linear = compose_penalty(&conditions, &Kinds::all(PenaltyKind::LinearEquality), &config).unwrap();
    // |-(1-0)| + |0 - 0.5|
    assert_eq!(linear.evaluate(&[1.0, 2.0, 0.0]), 3.0);

    let each = Kinds::each([PenaltyKind::UniformInequality, PenaltyKind::LinearEquality]);
    let mixed = compose_penalty(&conditions, &each, &config).unwrap();
    assert_eq!(mixed.evaluate(&[1.0, 2.0, 0.0]), 1.0);
    assert_eq!(mixed.steps()[0].kind, PenaltyKind::UniformInequality);
}

#[test]
fn test_kind_count_mismatch() {
    let conditions = conditions(SCENARIO, 3);
    let err = compose_penalty(
        &conditions,
        &Kinds::each([PenaltyKind::LinearEquality]),
        &PenaltyConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err, SymbolicError::KindCountMismatch { expected: 2, found: 1 });

    let solvers = build_solvers(SCENARIO, &CompilerConfig::default().with_nvars(3)).unwrap();
    let err = compose_constraint(&solvers, &Kinds::each([CouplingKind::Inner; 3])).unwrap_err();
    assert_eq!(err, SymbolicError::KindCountMismatch { expected: 2, found: 3 });
}

#[test]
fn test_escalation_is_pure() {
    let penalty = compose_penalty(&conditions(SCENARIO, 3), &Kinds::Default, &PenaltyConfig::new(100.0, 5.0)).unwrap();
    let escalated = penalty.escalate();
    assert_eq!(escalated.multiplier(), 500.0);
    assert_eq!(escalated.evaluate(&[1.0, 2.0, 0.0]), 125.0);
    // the original is untouched and repeated calls agree
    assert_eq!(penalty.multiplier(), 100.0);
    assert_eq!(penalty.evaluate(&[1.0, 2.0, 0.0]), 25.0);
    assert_eq!(penalty.evaluate(&[1.0, 2.0, 0.0]), 25.0);
    assert_eq!(escalated.escalate().multiplier(), 2500.0);
}

#[test]
fn test_empty_compositions() {
    let penalty = compose_penalty(&[], &Kinds::Default, &PenaltyConfig::default()).unwrap();
    assert!(penalty.is_empty());
    assert_eq!(penalty.evaluate(&[1.0]), 0.0);

    let constraint = compose_constraint(&[], &Kinds::Default).unwrap();
    assert_eq!(constraint.apply(&[1.0, 2.0]), vec![1.0, 2.0]);
}

#[test]
fn test_penalty_zero_exactly_at_feasibility() {
    let text = "x0 + x1 <= 4\nx2 = 2*x0\nx1 > 1";
    let penalty = compose_penalty(&conditions(text, 3), &Kinds::Default, &PenaltyConfig::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..200 {
        let x1: f64 = rng.random_range(1.0..3.0);
        let x0: f64 = rng.random_range(-2.0..(3.5 - x1));
        let feasible = [x0, x1, 2.0 * x0];
        assert_eq!(penalty.evaluate(&feasible), 0.0, "{feasible:?}");
        assert!(penalty.is_feasible(&feasible, 0.0));

        let infeasible = [x0, x1, 2.0 * x0 + 0.25];
        assert!(penalty.evaluate(&infeasible) > 0.0);
        assert!(!penalty.is_feasible(&infeasible, 1e-9));
    }
}

#[test]
fn test_scenario_repair() {
    let constraint = constraint(SCENARIO, 3, &Kinds::Default);
    assert_eq!(constraint.apply(&[-1.0, 2.0, -3.0]), vec![0.0, 2.0, 0.0]);
    assert_eq!(constraint.apply(&[1.0, 2.0, 3.0]), vec![1.0, 2.0, 0.5]);
}

#[test]
fn test_inner_runs_later_declarations_first() {
    let constraint = constraint("x0 = cos(x1) + 2.\nx1 = x2*2.", 3, &Kinds::Default);
    let repaired = constraint.apply(&[1.0, 0.0, 1.0]);
    assert_eq!(repaired, vec![2.0f64.cos() + 2.0, 2.0, 1.0]);
    assert!((repaired[0] - 1.5838531634528576).abs() < 1e-15);

    let order: Vec<&str> = constraint.execution_order().map(|s| s.solver.text()).collect();
    assert_eq!(order, vec!["x[1] = x[2]*2.", "x[0] = cos(x[1]) + 2."]);
}

#[test]
fn test_outer_runs_in_declaration_order() {
    let constraint = constraint(SCENARIO, 3, &Kinds::all(CouplingKind::Outer));
    // x2 is computed from the unrepaired x0, then x0 is clipped
    assert_eq!(constraint.apply(&[-1.0, 2.0, -3.0]), vec![0.0, 2.0, -0.5]);
    assert_eq!(
        constraint.to_string(),
        "outer: x[2] = x[0]/2.\nouter: x[0] = max(0., x[0])"
    );
}

#[test]
fn test_mixed_coupling() {
    // step 0 inner, step 1 outer, step 2 inner: runs 2, 0, 1
    let text = "x0 = x0 + 1\nx0 = x0 * 10\nx0 = x0 - 3";
    let kinds = Kinds::each([CouplingKind::Inner, CouplingKind::Outer, CouplingKind::Inner]);
    let constraint = constraint(text, 1, &kinds);
    assert_eq!(constraint.apply(&[0.0]), vec![-20.0]);
}

#[test]
fn test_failed_step_is_skipped() {
    let text = "x1 = x1 + 1\nvariance(x) = 1";
    let constraint = constraint(text, 2, &Kinds::Default);
    // variance runs first and fails on equal samples, then x1 is incremented
    assert_eq!(constraint.apply(&[3.0, 3.0]), vec![3.0, 4.0]);
    assert!(matches!(constraint.try_apply(&[3.0, 3.0]), Err(SymbolicError::Measure(_))));
}

#[test]
fn test_repair_is_idempotent() {
    let text = "x2 = x0/2.\nx0 >= 0.\nx1 <= 5";
    let constraint = constraint(text, 3, &Kinds::Default);
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    for _ in 0..200 {
        let point: Vec<f64> = (0..3).map(|_| rng.random_range(-10.0..10.0)).collect();
        let once = constraint.apply(&point);
        let twice = constraint.apply(&once);
        assert_eq!(once, twice, "{point:?}");
    }
}
