//! Tests for aggregate measures.

use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn test_basic_measures() {
    let s = [1.0, 2.0, 3.0, 6.0];
    assert_close(mean(&s), 3.0);
    assert_close(variance(&s), 3.5);
    assert_close(std(&s), 3.5f64.sqrt());
    assert_close(spread(&s), 5.0);
    assert_close(sum(&s), 12.0);
    assert_close(product(&s), 36.0);
}

#[test]
fn test_empty_measures() {
    assert!(mean(&[]).is_nan());
    assert!(variance(&[]).is_nan());
    assert!(spread(&[]).is_nan());
    assert_eq!(sum(&[]), 0.0);
    assert_eq!(product(&[]), 1.0);
}

#[test]
fn test_impose_mean_shifts() {
    let imposed = impose_mean(10.0, &[1.0, 2.0, 3.0]);
    assert_eq!(imposed, vec![9.0, 10.0, 11.0]);
}

#[test]
fn test_impose_variance_keeps_mean() {
    let s = [1.0, 2.0, 3.0, 6.0];
    let imposed = impose_variance(14.0, &s).unwrap();
    assert_close(variance(&imposed), 14.0);
    assert_close(mean(&imposed), mean(&s));
}

#[test]
fn test_impose_variance_errors() {
    assert_eq!(
        impose_variance(-1.0, &[1.0, 2.0]),
        Err(MeasureError::InvalidTarget {
            measure: "variance",
            target: -1.0
        })
    );
    assert_eq!(
        impose_variance(2.0, &[4.0, 4.0]),
        Err(MeasureError::Degenerate {
            measure: "variance",
            target: 2.0
        })
    );
    assert_eq!(impose_variance(0.0, &[1.0, 3.0]).unwrap(), vec![2.0, 2.0]);
}

#[test]
fn test_impose_spread_keeps_mean() {
    let s = [0.0, 1.0, 5.0];
    let imposed = impose_spread(10.0, &s).unwrap();
    assert_close(spread(&imposed), 10.0);
    assert_close(mean(&imposed), mean(&s));
    assert!(impose_spread(1.0, &[3.0, 3.0]).is_err());
}

#[test]
fn test_impose_sum() {
    let imposed = impose_sum(12.0, &[1.0, 2.0, 3.0]);
    assert_eq!(imposed, vec![2.0, 4.0, 6.0]);

    let shifted = impose_sum(3.0, &[-1.0, 1.0, 0.0]);
    assert_close(sum(&shifted), 3.0);
}

#[test]
fn test_impose_product() {
    let imposed = impose_product(48.0, &[1.0, 2.0, 3.0]).unwrap();
    assert_close(product(&imposed), 48.0);

    let negative = impose_product(-6.0, &[1.0, 2.0]).unwrap();
    assert_close(product(&negative), -6.0);

    assert!(impose_product(5.0, &[0.0, 2.0]).is_err());
    assert_eq!(impose_product(0.0, &[0.0, 2.0]).unwrap(), vec![0.0, 2.0]);
}

#[test]
fn test_projections_hit_target_on_random_samples() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..50 {
        let n = rng.random_range(2..8);
        let samples: Vec<f64> = (0..n).map(|_| rng.random_range(-10.0..10.0)).collect();
        let target = rng.random_range(0.5..20.0);

        assert_close(mean(&impose_mean(target, &samples)), target);
        assert!((variance(&impose_variance(target, &samples).unwrap()) - target).abs() < 1e-6);
        assert!((spread(&impose_spread(target, &samples).unwrap()) - target).abs() < 1e-6);
        assert!((sum(&impose_sum(target, &samples)) - target).abs() < 1e-6);
        let p = product(&impose_product(target, &samples).unwrap());
        assert!((p - target).abs() < 1e-6 * target.max(1.0), "{p} != {target}");
    }
}
