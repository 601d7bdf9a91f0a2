//! Aggregate measures over sample vectors and their inverse projections.
//!
//! The `impose_*` functions return a transformed copy of the samples whose
//! measure equals the requested target. Each projection changes the samples
//! as little as its measure allows: `impose_mean` shifts, `impose_spread` and
//! `impose_variance` rescale around the mean, `impose_sum` and
//! `impose_product` rescale around zero.

#[cfg(test)]
mod tests;

use crate::error::{MeasureError, Result};

/// Arithmetic mean. `NaN` for empty samples.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    sum(samples) / samples.len() as f64
}

/// Population variance (mean squared deviation). `NaN` for empty samples.
pub fn variance(samples: &[f64]) -> f64 {
    let m = mean(samples);
    if m.is_nan() {
        return m;
    }
    samples.iter().map(|s| (s - m) * (s - m)).sum::<f64>() / samples.len() as f64
}

/// Population standard deviation.
pub fn std(samples: &[f64]) -> f64 {
    variance(samples).sqrt()
}

/// Peak-to-peak range, `max - min`. `NaN` for empty samples.
pub fn spread(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return f64::NAN;
    }
    let (lo, hi) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(s), hi.max(s))
        });
    hi - lo
}

pub fn sum(samples: &[f64]) -> f64 {
    samples.iter().sum()
}

pub fn product(samples: &[f64]) -> f64 {
    samples.iter().product()
}

/// Shifts the samples so that their mean equals `target`.
pub fn impose_mean(target: f64, samples: &[f64]) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let shift = target - mean(samples);
    samples.iter().map(|s| s + shift).collect()
}

/// Rescales the samples around their mean so that their variance equals `target`.
///
/// # Errors
///
/// `InvalidTarget` for a negative target, `Degenerate` when the samples have
/// zero variance and a non-zero target is requested.
pub fn impose_variance(target: f64, samples: &[f64]) -> Result<Vec<f64>> {
    if target < 0.0 || target.is_nan() {
        return Err(MeasureError::InvalidTarget {
            measure: "variance",
            target,
        });
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    let current = variance(samples);
    rescale_around_mean("variance", target, samples, (target / current).sqrt(), current)
}

/// Rescales the samples around their mean so that `max - min` equals `target`.
///
/// # Errors
///
/// `InvalidTarget` for a negative target, `Degenerate` when all samples are
/// equal and a non-zero target is requested.
pub fn impose_spread(target: f64, samples: &[f64]) -> Result<Vec<f64>> {
    if target < 0.0 || target.is_nan() {
        return Err(MeasureError::InvalidTarget {
            measure: "spread",
            target,
        });
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    let current = spread(samples);
    rescale_around_mean("spread", target, samples, target / current, current)
}

/// Rescales the samples so that their sum equals `target`.
///
/// Samples summing to zero cannot be rescaled; they are shifted by
/// `target / n` instead.
pub fn impose_sum(target: f64, samples: &[f64]) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let current = sum(samples);
    if current == 0.0 {
        let shift = target / samples.len() as f64;
        return samples.iter().map(|s| s + shift).collect();
    }
    let scale = target / current;
    samples.iter().map(|s| s * scale).collect()
}

/// Rescales the samples so that their product equals `target`.
///
/// Every sample is scaled by `|target / product|^(1/n)`; a negative ratio
/// additionally flips the sign of the first sample.
///
/// # Errors
///
/// `Degenerate` when the current product is zero and the target is not.
pub fn impose_product(target: f64, samples: &[f64]) -> Result<Vec<f64>> {
    if target.is_nan() {
        return Err(MeasureError::InvalidTarget {
            measure: "product",
            target,
        });
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    let current = product(samples);
    if current == 0.0 {
        if target == 0.0 {
            return Ok(samples.to_vec());
        }
        return Err(MeasureError::Degenerate {
            measure: "product",
            target,
        });
    }
    let ratio = target / current;
    let scale = ratio.abs().powf(1.0 / samples.len() as f64);
    let mut imposed: Vec<f64> = samples.iter().map(|s| s * scale).collect();
    if ratio < 0.0 {
        imposed[0] = -imposed[0];
    }
    Ok(imposed)
}

fn rescale_around_mean(
    measure: &'static str,
    target: f64,
    samples: &[f64],
    scale: f64,
    current: f64,
) -> Result<Vec<f64>> {
    let m = mean(samples);
    if target == 0.0 {
        return Ok(vec![m; samples.len()]);
    }
    if current == 0.0 {
        return Err(MeasureError::Degenerate { measure, target });
    }
    Ok(samples.iter().map(|s| m + (s - m) * scale).collect())
}
