//! Matrix-to-text bridge for linear constraint systems.

use crate::error::{Result, SymbolicError};

/// Coefficient rows and right-hand sides of one family of linear constraints.
pub type LinearRows<'a> = (&'a [Vec<f64>], &'a [f64]);

/// Renders `A x = b` and `G x <= h` as constraint text.
///
/// Inequality rows come first, then equality rows; every line ends with a
/// newline. Variables are named `x0, x1, ...` after the coefficient columns.
///
/// # Errors
///
/// `DimensionMismatch` when a matrix and its right-hand side have different
/// row counts, `RaggedMatrix` when a row's width differs from the first row.
///
/// # Example
///
/// ```
/// use symforge_symbolic::linear_symbolic;
///
/// let a = [vec![3., 4., 5.], vec![1., 6., -9.]];
/// let g = [vec![1., 0., 0.]];
/// let text = linear_symbolic(Some((&a, &[0., 0.])), Some((&g, &[5.]))).unwrap();
/// assert_eq!(
///     text,
///     "1.0*x0 + 0.0*x1 + 0.0*x2 <= 5.0\n\
///      3.0*x0 + 4.0*x1 + 5.0*x2 = 0.0\n\
///      1.0*x0 + 6.0*x1 + -9.0*x2 = 0.0\n"
/// );
/// ```
pub fn linear_symbolic(
    equalities: Option<LinearRows<'_>>,
    inequalities: Option<LinearRows<'_>>,
) -> Result<String> {
    let mut text = String::new();
    if let Some((g, h)) = inequalities {
        render(&mut text, ("G", "h"), g, h, "<=")?;
    }
    if let Some((a, b)) = equalities {
        render(&mut text, ("A", "b"), a, b, "=")?;
    }
    Ok(text)
}

fn render(
    out: &mut String,
    (matrix, vector): (&'static str, &'static str),
    rows: &[Vec<f64>],
    rhs: &[f64],
    relation: &str,
) -> Result<()> {
    if rows.len() != rhs.len() {
        return Err(SymbolicError::DimensionMismatch {
            matrix,
            vector,
            rows: rows.len(),
            values: rhs.len(),
        });
    }
    let width = rows.first().map_or(0, Vec::len);
    for (i, (row, value)) in rows.iter().zip(rhs).enumerate() {
        if row.len() != width {
            return Err(SymbolicError::RaggedMatrix {
                matrix,
                row: i,
                expected: width,
                found: row.len(),
            });
        }
        let terms: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(j, c)| format!("{}*x{j}", number(*c)))
            .collect();
        out.push_str(&format!("{} {relation} {}\n", terms.join(" + "), number(*value)));
    }
    Ok(())
}

/// Spells a value the way the constraint parser reads it back.
fn number(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{value:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equalities_only() {
        let a = [vec![1.0, -2.5]];
        let text = linear_symbolic(Some((&a, &[3.0])), None).unwrap();
        assert_eq!(text, "1.0*x0 + -2.5*x1 = 3.0\n");
    }

    #[test]
    fn test_inequalities_only() {
        let g = [vec![0.5], vec![-1.0]];
        let text = linear_symbolic(None, Some((&g, &[1.0, 2.0]))).unwrap();
        assert_eq!(text, "0.5*x0 <= 1.0\n-1.0*x0 <= 2.0\n");
    }

    #[test]
    fn test_non_finite_values_use_constant_names() {
        let g = [vec![f64::NAN, f64::NEG_INFINITY]];
        let text = linear_symbolic(None, Some((&g, &[f64::INFINITY]))).unwrap();
        assert_eq!(text, "nan*x0 + -inf*x1 <= inf\n");

        let conditions =
            crate::build_conditions(&text, &symforge_config::CompilerConfig::default()).unwrap();
        assert_eq!(conditions.inequalities.len(), 1);
        assert!(conditions.inequalities[0].evaluate(&[1.0, 1.0]).is_nan());
    }

    #[test]
    fn test_nothing_to_render() {
        assert_eq!(linear_symbolic(None, None).unwrap(), "");
    }

    #[test]
    fn test_row_count_mismatch() {
        let a = [vec![3.0, 4.0], vec![1.0, 6.0]];
        let err = linear_symbolic(Some((&a, &[0.0])), None).unwrap_err();
        assert_eq!(
            err,
            SymbolicError::DimensionMismatch {
                matrix: "A",
                vector: "b",
                rows: 2,
                values: 1
            }
        );

        let g = [vec![1.0]];
        let err = linear_symbolic(None, Some((&g, &[1.0, 2.0]))).unwrap_err();
        assert!(matches!(err, SymbolicError::DimensionMismatch { matrix: "G", .. }));
    }

    #[test]
    fn test_ragged_rows() {
        let a = [vec![3.0, 4.0], vec![1.0]];
        let err = linear_symbolic(Some((&a, &[0.0, 0.0])), None).unwrap_err();
        assert_eq!(
            err,
            SymbolicError::RaggedMatrix {
                matrix: "A",
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }
}
