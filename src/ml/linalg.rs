// ============================================================
// Layer 5 - Normal Equation Solver
// ============================================================
// Solves w = (XᵀX)⁻¹ Xᵀy with nalgebra.
//
// Two paths, chosen by the condition number of XᵀX (ratio of
// its largest to smallest singular value):
//
//   cond ≤ limit → exact inverse (try_inverse)
//   cond > limit → Moore-Penrose pseudo-inverse, discarding
//                  singular values below σmax / limit
//
// A singular XᵀX has cond = ∞ and always takes the second path,
// which yields the minimum-norm least-squares solution.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveMethod {
    Inverse,
    PseudoInverse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Coefficients in design-matrix column order
    pub coefficients: Vec<f64>,
    pub method:       SolveMethod,
    /// σmax / σmin of XᵀX; infinite when singular
    pub condition:    f64,
}

/// Build a row-major design matrix with a leading column of ones.
pub fn design_matrix(rows: &[Vec<f64>], n_features: usize) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), n_features + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            rows[i][j - 1]
        }
    })
}

fn largest_singular_value(m: &DMatrix<f64>) -> f64 {
    m.clone()
        .svd(false, false)
        .singular_values
        .iter()
        .copied()
        .fold(0.0_f64, f64::max)
}

/// Condition number from the singular values of a square matrix.
pub fn condition_number(m: &DMatrix<f64>) -> f64 {
    let sv = m.clone().svd(false, false).singular_values;
    let max = sv.iter().copied().fold(0.0_f64, f64::max);
    let min = sv.iter().copied().fold(f64::INFINITY, f64::min);
    if max == 0.0 || min == 0.0 {
        f64::INFINITY
    } else {
        max / min
    }
}

/// Least-squares coefficients for `x · w ≈ y` via the normal equation.
pub fn solve_normal_equation(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    condition_limit: f64,
) -> Result<Solution> {
    if x.nrows() != y.len() {
        return Err(PipelineError::ShapeMismatch { expected: x.nrows(), actual: y.len() });
    }

    let xt  = x.transpose();
    let xtx = &xt * x;
    let xty = &xt * y;

    let condition = condition_number(&xtx);

    let (inverse, method) = match exact_inverse(&xtx, condition, condition_limit) {
        Some(inv) => (inv, SolveMethod::Inverse),
        None => {
            let eps = largest_singular_value(&xtx) / condition_limit;
            let pinv = xtx.clone().pseudo_inverse(eps).map_err(|e| {
                PipelineError::InvalidConfig(format!("pseudo-inverse failed: {e}"))
            })?;
            tracing::warn!(
                "XᵀX is ill-conditioned (cond = {:.3e}); using pseudo-inverse",
                condition
            );
            (pinv, SolveMethod::PseudoInverse)
        }
    };

    let w = inverse * xty;
    Ok(Solution { coefficients: w.iter().copied().collect(), method, condition })
}

fn exact_inverse(xtx: &DMatrix<f64>, condition: f64, limit: f64) -> Option<DMatrix<f64>> {
    if condition.is_finite() && condition <= limit {
        xtx.clone().try_inverse()
    } else {
        None
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_design_matrix_prepends_ones() {
        let x = design_matrix(&[vec![2.0, 3.0], vec![4.0, 5.0]], 2);
        assert_eq!(x.nrows(), 2);
        assert_eq!(x.ncols(), 3);
        assert_eq!(x[(0, 0)], 1.0);
        assert_eq!(x[(1, 2)], 5.0);
    }

    #[test]
    fn test_exact_line_uses_inverse() {
        let rows: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64]).collect();
        let y = DVector::from_iterator(5, (0..5).map(|i| 2.0 * i as f64 + 3.0));
        let sol = solve_normal_equation(&design_matrix(&rows, 1), &y, 1e12).unwrap();

        assert_eq!(sol.method, SolveMethod::Inverse);
        assert_abs_diff_eq!(sol.coefficients[0], 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.coefficients[1], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duplicate_column_falls_back_to_pinv() {
        // x2 == x1, so XᵀX is singular; the min-norm answer splits
        // the slope evenly between the two copies.
        let rows: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64, i as f64]).collect();
        let y = DVector::from_iterator(6, (0..6).map(|i| 2.0 * i as f64 + 3.0));
        let sol = solve_normal_equation(&design_matrix(&rows, 2), &y, 1e12).unwrap();

        assert_eq!(sol.method, SolveMethod::PseudoInverse);
        assert!(sol.condition > 1e12);
        assert_abs_diff_eq!(sol.coefficients[0], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(sol.coefficients[1], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(sol.coefficients[2], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_shape_mismatch() {
        let x = design_matrix(&[vec![1.0]], 1);
        let y = DVector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            solve_normal_equation(&x, &y, 1e12),
            Err(PipelineError::ShapeMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_condition_of_identity() {
        let m = DMatrix::<f64>::identity(3, 3);
        assert_abs_diff_eq!(condition_number(&m), 1.0, epsilon = 1e-12);
        assert!(condition_number(&DMatrix::zeros(2, 2)).is_infinite());
    }
}
