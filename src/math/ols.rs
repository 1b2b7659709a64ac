//! Least squares solver.
//!
//! The slope estimator solves tiny regression problems (two columns: intercept
//! and x) over a trailing window. We use SVD so the solve is robust when the
//! design matrix is tall. (Nalgebra's `QR::solve` is intended for square
//! systems and will panic for non-square matrices.)

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = a + b x` and return `(a, b)`.
///
/// Returns `None` when fewer than two points are given, the inputs differ in
/// length, or `x` has no spread (the slope is undefined).
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }

    let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = x_max.abs().max(x_min.abs()).max(1.0);
    if !(x_max - x_min).is_finite() || (x_max - x_min) <= scale * 1e-12 {
        return None;
    }

    let mut design = DMatrix::zeros(n, 2);
    for (i, &xi) in x.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = xi;
    }
    let rhs = DVector::from_column_slice(y);

    let beta = solve_least_squares(&design, &rhs)?;
    Some((beta[0], beta[1]))
}
