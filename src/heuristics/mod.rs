//! Closed-form and scan-based design heuristics.
//!
//! These run without the convex backend:
//! - Uniform power, scanned over a grid of levels
//! - Unconstrained least squares, clipped into the box
//! - Regularized least squares with a search over the weight

pub mod least_squares;
pub mod regularized;
pub mod uniform;

pub use least_squares::{least_squares_clip, LeastSquaresFit};
pub use regularized::{regularized_least_squares, RegularizedFit};
pub use uniform::{uniform_scan, UniformScan};

use nalgebra::{DMatrix, DVector};

use crate::error::{DesignError, Result};

/// Project `p` onto `[0, p_max]` elementwise.
///
/// Returns the projected vector and the number of components that moved.
pub fn clip_to_box(p: &DVector<f64>, p_max: f64) -> (DVector<f64>, usize) {
    let mut clipped = 0;
    let projected = p.map(|v| {
        let c = v.max(0.0).min(p_max);
        if c != v {
            clipped += 1;
        }
        c
    });
    (projected, clipped)
}

/// Reject a power bound that is negative or not finite.
pub(crate) fn check_p_max(p_max: f64) -> Result<()> {
    if p_max.is_finite() && p_max >= 0.0 {
        Ok(())
    } else {
        Err(DesignError::InvalidProblem(format!(
            "power bound must be finite and non-negative, got {p_max}"
        )))
    }
}

/// Least-squares solve of `a x = b` through the SVD.
///
/// Rank-deficient systems yield the minimum-norm solution.
pub(crate) fn solve_least_squares(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    if a.nrows() != b.len() {
        return Err(DesignError::dimension("target", a.nrows(), b.len()));
    }
    let svd = a.clone().svd(true, true);
    let largest = svd.singular_values.max();
    let tol = f64::EPSILON * a.nrows().max(a.ncols()) as f64 * largest;
    svd.solve(b, tol)
        .map_err(|e| DesignError::NumericalError(e.to_string()))
}
