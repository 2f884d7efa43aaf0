//! Least-squares-with-clip heuristic.

use nalgebra::{DMatrix, DVector};

use super::{check_p_max, clip_to_box, solve_least_squares};
use crate::error::Result;
use crate::objective::log_ratio_objective;

/// Outcome of the clipped least-squares design.
#[derive(Debug, Clone)]
pub struct LeastSquaresFit {
    /// Clipped design.
    pub p: DVector<f64>,
    /// Objective of the clipped design.
    pub objective: f64,
    /// Number of components the clip moved.
    pub clipped: usize,
}

/// Minimize `||A p - target||^2` without constraints, then clip into `[0, p_max]`.
pub fn least_squares_clip(
    a: &DMatrix<f64>,
    target: &DVector<f64>,
    p_max: f64,
    epsilon: f64,
) -> Result<LeastSquaresFit> {
    check_p_max(p_max)?;
    let raw = solve_least_squares(a, target)?;
    let (p, clipped) = clip_to_box(&raw, p_max);
    let objective = log_ratio_objective(a, &p, epsilon)?;
    log::debug!(
        "least squares: {} of {} components clipped, objective {:.4}",
        clipped,
        p.len(),
        objective
    );
    Ok(LeastSquaresFit {
        p,
        objective,
        clipped,
    })
}
