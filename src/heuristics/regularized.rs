//! Regularized least squares with a search over the regularization weight.
//!
//! For a weight `lambda` the design solves
//!
//! ```text
//! minimize ||A p - target||^2 + lambda * ||p - c 1||^2,   c = p_max / 2
//! ```
//!
//! as the stacked least-squares system `[A; sqrt(lambda) I] p = [target; sqrt(lambda) c 1]`.
//! Larger weights pull `p` toward the box center `c 1`. The search picks the
//! smallest weight whose design stays within `fraction * p_max` of the center
//! in the infinity norm.

use nalgebra::{DMatrix, DVector};

use super::{check_p_max, clip_to_box, solve_least_squares};
use crate::config::{check_lambdas, DesignSettings, LambdaSearch, RegularizationFallback};
use crate::error::{DesignError, Result};
use crate::objective::log_ratio_objective;

/// Outcome of the regularized least-squares search.
#[derive(Debug, Clone)]
pub struct RegularizedFit {
    /// Selected weight.
    pub lambda: f64,
    /// Infinity-norm distance of the unclipped design from the box center.
    pub deviation: f64,
    /// Selected design.
    pub p: DVector<f64>,
    /// Objective of the selected design.
    pub objective: f64,
    /// The search found no feasible weight and fell back to the largest one.
    pub fallback: bool,
}

/// Design for a single weight, with its deviation from the box center.
pub fn regularized_design(
    a: &DMatrix<f64>,
    target: &DVector<f64>,
    p_max: f64,
    lambda: f64,
) -> Result<(DVector<f64>, f64)> {
    let (n, m) = a.shape();
    if target.len() != n {
        return Err(DesignError::dimension("target", n, target.len()));
    }
    let center = 0.5 * p_max;
    let w = lambda.sqrt();

    let mut stacked = DMatrix::zeros(n + m, m);
    stacked.view_mut((0, 0), (n, m)).copy_from(a);
    stacked
        .view_mut((n, 0), (m, m))
        .fill_diagonal(w);

    let mut rhs = DVector::from_element(n + m, w * center);
    rhs.rows_mut(0, n).copy_from(target);

    let p = solve_least_squares(&stacked, &rhs)?;
    let deviation = p.iter().map(|v| (v - center).abs()).fold(0.0, f64::max);
    Ok((p, deviation))
}

/// Run the regularized least-squares search configured by `settings`.
pub fn regularized_least_squares(
    a: &DMatrix<f64>,
    target: &DVector<f64>,
    p_max: f64,
    settings: &DesignSettings,
) -> Result<RegularizedFit> {
    check_p_max(p_max)?;
    let lambdas = &settings.lambdas;
    check_lambdas(lambdas)?;
    let threshold = settings.deviation_fraction * p_max;

    let found = match settings.lambda_search {
        LambdaSearch::Linear => linear_search(a, target, p_max, lambdas, threshold)?,
        LambdaSearch::Bisection => bisection_search(a, target, p_max, lambdas, threshold)?,
    };

    let (lambda, p, deviation, fallback) = match found {
        Some((lambda, p, deviation)) => (lambda, p, deviation, false),
        None => {
            let largest = lambdas[lambdas.len() - 1];
            let (p, deviation) = regularized_design(a, target, p_max, largest)?;
            match settings.fallback {
                RegularizationFallback::Fail => {
                    return Err(DesignError::NoFeasibleRegularization {
                        largest_lambda: largest,
                        deviation,
                    });
                }
                RegularizationFallback::LargestLambda => {
                    log::warn!(
                        "no lambda within {:.4} of the box center; using lambda {:e} (deviation {:.4})",
                        threshold,
                        largest,
                        deviation
                    );
                    let (clipped, _) = clip_to_box(&p, p_max);
                    (largest, clipped, deviation, true)
                }
            }
        }
    };

    let objective = log_ratio_objective(a, &p, settings.epsilon)?;
    log::debug!(
        "regularized least squares: lambda {:e} deviation {:.4} objective {:.4}",
        lambda,
        deviation,
        objective
    );

    Ok(RegularizedFit {
        lambda,
        deviation,
        p,
        objective,
        fallback,
    })
}

type Found = Option<(f64, DVector<f64>, f64)>;

fn linear_search(
    a: &DMatrix<f64>,
    target: &DVector<f64>,
    p_max: f64,
    lambdas: &[f64],
    threshold: f64,
) -> Result<Found> {
    for &lambda in lambdas {
        let (p, deviation) = regularized_design(a, target, p_max, lambda)?;
        if deviation <= threshold {
            return Ok(Some((lambda, p, deviation)));
        }
    }
    Ok(None)
}

fn bisection_search(
    a: &DMatrix<f64>,
    target: &DVector<f64>,
    p_max: f64,
    lambdas: &[f64],
    threshold: f64,
) -> Result<Found> {
    // invariant: lambdas[..lo] infeasible, lambdas[hi..] feasible
    let (mut lo, mut hi) = (0, lambdas.len());
    let mut best = None;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let (p, deviation) = regularized_design(a, target, p_max, lambdas[mid])?;
        if deviation <= threshold {
            hi = mid;
            best = Some((lambdas[mid], p, deviation));
        } else {
            lo = mid + 1;
        }
    }
    Ok(best)
}
