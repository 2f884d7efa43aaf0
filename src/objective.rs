//! The log-ratio objective every candidate design is ranked by.
//!
//! For lamp powers `p` the patch intensities are `I = A p`, and the
//! objective is the worst-case deviation from unit intensity on a log
//! scale:
//!
//! ```text
//! f0(p) = max_k |ln(max(I_k, epsilon))|
//! ```
//!
//! The floor `epsilon` keeps unlit patches finite.

use nalgebra::{DMatrix, DVector};

use crate::config::check_epsilon;
use crate::error::{DesignError, Result};

/// Patch intensities `A p`.
pub fn intensities(a: &DMatrix<f64>, p: &DVector<f64>) -> Result<DVector<f64>> {
    if a.ncols() != p.len() {
        return Err(DesignError::dimension("power vector", a.ncols(), p.len()));
    }
    Ok(a * p)
}

/// Evaluate the log-ratio objective for `p`.
///
/// Always finite and non-negative for a finite `A`.
pub fn log_ratio_objective(a: &DMatrix<f64>, p: &DVector<f64>, epsilon: f64) -> Result<f64> {
    check_epsilon(epsilon)?;
    let intensity = intensities(a, p)?;
    Ok(intensity
        .iter()
        .map(|&i| i.max(epsilon).ln().abs())
        .fold(0.0, f64::max))
}
