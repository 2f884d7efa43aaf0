//! Uniform-power heuristic.

use nalgebra::{DMatrix, DVector};

use super::check_p_max;
use crate::config::linspace;
use crate::error::{DesignError, Result};
use crate::objective::log_ratio_objective;

/// Outcome of a uniform-power scan.
#[derive(Debug, Clone)]
pub struct UniformScan {
    /// Level shared by every lamp in the best design.
    pub level: f64,
    /// Best design, `level * 1`.
    pub p: DVector<f64>,
    /// Objective at `level`.
    pub objective: f64,
    /// `(level, objective)` for every scanned level, in scan order.
    pub curve: Vec<(f64, f64)>,
}

/// Scan `samples` uniform levels in `[0, p_max]` and keep the best one.
///
/// Ties go to the earliest level in scan order. A single sample only
/// evaluates level 0.
pub fn uniform_scan(
    a: &DMatrix<f64>,
    p_max: f64,
    samples: usize,
    epsilon: f64,
) -> Result<UniformScan> {
    check_p_max(p_max)?;
    if samples == 0 {
        return Err(DesignError::InvalidProblem(
            "uniform scan needs at least one sample".into(),
        ));
    }

    let m = a.ncols();
    let mut curve = Vec::with_capacity(samples);
    let mut best: Option<(f64, f64)> = None;

    for level in linspace(0.0, p_max, samples) {
        let p = DVector::from_element(m, level);
        let f0 = log_ratio_objective(a, &p, epsilon)?;
        curve.push((level, f0));
        if best.map_or(true, |(_, best_f0)| f0 < best_f0) {
            best = Some((level, f0));
        }
    }

    // samples >= 1, so the scan visited at least one level
    let (level, objective) = best.unwrap_or((0.0, f64::INFINITY));
    log::debug!("uniform scan: best level {:.4} objective {:.4}", level, objective);

    Ok(UniformScan {
        level,
        p: DVector::from_element(m, level),
        objective,
        curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn test_single_sample_exercises_floor() {
        let a = DMatrix::from_element(4, 3, 0.5);
        let scan = uniform_scan(&a, 1.0, 1, 1e-8).unwrap();
        assert_eq!(scan.level, 0.0);
        assert!(scan.p.iter().all(|&v| v == 0.0));
        assert_float_eq!(scan.objective, 1e-8f64.ln().abs(), abs <= 1e-9);
        assert_eq!(scan.curve.len(), 1);
    }

    #[test]
    fn test_finds_exact_level() {
        // rows sum to 2, so level 0.5 gives unit intensity
        let a = DMatrix::from_element(3, 4, 0.5);
        let scan = uniform_scan(&a, 1.0, 5, 1e-8).unwrap();
        assert_float_eq!(scan.level, 0.5, abs <= 1e-15);
        assert_float_eq!(scan.objective, 0.0, abs <= 1e-12);
        assert_eq!(scan.curve.len(), 5);
    }

    #[test]
    fn test_ties_keep_first_level() {
        // unlit patches: every level hits the floor and scores |ln eps|
        let a = DMatrix::zeros(2, 2);
        let scan = uniform_scan(&a, 1.0, 3, 1e-8).unwrap();
        let levels: Vec<f64> = scan.curve.iter().map(|(l, _)| *l).collect();
        assert_eq!(levels, vec![0.0, 0.5, 1.0]);
        for (_, f0) in &scan.curve {
            assert_eq!(*f0, scan.curve[0].1);
        }
        assert_eq!(scan.level, 0.0);
        assert!(scan.p.iter().all(|&v| v == 0.0));

        // level 0.5 -> intensity 0.5, level 2 -> intensity 2: same |ln|,
        // but 1.0 is in the grid and wins outright
        let a = DMatrix::identity(2, 2);
        let scan = uniform_scan(&a, 2.0, 5, 1e-8).unwrap();
        assert_float_eq!(scan.curve[1].1, scan.curve[4].1, abs <= 1e-12);
        assert_float_eq!(scan.level, 1.0, abs <= 1e-15);
    }

    #[test]
    fn test_rejects_bad_bound() {
        let a = DMatrix::identity(2, 2);
        for p_max in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                uniform_scan(&a, p_max, 3, 1e-8),
                Err(DesignError::InvalidProblem(_))
            ));
        }
    }

    #[test]
    fn test_zero_samples_rejected() {
        let a = DMatrix::identity(2, 2);
        assert!(uniform_scan(&a, 1.0, 0, 1e-8).is_err());
    }
}
