//! Settings for the design comparison.
//!
//! Every numerical knob of the heuristics lives here rather than as a
//! constant, so callers can tune behavior per dataset scale.

use crate::error::{DesignError, Result};

/// How the regularization weight is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LambdaSearch {
    /// Walk the sequence in order and stop at the first feasible lambda.
    #[default]
    Linear,
    /// Binary search over the sequence. Assumes feasibility is monotone in lambda.
    Bisection,
}

/// What to do when no lambda keeps the regularized design inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegularizationFallback {
    /// Surface `NoFeasibleRegularization`.
    #[default]
    Fail,
    /// Use the largest lambda tested, clipped into the box.
    LargestLambda,
}

/// Settings for a design comparison run.
#[derive(Debug, Clone)]
pub struct DesignSettings {
    /// Floor applied to intensities before taking the logarithm.
    pub epsilon: f64,
    /// Number of levels scanned by the uniform-power heuristic.
    pub uniform_samples: usize,
    /// Strictly increasing, positive regularization weights.
    pub lambdas: Vec<f64>,
    /// Allowed infinity-norm deviation from `0.5 * p_max`, as a fraction of `p_max`.
    pub deviation_fraction: f64,
    /// Search policy over `lambdas`.
    pub lambda_search: LambdaSearch,
    /// Behavior when no lambda is feasible.
    pub fallback: RegularizationFallback,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            epsilon: 1e-8,
            uniform_samples: 15,
            lambdas: logspace(-3.0, 2.0, 15),
            deviation_fraction: 0.5,
            lambda_search: LambdaSearch::Linear,
            fallback: RegularizationFallback::Fail,
        }
    }
}

impl DesignSettings {
    /// Set the logarithm floor.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the number of uniform scan levels.
    pub fn with_uniform_samples(mut self, samples: usize) -> Self {
        self.uniform_samples = samples;
        self
    }

    /// Set the regularization sequence.
    pub fn with_lambdas(mut self, lambdas: impl Into<Vec<f64>>) -> Self {
        self.lambdas = lambdas.into();
        self
    }

    /// Set the deviation threshold as a fraction of `p_max`.
    pub fn with_deviation_fraction(mut self, fraction: f64) -> Self {
        self.deviation_fraction = fraction;
        self
    }

    /// Set the lambda search policy.
    pub fn with_lambda_search(mut self, search: LambdaSearch) -> Self {
        self.lambda_search = search;
        self
    }

    /// Set the fallback policy.
    pub fn with_fallback(mut self, fallback: RegularizationFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Check the settings for internal consistency.
    pub fn validate(&self) -> Result<()> {
        check_epsilon(self.epsilon)?;
        if self.uniform_samples == 0 {
            return Err(DesignError::InvalidProblem(
                "uniform scan needs at least one sample".into(),
            ));
        }
        check_lambdas(&self.lambdas)?;
        if !(self.deviation_fraction.is_finite() && self.deviation_fraction > 0.0) {
            return Err(DesignError::InvalidProblem(format!(
                "deviation fraction must be positive, got {}",
                self.deviation_fraction
            )));
        }
        Ok(())
    }
}

pub(crate) fn check_epsilon(epsilon: f64) -> Result<()> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(())
    } else {
        Err(DesignError::InvalidProblem(format!(
            "log floor must be finite and positive, got {epsilon}"
        )))
    }
}

pub(crate) fn check_lambdas(lambdas: &[f64]) -> Result<()> {
    if lambdas.is_empty() {
        return Err(DesignError::InvalidProblem("lambda sequence is empty".into()));
    }
    if lambdas.iter().any(|l| !(l.is_finite() && *l > 0.0)) {
        return Err(DesignError::InvalidProblem(
            "lambdas must be finite and positive".into(),
        ));
    }
    if lambdas.windows(2).any(|w| w[1] <= w[0]) {
        return Err(DesignError::InvalidProblem(
            "lambdas must be strictly increasing".into(),
        ));
    }
    Ok(())
}

/// `count` points spaced evenly on a log scale from `10^start` to `10^stop`.
pub fn logspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    linspace(start, stop, count)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

/// `count` evenly spaced points from `start` to `stop` inclusive.
///
/// A single point degenerates to `start`.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}
