//! Bounded linear-illumination design.
//!
//! A `DesignProblem` holds the incidence matrix `A` (patches x lamps), the
//! lamp power bound and the desired patch intensity. The
//! `BoundedLinearDesignSolver` produces the five candidate designs and
//! collects them into a `Comparison`:
//!
//! ```ignore
//! use illumopt::prelude::*;
//!
//! let problem = DesignProblem::new(a, 1.0, 1.0)?;
//! let comparison = BoundedLinearDesignSolver::new(&problem).run();
//! println!("{comparison}");
//! ```

use nalgebra::{DMatrix, DVector};

use crate::config::DesignSettings;
use crate::error::{DesignError, Result};
use crate::heuristics::{
    clip_to_box, least_squares_clip, regularized_least_squares, uniform_scan,
};
use crate::objective::log_ratio_objective;
use crate::report::{Candidate, CandidateDetail, Comparison, Method};
use crate::solver::{ClarabelBackend, ConvexBackend, ObjectiveKind};

/// Validated design data.
#[derive(Debug, Clone)]
pub struct DesignProblem {
    a: DMatrix<f64>,
    p_max: f64,
    desired: f64,
}

impl DesignProblem {
    /// Create a problem from a non-negative incidence matrix.
    pub fn new(a: DMatrix<f64>, p_max: f64, desired: f64) -> Result<Self> {
        if a.nrows() == 0 || a.ncols() == 0 {
            return Err(DesignError::InvalidProblem(format!(
                "incidence matrix must be non-empty, got {}x{}",
                a.nrows(),
                a.ncols()
            )));
        }
        if let Some(((i, j), v)) = a
            .iter()
            .enumerate()
            .map(|(idx, v)| ((idx % a.nrows(), idx / a.nrows()), *v))
            .find(|(_, v)| !(v.is_finite() && *v >= 0.0))
        {
            return Err(DesignError::InvalidProblem(format!(
                "incidence entry ({i}, {j}) must be finite and non-negative, got {v}"
            )));
        }
        if !(p_max.is_finite() && p_max > 0.0) {
            return Err(DesignError::InvalidProblem(format!(
                "power bound must be positive, got {p_max}"
            )));
        }
        if !(desired.is_finite() && desired > 0.0) {
            return Err(DesignError::InvalidProblem(format!(
                "desired intensity must be positive, got {desired}"
            )));
        }
        Ok(DesignProblem { a, p_max, desired })
    }

    /// Incidence matrix.
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// Lamp power bound.
    pub fn p_max(&self) -> f64 {
        self.p_max
    }

    /// Desired patch intensity.
    pub fn desired(&self) -> f64 {
        self.desired
    }

    /// Number of patches.
    pub fn patches(&self) -> usize {
        self.a.nrows()
    }

    /// Number of lamps.
    pub fn lamps(&self) -> usize {
        self.a.ncols()
    }

    /// Desired intensity replicated for every patch.
    pub fn target(&self) -> DVector<f64> {
        DVector::from_element(self.patches(), self.desired)
    }
}

/// Runs the candidate methods on a `DesignProblem`.
#[derive(Debug, Clone)]
pub struct BoundedLinearDesignSolver<'a, B = ClarabelBackend> {
    problem: &'a DesignProblem,
    settings: DesignSettings,
    backend: B,
}

impl<'a> BoundedLinearDesignSolver<'a, ClarabelBackend> {
    /// Solver with default settings and the Clarabel backend.
    pub fn new(problem: &'a DesignProblem) -> Self {
        BoundedLinearDesignSolver {
            problem,
            settings: DesignSettings::default(),
            backend: ClarabelBackend::new(),
        }
    }
}

impl<'a, B: ConvexBackend> BoundedLinearDesignSolver<'a, B> {
    /// Replace the settings.
    pub fn settings(mut self, settings: DesignSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the convex backend.
    pub fn backend<B2: ConvexBackend>(self, backend: B2) -> BoundedLinearDesignSolver<'a, B2> {
        BoundedLinearDesignSolver {
            problem: self.problem,
            settings: self.settings,
            backend,
        }
    }

    /// Settings in use.
    pub fn current_settings(&self) -> &DesignSettings {
        &self.settings
    }

    /// Evaluate the log-ratio objective for any design.
    pub fn objective(&self, p: &DVector<f64>) -> Result<f64> {
        log_ratio_objective(&self.problem.a, p, self.settings.epsilon)
    }

    /// Best uniform-power design.
    pub fn uniform(&self) -> Result<Candidate> {
        let scan = uniform_scan(
            &self.problem.a,
            self.problem.p_max,
            self.settings.uniform_samples,
            self.settings.epsilon,
        )?;
        Ok(Candidate {
            method: Method::Uniform,
            p: scan.p,
            objective: scan.objective,
            detail: CandidateDetail::Uniform {
                level: scan.level,
                curve: scan.curve,
            },
        })
    }

    /// Clipped least-squares design.
    pub fn least_squares(&self) -> Result<Candidate> {
        let fit = least_squares_clip(
            &self.problem.a,
            &self.problem.target(),
            self.problem.p_max,
            self.settings.epsilon,
        )?;
        Ok(Candidate {
            method: Method::LeastSquares,
            p: fit.p,
            objective: fit.objective,
            detail: CandidateDetail::LeastSquares {
                clipped: fit.clipped,
            },
        })
    }

    /// Regularized least-squares design.
    pub fn regularized_least_squares(&self) -> Result<Candidate> {
        let fit = regularized_least_squares(
            &self.problem.a,
            &self.problem.target(),
            self.problem.p_max,
            &self.settings,
        )?;
        Ok(Candidate {
            method: Method::RegularizedLeastSquares,
            p: fit.p,
            objective: fit.objective,
            detail: CandidateDetail::Regularized {
                lambda: fit.lambda,
                deviation: fit.deviation,
                fallback: fit.fallback,
            },
        })
    }

    /// Chebyshev design: minimize `||A p - desired 1||_inf` over the box.
    pub fn chebyshev(&self) -> Result<Candidate> {
        self.convex(
            Method::Chebyshev,
            ObjectiveKind::Chebyshev,
            self.problem.desired,
        )
    }

    /// Exact design: minimize the log-ratio objective over the box.
    pub fn exact(&self) -> Result<Candidate> {
        // the objective measures intensity against 1
        self.convex(Method::Exact, ObjectiveKind::LogRatio, 1.0)
    }

    fn convex(&self, method: Method, kind: ObjectiveKind, target: f64) -> Result<Candidate> {
        let solution = self
            .backend
            .solve(kind, &self.problem.a, self.problem.p_max, target)?;
        let status = solution.status;
        let (p, value) = match (status.is_solved(), solution.p, solution.value) {
            (true, Some(p), Some(value)) => (p, value),
            _ => return Err(DesignError::SolverFailure(status.to_string())),
        };
        if p.len() != self.problem.lamps() {
            return Err(DesignError::dimension("backend solution", self.problem.lamps(), p.len()));
        }
        // drop interior-point round-off outside the box
        let (p, _) = clip_to_box(&p, self.problem.p_max);
        let objective = self.objective(&p)?;
        log::debug!(
            "{}: status {} solver value {:.6} objective {:.4}",
            method,
            status,
            value,
            objective
        );
        Ok(Candidate {
            method,
            p,
            objective,
            detail: CandidateDetail::Convex {
                status,
                solver_value: value,
                iterations: solution.iterations,
                solve_time: solution.solve_time,
            },
        })
    }

    /// Run one method.
    pub fn run_method(&self, method: Method) -> Result<Candidate> {
        match method {
            Method::Uniform => self.uniform(),
            Method::LeastSquares => self.least_squares(),
            Method::RegularizedLeastSquares => self.regularized_least_squares(),
            Method::Chebyshev => self.chebyshev(),
            Method::Exact => self.exact(),
        }
    }

    /// Run all five methods in order and collect their outcomes.
    ///
    /// A failing method is recorded with its error; the others still run.
    /// Invalid settings are recorded as the error of every method.
    pub fn run(&self) -> Comparison {
        let mut comparison = Comparison::new();
        for method in Method::ALL {
            let outcome = self
                .settings
                .validate()
                .and_then(|()| self.run_method(method));
            if let Err(e) = &outcome {
                log::warn!("{}: {}", method, e);
            }
            comparison.insert(method, outcome);
        }
        if let Some(best) = comparison.best() {
            log::info!(
                "design comparison: best method {} with objective {:.4}",
                best.method,
                best.objective
            );
        }
        comparison
    }
}
