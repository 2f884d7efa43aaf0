//! Clarabel solver integration.
//!
//! This module provides the default `ConvexBackend`, backed by the Clarabel
//! interior-point conic solver.

use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use nalgebra::{DMatrix, DVector};

use super::backend::{BackendSolution, ConvexBackend, ObjectiveKind, SolveStatus};
use super::stuffing::{stuff_problem, ConeDims, StuffedProblem};
use crate::error::{DesignError, Result};

impl From<SolverStatus> for SolveStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Solved => SolveStatus::Optimal,
            SolverStatus::AlmostSolved => SolveStatus::AlmostOptimal,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                SolveStatus::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                SolveStatus::Unbounded
            }
            SolverStatus::MaxIterations | SolverStatus::MaxTime => SolveStatus::MaxIterations,
            SolverStatus::NumericalError | SolverStatus::InsufficientProgress => {
                SolveStatus::NumericalError
            }
            _ => SolveStatus::Unknown,
        }
    }
}

/// Solver settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Print solver output.
    pub verbose: bool,
    /// Maximum iterations.
    pub max_iter: u32,
    /// Time limit in seconds.
    pub time_limit: f64,
    /// Absolute tolerance.
    pub tol_gap_abs: f64,
    /// Relative tolerance.
    pub tol_gap_rel: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            verbose: false,
            max_iter: 100,
            time_limit: f64::INFINITY,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
        }
    }
}

/// Convex backend that solves the design programs with Clarabel.
#[derive(Debug, Clone, Default)]
pub struct ClarabelBackend {
    settings: Settings,
}

impl ClarabelBackend {
    /// Create a backend with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with custom settings.
    pub fn with_settings(settings: Settings) -> Self {
        ClarabelBackend { settings }
    }

    /// Settings in use.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl ConvexBackend for ClarabelBackend {
    fn solve(
        &self,
        kind: ObjectiveKind,
        a: &DMatrix<f64>,
        bound: f64,
        target: f64,
    ) -> Result<BackendSolution> {
        if !(target.is_finite() && target > 0.0) {
            return Err(DesignError::InvalidProblem(format!(
                "target intensity must be positive, got {target}"
            )));
        }
        if !(bound.is_finite() && bound >= 0.0) {
            return Err(DesignError::InvalidProblem(format!(
                "power bound must be non-negative, got {bound}"
            )));
        }
        let stuffed = stuff_problem(kind, a, bound, target);
        log::debug!(
            "clarabel: {} program with {} variables, {} rows",
            kind,
            stuffed.num_vars(),
            stuffed.b.len()
        );
        solve(&stuffed, &self.settings)
    }
}

/// Solve the stuffed problem using Clarabel.
pub fn solve(problem: &StuffedProblem, settings: &Settings) -> Result<BackendSolution> {
    let p = to_clarabel_csc(&problem.p);
    let a = to_clarabel_csc(&problem.a);
    let cones = to_clarabel_cones(&problem.cone_dims);

    let clarabel_settings = DefaultSettingsBuilder::default()
        .verbose(settings.verbose)
        .max_iter(settings.max_iter)
        .time_limit(settings.time_limit)
        .tol_gap_abs(settings.tol_gap_abs)
        .tol_gap_rel(settings.tol_gap_rel)
        .build()
        .map_err(|e| DesignError::InvalidProblem(format!("solver settings: {e}")))?;

    let mut solver = DefaultSolver::new(&p, &problem.q, &a, &problem.b, &cones, clarabel_settings);
    solver.solve();

    let status: SolveStatus = solver.solution.status.into();
    let solve_time = solver.solution.solve_time;
    let iterations = solver.info.iterations;

    if !status.is_solved() {
        log::warn!("clarabel: stopped with status {}", status);
        return Ok(BackendSolution {
            iterations,
            solve_time,
            ..BackendSolution::failed(status)
        });
    }
    if status == SolveStatus::AlmostOptimal {
        log::warn!("clarabel: solved to reduced accuracy");
    }

    let x = &solver.solution.x;
    let powers = DVector::from_column_slice(&x[..problem.num_powers]);
    let value = compute_objective(x, &problem.q);

    Ok(BackendSolution {
        status,
        p: Some(powers),
        value: Some(value),
        iterations,
        solve_time,
    })
}

/// Convert nalgebra CSC to Clarabel CSC.
fn to_clarabel_csc(m: &nalgebra_sparse::CscMatrix<f64>) -> ClarabelCsc<f64> {
    ClarabelCsc::new(
        m.nrows(),
        m.ncols(),
        m.col_offsets().to_vec(),
        m.row_indices().to_vec(),
        m.values().to_vec(),
    )
}

/// Convert cone dimensions to Clarabel cones.
fn to_clarabel_cones(dims: &ConeDims) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::new();

    if dims.nonneg > 0 {
        cones.push(SupportedConeT::NonnegativeConeT(dims.nonneg));
    }

    for &soc_dim in &dims.soc {
        cones.push(SupportedConeT::SecondOrderConeT(soc_dim));
    }

    cones
}

/// Linear objective `q' x`; both programs have `P = 0`.
fn compute_objective(x: &[f64], q: &[f64]) -> f64 {
    q.iter().zip(x.iter()).map(|(qi, xi)| qi * xi).sum()
}
