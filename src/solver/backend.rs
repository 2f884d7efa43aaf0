//! The capability the design solver needs from a convex solver.

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::error::Result;

/// Which box-constrained program to solve over `I = A p`, `0 <= p <= bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectiveKind {
    /// Minimize `max_k |I_k - target|`.
    Chebyshev,
    /// Minimize `max_k max(I_k / target, target / I_k)`.
    LogRatio,
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveKind::Chebyshev => write!(f, "chebyshev"),
            ObjectiveKind::LogRatio => write!(f, "log-ratio"),
        }
    }
}

/// Solution status from the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// Solved to reduced accuracy.
    AlmostOptimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Maximum iterations or time reached.
    MaxIterations,
    /// Numerical difficulties.
    NumericalError,
    /// Unknown status.
    Unknown,
}

impl SolveStatus {
    /// True if the solution can be used.
    pub fn is_solved(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::AlmostOptimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::AlmostOptimal => "optimal (reduced accuracy)",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::MaxIterations => "maximum iterations reached",
            SolveStatus::NumericalError => "numerical error",
            SolveStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Result of a single backend call.
#[derive(Debug, Clone)]
pub struct BackendSolution {
    /// Solution status.
    pub status: SolveStatus,
    /// Optimal lamp powers (if solved).
    pub p: Option<DVector<f64>>,
    /// Optimal value of the backend objective (if solved).
    pub value: Option<f64>,
    /// Number of iterations.
    pub iterations: u32,
    /// Solve time in seconds.
    pub solve_time: f64,
}

impl BackendSolution {
    /// A solution carrying only a failure status.
    pub fn failed(status: SolveStatus) -> Self {
        BackendSolution {
            status,
            p: None,
            value: None,
            iterations: 0,
            solve_time: 0.0,
        }
    }
}

/// A convex-program solver able to handle the two design programs.
///
/// Implementations report solver-side failures through
/// `BackendSolution::status`; `Err` is reserved for problems that could not
/// be set up at all.
pub trait ConvexBackend {
    /// Solve `kind` for incidence matrix `a`, box bound `bound` and target intensity `target`.
    fn solve(
        &self,
        kind: ObjectiveKind,
        a: &DMatrix<f64>,
        bound: f64,
        target: f64,
    ) -> Result<BackendSolution>;
}

impl<B: ConvexBackend + ?Sized> ConvexBackend for &B {
    fn solve(
        &self,
        kind: ObjectiveKind,
        a: &DMatrix<f64>,
        bound: f64,
        target: f64,
    ) -> Result<BackendSolution> {
        (**self).solve(kind, a, bound, target)
    }
}
