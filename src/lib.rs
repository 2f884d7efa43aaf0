//! # illumopt
//!
//! Bounded linear-illumination design.
//!
//! Given an incidence matrix `A` (patches x lamps), a lamp power bound
//! `p_max` and a desired patch intensity, illumopt computes five candidate
//! lamp-power designs and ranks them by the log-ratio objective
//! `max_k |ln((A p)_k)|`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use illumopt::prelude::*;
//!
//! let problem = DesignProblem::new(reference_incidence(), 1.0, 1.0)?;
//! let comparison = BoundedLinearDesignSolver::new(&problem).run();
//!
//! println!("{comparison}");
//! println!("best: {}", comparison.best().unwrap().method);
//! ```
//!
//! ## Methods
//!
//! - **Uniform**: every lamp at the same level, scanned over `[0, p_max]`
//! - **LeastSquares**: unconstrained least squares, clipped into the box
//! - **RegularizedLeastSquares**: least squares pulled toward `p_max / 2`,
//!   with the weight searched until the design fits the box
//! - **Chebyshev**: minimize the worst-case intensity error (an LP)
//! - **Exact**: minimize the log-ratio objective itself (an SOCP)
//!
//! The last two are delegated to a [`solver::ConvexBackend`]; the default
//! backend uses the Clarabel interior-point solver.

pub mod config;
pub mod design;
pub mod error;
pub mod geometry;
pub mod heuristics;
pub mod io;
pub mod objective;
pub mod report;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use illumopt::prelude::*;
/// ```
pub mod prelude {
    // Problem and solver
    pub use crate::design::{BoundedLinearDesignSolver, DesignProblem};

    // Settings
    pub use crate::config::{DesignSettings, LambdaSearch, RegularizationFallback};

    // Results
    pub use crate::report::{Candidate, CandidateDetail, Comparison, Method};

    // Objective
    pub use crate::objective::log_ratio_objective;

    // Convex backend
    pub use crate::solver::{
        BackendSolution, ClarabelBackend, ConvexBackend, ObjectiveKind, Settings, SolveStatus,
    };

    // Data
    pub use crate::geometry::{reference_incidence, ReferenceGeometry};
    pub use crate::io::{load_matrix, parse_matrix};

    // Errors
    pub use crate::error::{DesignError, Result};
}

// Re-export main types at crate root
pub use design::{BoundedLinearDesignSolver, DesignProblem};
pub use error::{DesignError, Result};
pub use report::{Comparison, Method};
