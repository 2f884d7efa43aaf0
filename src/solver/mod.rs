//! Convex solver boundary.
//!
//! This module provides:
//! - The `ConvexBackend` trait the design solver delegates convex programs to
//! - Matrix stuffing of the two box-constrained programs into conic form
//! - Clarabel solver integration

pub mod backend;
pub mod clarabel;
pub mod stuffing;

pub use self::backend::{BackendSolution, ConvexBackend, ObjectiveKind, SolveStatus};
pub use self::clarabel::{ClarabelBackend, Settings};
pub use stuffing::{stuff_problem, ConeDims, StuffedProblem};
