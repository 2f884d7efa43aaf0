//! Matrix stuffing: converts the design programs to solver format.
//!
//! Both programs use the optimization variable `x = [p; t]` (m lamp powers
//! plus an epigraph variable) and minimize `t`. Rows are laid out for the
//! conic form
//!
//! ```text
//! minimize    (1/2) x' P x + q' x
//! subject to  A x + s = b,  s in K
//! ```
//!
//! with all nonnegative rows first, followed by the second-order cones.

use nalgebra::DMatrix;
use nalgebra_sparse::CscMatrix;

use super::backend::ObjectiveKind;
use crate::sparse::Triplets;

/// Cone dimensions for Clarabel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConeDims {
    /// Number of nonnegative cone constraints.
    pub nonneg: usize,
    /// Second-order cone dimensions (each entry is the cone dimension).
    pub soc: Vec<usize>,
}

impl ConeDims {
    /// Total number of constraint rows.
    pub fn total(&self) -> usize {
        self.nonneg + self.soc.iter().sum::<usize>()
    }
}

/// Stuffed problem ready for Clarabel.
#[derive(Debug)]
pub struct StuffedProblem {
    /// Quadratic cost matrix P (zero for both programs).
    pub p: CscMatrix<f64>,
    /// Linear cost vector q, selecting `t`.
    pub q: Vec<f64>,
    /// Constraint matrix A.
    pub a: CscMatrix<f64>,
    /// Constraint vector b.
    pub b: Vec<f64>,
    /// Cone dimensions.
    pub cone_dims: ConeDims,
    /// Number of lamp powers at the head of `x`.
    pub num_powers: usize,
}

impl StuffedProblem {
    /// Total number of optimization variables.
    pub fn num_vars(&self) -> usize {
        self.num_powers + 1
    }
}

/// Row-by-row assembly of `A` and `b`.
struct RowWriter {
    triplets: Triplets,
    b: Vec<f64>,
}

impl RowWriter {
    fn new() -> Self {
        RowWriter {
            triplets: Triplets::default(),
            b: Vec::new(),
        }
    }

    /// Append the row `sum_j coeffs[j] x_j` with right-hand side `rhs`.
    fn row(&mut self, coeffs: impl IntoIterator<Item = (usize, f64)>, rhs: f64) {
        let r = self.b.len();
        for (col, val) in coeffs {
            self.triplets.push(r, col, val);
        }
        self.b.push(rhs);
    }

    fn rows(&self) -> usize {
        self.b.len()
    }
}

/// Build the stuffed program for `kind`.
///
/// The caller guarantees `target > 0` and `bound >= 0`.
pub fn stuff_problem(
    kind: ObjectiveKind,
    a: &DMatrix<f64>,
    bound: f64,
    target: f64,
) -> StuffedProblem {
    let (n, m) = a.shape();
    let t = m;
    let mut w = RowWriter::new();

    let cone_dims = match kind {
        ObjectiveKind::Chebyshev => {
            // |A_k p - target| <= t
            for k in 0..n {
                let row = a.row(k);
                w.row(
                    row.iter().enumerate().map(|(j, &v)| (j, v)).chain([(t, -1.0)]),
                    target,
                );
                w.row(
                    row.iter().enumerate().map(|(j, &v)| (j, -v)).chain([(t, -1.0)]),
                    -target,
                );
            }
            stuff_box(&mut w, m, bound);
            ConeDims {
                nonneg: w.rows(),
                soc: Vec::new(),
            }
        }
        ObjectiveKind::LogRatio => {
            let scale = 1.0 / target;
            // I_k / target <= t
            for k in 0..n {
                w.row(
                    a.row(k)
                        .iter()
                        .enumerate()
                        .map(|(j, &v)| (j, v * scale))
                        .chain([(t, -1.0)]),
                    0.0,
                );
            }
            stuff_box(&mut w, m, bound);
            let nonneg = w.rows();

            // t * (I_k / target) >= 1 as ||(2, t - I_k')|| <= t + I_k'
            for k in 0..n {
                let row = a.row(k);
                w.row(
                    row.iter()
                        .enumerate()
                        .map(|(j, &v)| (j, -v * scale))
                        .chain([(t, -1.0)]),
                    0.0,
                );
                w.row(std::iter::empty::<(usize, f64)>(), 2.0);
                w.row(
                    row.iter()
                        .enumerate()
                        .map(|(j, &v)| (j, v * scale))
                        .chain([(t, -1.0)]),
                    0.0,
                );
            }
            ConeDims {
                nonneg,
                soc: vec![3; n],
            }
        }
    };

    let num_vars = m + 1;
    let mut q = vec![0.0; num_vars];
    q[t] = 1.0;

    let rows = w.rows();
    StuffedProblem {
        p: CscMatrix::zeros(num_vars, num_vars),
        q,
        a: w.triplets.into_csc(rows, num_vars),
        b: w.b,
        cone_dims,
        num_powers: m,
    }
}

/// `0 <= p_j <= bound` as nonnegative rows.
fn stuff_box(w: &mut RowWriter, m: usize, bound: f64) {
    for j in 0..m {
        w.row([(j, -1.0)], 0.0);
        w.row([(j, 1.0)], bound);
    }
}
