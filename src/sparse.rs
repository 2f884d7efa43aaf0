//! Sparse matrix utilities.
//!
//! Helpers for assembling nalgebra-sparse matrices from triplets.

use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Row/column/value triplets accumulated before conversion to CSC.
#[derive(Debug, Clone, Default)]
pub struct Triplets {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub vals: Vec<f64>,
}

impl Triplets {
    /// Record a single entry. Exact zeros are skipped.
    pub fn push(&mut self, row: usize, col: usize, val: f64) {
        if val != 0.0 {
            self.rows.push(row);
            self.cols.push(col);
            self.vals.push(val);
        }
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.vals.len()
    }

    /// True if no entry has been recorded.
    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    /// Convert to a CSC matrix of the given size.
    pub fn into_csc(self, nrows: usize, ncols: usize) -> CscMatrix<f64> {
        csc_from_triplets(nrows, ncols, self.rows, self.cols, self.vals)
    }
}

/// Create a CSC matrix from triplets (row, col, value).
///
/// Duplicates are summed together. Out-of-range entries are dropped.
pub fn csc_from_triplets(
    nrows: usize,
    ncols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
) -> CscMatrix<f64> {
    if rows.is_empty() {
        return CscMatrix::zeros(nrows, ncols);
    }

    let mut coo = CooMatrix::new(nrows, ncols);
    for ((row, col), val) in rows.into_iter().zip(cols).zip(vals) {
        if row < nrows && col < ncols {
            coo.push(row, col, val);
        }
    }

    CscMatrix::from(&coo)
}
