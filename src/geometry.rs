//! Reference illumination geometry.
//!
//! Lamps hang at fixed heights above a gently curved floor split into flat
//! patches. Lamp `j` lights patch `k` with
//!
//! ```text
//! A[k, j] = max(cos(theta_kj), 0) / r_kj^2
//! ```
//!
//! where `r_kj` is the distance from the patch midpoint to the lamp and
//! `theta_kj` the angle between the patch normal and the lamp direction.
//! The matrix is scaled so that every lamp at `uniform_level` gives a mean
//! patch intensity of 1.

use std::f64::consts::PI;

use nalgebra::DMatrix;

use crate::error::{DesignError, Result};

const LAMP_HEIGHTS: [f64; 10] = [0.45, 0.6, 0.4, 0.7, 0.5, 0.65, 0.42, 0.55, 0.75, 0.48];

/// Floor height at horizontal position `x` in `[0, 1]`.
fn floor_height(x: f64) -> f64 {
    0.05 * (3.0 * PI * x).sin()
}

/// Parameters of the reference geometry.
#[derive(Debug, Clone)]
pub struct ReferenceGeometry {
    /// Number of floor patches (rows of `A`).
    pub patches: usize,
    /// Number of lamps (columns of `A`).
    pub lamps: usize,
    /// Uniform power that yields unit mean intensity.
    pub uniform_level: f64,
}

impl Default for ReferenceGeometry {
    fn default() -> Self {
        ReferenceGeometry {
            patches: 20,
            lamps: 10,
            uniform_level: 0.5,
        }
    }
}

impl ReferenceGeometry {
    /// Lamp positions `(x, height)`, evenly spaced across the floor.
    pub fn lamp_positions(&self) -> Vec<(f64, f64)> {
        (0..self.lamps)
            .map(|j| {
                let x = (j as f64 + 0.5) / self.lamps as f64;
                (x, LAMP_HEIGHTS[j % LAMP_HEIGHTS.len()])
            })
            .collect()
    }

    /// Patch midpoints and unit normals `((x, y), (nx, ny))`.
    pub fn patch_frames(&self) -> Vec<((f64, f64), (f64, f64))> {
        (0..self.patches)
            .map(|k| {
                let x0 = k as f64 / self.patches as f64;
                let x1 = (k + 1) as f64 / self.patches as f64;
                let (y0, y1) = (floor_height(x0), floor_height(x1));
                let (dx, dy) = (x1 - x0, y1 - y0);
                let len = dx.hypot(dy);
                let mid = (0.5 * (x0 + x1), 0.5 * (y0 + y1));
                (mid, (-dy / len, dx / len))
            })
            .collect()
    }

    /// Build the incidence matrix.
    pub fn incidence(&self) -> Result<DMatrix<f64>> {
        if self.patches == 0 || self.lamps == 0 {
            return Err(DesignError::InvalidProblem(
                "geometry needs at least one patch and one lamp".into(),
            ));
        }
        if !(self.uniform_level.is_finite() && self.uniform_level > 0.0) {
            return Err(DesignError::InvalidProblem(format!(
                "uniform level must be positive, got {}",
                self.uniform_level
            )));
        }

        Ok(self.build())
    }

    fn build(&self) -> DMatrix<f64> {
        let lamps = self.lamp_positions();
        let frames = self.patch_frames();
        let mut a = DMatrix::from_fn(self.patches, self.lamps, |k, j| {
            let ((px, py), (nx, ny)) = frames[k];
            let (lx, ly) = lamps[j];
            let (vx, vy) = (lx - px, ly - py);
            let r2 = vx * vx + vy * vy;
            let cos = (nx * vx + ny * vy) / r2.sqrt();
            cos.max(0.0) / r2
        });

        let mean = a.column_sum().mean();
        a /= self.uniform_level * mean;
        a
    }
}

/// The 20 x 10 reference incidence matrix.
pub fn reference_incidence() -> DMatrix<f64> {
    ReferenceGeometry::default().build()
}
