//! Candidate result set and the comparison table.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::DVector;

use crate::error::{DesignError, Result};
use crate::solver::SolveStatus;

/// The five design methods, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Uniform,
    LeastSquares,
    RegularizedLeastSquares,
    Chebyshev,
    Exact,
}

impl Method {
    /// All methods in table order.
    pub const ALL: [Method; 5] = [
        Method::Uniform,
        Method::LeastSquares,
        Method::RegularizedLeastSquares,
        Method::Chebyshev,
        Method::Exact,
    ];

    /// Display name used in the table.
    pub fn name(self) -> &'static str {
        match self {
            Method::Uniform => "Uniform",
            Method::LeastSquares => "LeastSquares",
            Method::RegularizedLeastSquares => "RegularizedLeastSquares",
            Method::Chebyshev => "Chebyshev",
            Method::Exact => "Exact",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Method-specific information about how a candidate was produced.
#[derive(Debug, Clone)]
pub enum CandidateDetail {
    /// Uniform scan: the chosen level and the whole `(level, objective)` curve.
    Uniform { level: f64, curve: Vec<(f64, f64)> },
    /// Least squares: components moved by the clip.
    LeastSquares { clipped: usize },
    /// Regularized least squares: the selected weight.
    Regularized {
        lambda: f64,
        deviation: f64,
        fallback: bool,
    },
    /// Convex backend solve.
    Convex {
        status: SolveStatus,
        solver_value: f64,
        iterations: u32,
        solve_time: f64,
    },
}

/// A candidate design and its objective.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Method that produced the design.
    pub method: Method,
    /// Lamp powers, within `[0, p_max]`.
    pub p: DVector<f64>,
    /// Log-ratio objective of `p`.
    pub objective: f64,
    /// How the method arrived at `p`.
    pub detail: CandidateDetail,
}

/// Results of a comparison run, keyed by method.
///
/// Each method's outcome is recorded once. A failed method keeps its error
/// without affecting the others.
#[derive(Debug, Default)]
pub struct Comparison {
    results: BTreeMap<Method, Result<Candidate>>,
}

impl Comparison {
    /// Empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for `method`. Returns false if it was already recorded.
    pub fn insert(&mut self, method: Method, outcome: Result<Candidate>) -> bool {
        if self.results.contains_key(&method) {
            return false;
        }
        self.results.insert(method, outcome);
        true
    }

    /// Outcome for `method`, if recorded.
    pub fn get(&self, method: Method) -> Option<&Result<Candidate>> {
        self.results.get(&method)
    }

    /// Successful candidate for `method`.
    pub fn candidate(&self, method: Method) -> Option<&Candidate> {
        self.results.get(&method).and_then(|r| r.as_ref().ok())
    }

    /// Iterate outcomes in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Method, &Result<Candidate>)> {
        self.results.iter().map(|(m, r)| (*m, r))
    }

    /// Number of recorded methods.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True if every method was recorded and succeeded.
    pub fn is_complete(&self) -> bool {
        Method::ALL
            .iter()
            .all(|m| matches!(self.results.get(m), Some(Ok(_))))
    }

    /// Successful candidates sorted by objective, ties in table order.
    pub fn ranking(&self) -> Vec<&Candidate> {
        let mut ranked: Vec<&Candidate> =
            self.results.values().filter_map(|r| r.as_ref().ok()).collect();
        ranked.sort_by(|a, b| a.objective.total_cmp(&b.objective));
        ranked
    }

    /// Candidate with the smallest objective.
    pub fn best(&self) -> Option<&Candidate> {
        self.ranking().into_iter().next()
    }

    /// All candidates in table order, or the first failure.
    pub fn into_strict(mut self) -> Result<Vec<Candidate>> {
        Method::ALL
            .into_iter()
            .map(|method| {
                self.results.remove(&method).unwrap_or_else(|| {
                    Err(DesignError::InvalidProblem(format!(
                        "method {method} was not run"
                    )))
                })
            })
            .collect()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = Method::ALL.iter().map(|m| m.name().len()).max().unwrap_or(0);
        writeln!(f, "{:<width$}  {:>10}  p", "method", "objective")?;
        for (method, outcome) in self.iter() {
            match outcome {
                Ok(c) => {
                    let p: Vec<String> = c.p.iter().map(|v| format!("{v:.4}")).collect();
                    writeln!(
                        f,
                        "{:<width$}  {:>10.4}  [{}]",
                        method.name(),
                        c.objective,
                        p.join(", ")
                    )?;
                }
                Err(e) => writeln!(f, "{:<width$}  {:>10}  {}", method.name(), "failed", e)?,
            }
        }
        Ok(())
    }
}
