//! End-to-end tests for the five design methods.
//!
//! Small problems with closed-form optima are defined as data and run
//! programmatically; the reference geometry checks the full comparison.

use illumopt::prelude::*;
use nalgebra::{DMatrix, DVector};

/// Tolerance for comparing objective values across solver output.
const TOL: f64 = 1e-4;

/// Tolerance for the box constraint on solver output.
const BOX_TOL: f64 = 1e-6;

/// A test case definition
struct TestCase {
    name: &'static str,
    method: Method,
    /// Builds the problem and returns (problem, expected objective)
    build: fn() -> (DesignProblem, f64),
}

fn test_cases() -> Vec<TestCase> {
    vec![
        // ========== Identity geometry ==========
        TestCase {
            name: "least_squares_identity_exact_fit",
            method: Method::LeastSquares,
            build: || {
                // p = 1 solves A p = 1 exactly, no clipping needed
                let problem = DesignProblem::new(DMatrix::identity(5, 5), 1.0, 1.0).unwrap();
                (problem, 0.0)
            },
        },
        TestCase {
            name: "uniform_identity",
            method: Method::Uniform,
            build: || {
                // level 1 is the last grid point
                let problem = DesignProblem::new(DMatrix::identity(4, 4), 1.0, 1.0).unwrap();
                (problem, 0.0)
            },
        },
        TestCase {
            name: "chebyshev_identity_bound_active",
            method: Method::Chebyshev,
            build: || {
                // p_max = 0.5 caps every intensity at 0.5
                let problem = DesignProblem::new(DMatrix::identity(3, 3), 0.5, 1.0).unwrap();
                (problem, 2f64.ln())
            },
        },
        TestCase {
            name: "exact_identity",
            method: Method::Exact,
            build: || {
                let problem = DesignProblem::new(DMatrix::identity(3, 3), 1.0, 1.0).unwrap();
                (problem, 0.0)
            },
        },

        // ========== One lamp, two patches ==========
        TestCase {
            name: "exact_balances_ratios",
            method: Method::Exact,
            build: || {
                // I = (p, 4p): max(4p, 1/p) is smallest at p = 1/2
                let a = DMatrix::from_row_slice(2, 1, &[1.0, 4.0]);
                (DesignProblem::new(a, 1.0, 1.0).unwrap(), 2f64.ln())
            },
        },
        TestCase {
            name: "chebyshev_balances_residuals",
            method: Method::Chebyshev,
            build: || {
                // |p - 1| = |4p - 1| at p = 0.4, so I = (0.4, 1.6)
                let a = DMatrix::from_row_slice(2, 1, &[1.0, 4.0]);
                (DesignProblem::new(a, 1.0, 1.0).unwrap(), 2.5f64.ln())
            },
        },
        TestCase {
            name: "least_squares_one_lamp",
            method: Method::LeastSquares,
            build: || {
                // p = (1 + 4) / (1 + 16)
                let a = DMatrix::from_row_slice(2, 1, &[1.0, 4.0]);
                (
                    DesignProblem::new(a, 1.0, 1.0).unwrap(),
                    (5.0f64 / 17.0).ln().abs(),
                )
            },
        },

        // ========== Unreachable patch level ==========
        TestCase {
            name: "exact_dim_patch_dominates",
            method: Method::Exact,
            build: || {
                // second patch reaches at most 0.25
                let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.25]);
                (DesignProblem::new(a, 1.0, 1.0).unwrap(), 4f64.ln())
            },
        },
    ]
}

#[test]
fn test_closed_form_cases() {
    let _ = env_logger::builder().is_test(true).try_init();
    for case in test_cases() {
        let (problem, expected) = (case.build)();
        let solver = BoundedLinearDesignSolver::new(&problem);
        let candidate = solver
            .run_method(case.method)
            .unwrap_or_else(|e| panic!("{}: {}", case.name, e));
        assert_eq!(candidate.method, case.method);
        assert!(
            (candidate.objective - expected).abs() < TOL,
            "{}: expected {}, got {}",
            case.name,
            expected,
            candidate.objective
        );
        assert_in_box(case.name, &candidate.p, problem.p_max());
    }
}

fn assert_in_box(name: &str, p: &DVector<f64>, p_max: f64) {
    for (j, &v) in p.iter().enumerate() {
        assert!(
            v >= -BOX_TOL && v <= p_max + BOX_TOL,
            "{name}: p[{j}] = {v} outside [0, {p_max}]"
        );
    }
}

#[test]
fn test_exact_beats_chebyshev_on_one_lamp() {
    let a = DMatrix::from_row_slice(2, 1, &[1.0, 4.0]);
    let problem = DesignProblem::new(a, 1.0, 1.0).unwrap();
    let solver = BoundedLinearDesignSolver::new(&problem);
    let exact = solver.exact().unwrap();
    let chebyshev = solver.chebyshev().unwrap();
    assert!((exact.p[0] - 0.5).abs() < TOL);
    assert!((chebyshev.p[0] - 0.4).abs() < TOL);
    assert!(exact.objective < chebyshev.objective);
}

#[test]
fn test_dark_patch_surfaces_solver_failure() {
    // no lamp reaches the second patch, so 1 / I is unbounded
    let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 0.0, 0.0]);
    let problem = DesignProblem::new(a, 1.0, 1.0).unwrap();
    let comparison = BoundedLinearDesignSolver::new(&problem).run();

    assert!(matches!(
        comparison.get(Method::Exact),
        Some(Err(DesignError::SolverFailure(_)))
    ));
    // the floor keeps the heuristics finite
    let uniform = comparison.candidate(Method::Uniform).unwrap();
    assert!((uniform.objective - 1e-8f64.ln().abs()).abs() < 1e-9);
    assert!(comparison.candidate(Method::Chebyshev).is_some());
}

// ============================================================================
// Reference geometry
// ============================================================================

fn reference_comparison() -> (DesignProblem, Comparison) {
    let _ = env_logger::builder().is_test(true).try_init();
    let problem = DesignProblem::new(reference_incidence(), 1.0, 1.0).unwrap();
    let comparison = BoundedLinearDesignSolver::new(&problem).run();
    (problem, comparison)
}

#[test]
fn test_reference_all_methods_succeed_in_box() {
    let (problem, comparison) = reference_comparison();
    assert!(comparison.is_complete(), "{comparison}");
    for (method, outcome) in comparison.iter() {
        let candidate = outcome.as_ref().unwrap();
        assert_eq!(candidate.p.len(), problem.lamps());
        assert!(candidate.objective.is_finite() && candidate.objective >= 0.0);
        assert_in_box(method.name(), &candidate.p, problem.p_max());
    }
}

#[test]
fn test_reference_exact_is_best() {
    let (_, comparison) = reference_comparison();
    let exact = comparison.candidate(Method::Exact).unwrap().objective;
    for candidate in comparison.ranking() {
        assert!(
            exact <= candidate.objective + TOL,
            "Exact {} worse than {} {}",
            exact,
            candidate.method,
            candidate.objective
        );
    }
    let chebyshev = comparison.candidate(Method::Chebyshev).unwrap().objective;
    assert!(exact <= chebyshev + TOL);
    assert!(comparison.best().unwrap().objective >= exact - TOL);
}

#[test]
fn test_reference_least_squares_is_worst() {
    // clipping the unconstrained fit gives the worst design on this geometry
    let (_, comparison) = reference_comparison();
    let ranking = comparison.ranking();
    assert_eq!(ranking.len(), 5);
    let worst = ranking.last().unwrap();
    let least_squares = comparison.candidate(Method::LeastSquares).unwrap();
    assert!(
        least_squares.objective >= worst.objective - TOL,
        "LeastSquares {} below worst {} {}",
        least_squares.objective,
        worst.method,
        worst.objective
    );
}

#[test]
fn test_reference_details() {
    let (problem, comparison) = reference_comparison();

    match &comparison.candidate(Method::Uniform).unwrap().detail {
        CandidateDetail::Uniform { level, curve } => {
            assert_eq!(curve.len(), 15);
            assert!(*level >= 0.0 && *level <= problem.p_max());
            let best = curve.iter().map(|(_, f)| *f).fold(f64::INFINITY, f64::min);
            assert_eq!(best, comparison.candidate(Method::Uniform).unwrap().objective);
        }
        other => panic!("unexpected detail {other:?}"),
    }

    match &comparison
        .candidate(Method::RegularizedLeastSquares)
        .unwrap()
        .detail
    {
        CandidateDetail::Regularized {
            deviation,
            fallback,
            ..
        } => {
            assert!(!fallback);
            assert!(*deviation <= 0.5 * problem.p_max());
        }
        other => panic!("unexpected detail {other:?}"),
    }

    for method in [Method::Chebyshev, Method::Exact] {
        match &comparison.candidate(method).unwrap().detail {
            CandidateDetail::Convex { status, .. } => assert!(status.is_solved()),
            other => panic!("unexpected detail {other:?}"),
        }
    }
}

#[test]
fn test_reference_exact_solver_value_matches_objective() {
    // the backend minimizes exp(f0)
    let (_, comparison) = reference_comparison();
    let exact = comparison.candidate(Method::Exact).unwrap();
    match exact.detail {
        CandidateDetail::Convex { solver_value, .. } => {
            assert!((solver_value.ln() - exact.objective).abs() < TOL);
        }
        ref other => panic!("unexpected detail {other:?}"),
    }
}

#[test]
fn test_reference_table_lists_every_method() {
    let (_, comparison) = reference_comparison();
    let table = comparison.to_string();
    let names: Vec<&str> = table
        .lines()
        .skip(1)
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(
        names,
        vec![
            "Uniform",
            "LeastSquares",
            "RegularizedLeastSquares",
            "Chebyshev",
            "Exact"
        ]
    );
}

#[test]
fn test_reference_survives_csv_text() {
    let a = reference_incidence();
    let parsed = parse_matrix(&illumopt::io::format_matrix(&a)).unwrap();
    assert_eq!(parsed, a);
}
