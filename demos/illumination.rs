//! Illumination Design Example
//!
//! Compares five lamp-power designs for a row of lamps lighting a floor:
//!
//! minimize    max_k |log (A p)_k|
//! subject to  0 <= p <= p_max
//!
//! Usage: `cargo run --example illumination [matrix.csv]`
//!
//! Without an argument the built-in 20 x 10 reference geometry is used.
//! Set `RUST_LOG=debug` to see per-method details.

use anyhow::Result;
use illumopt::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let a = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading incidence matrix from {path}");
            load_matrix(&path)?
        }
        None => {
            println!("Using the reference geometry");
            reference_incidence()
        }
    };

    let problem = DesignProblem::new(a, 1.0, 1.0)?;
    println!(
        "=== Illumination design: {} patches, {} lamps ===\n",
        problem.patches(),
        problem.lamps()
    );

    let comparison = BoundedLinearDesignSolver::new(&problem).run();
    println!("{comparison}");

    if let Some(CandidateDetail::Uniform { curve, .. }) = comparison
        .candidate(Method::Uniform)
        .map(|c| &c.detail)
    {
        println!("Uniform scan:");
        for (level, f0) in curve {
            println!("  {level:.4}  {f0:.4}");
        }
        println!();
    }

    println!("Ranking:");
    for (rank, candidate) in comparison.ranking().iter().enumerate() {
        println!("  {}. {:<24} {:.4}", rank + 1, candidate.method, candidate.objective);
    }

    Ok(())
}
