//! Example: Plugging in a custom cover solver
//!
//! Any type implementing [`CoverSolver`] can replace the built-in search.
//! This one delegates to the exact solver and logs the problem size.

use htmin::solver::{CoverProblem, CoverResponse, CoverSolver, SolverBudget, SolverError};
use htmin::{BranchAndBound, Minimizer};

struct Logging {
    inner: BranchAndBound,
}

impl CoverSolver for Logging {
    fn name(&self) -> &str {
        "logging"
    }

    fn solve(
        &self,
        problem: &CoverProblem,
        budget: &SolverBudget,
    ) -> Result<CoverResponse, SolverError> {
        println!(
            "  solving: {} valuations, {} candidate primes, {} facts",
            problem.universe().len(),
            problem.subsets().len(),
            problem.facts().len()
        );
        let response = self.inner.solve(problem, budget)?;
        println!("  found {} minimum covers", response.covers.len());
        Ok(response)
    }
}

fn main() -> Result<(), htmin::MinimizationError> {
    println!("=== Custom Cover Solver Example ===\n");

    // both primes cover every valuation, so neither is essential
    let labels = ["2o", "o2"];
    let minimizer = Minimizer::new().solver(Logging {
        inner: BranchAndBound::new(),
    });

    let report = minimizer.run_labels(&labels)?;
    println!("\nOptimal Minimal Solutions: {}", report.optimal_count);
    if let Some(best) = report.best() {
        println!("{}", best.to_rules());
    }
    Ok(())
}
