//! Tests for cover solver budgets and cancellation

use htmin::solver::{BranchAndBound, CoverProblem, CoverSolver, SolverBudget, SolverError};
use htmin::{label::encode, MinimizationError, Minimizer, MinimizerConfig};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

// both primes cover every valuation, so neither is essential and the solver
// always runs
const AMBIGUOUS: [&str; 2] = ["2o", "o2"];

#[test]
fn test_node_budget_reports_timeout() {
    let mut config = MinimizerConfig::default();
    config.budget.max_nodes = Some(0);
    let err = Minimizer::with_config(config)
        .run_labels(&AMBIGUOUS)
        .unwrap_err();
    assert!(matches!(err, MinimizationError::SolverTimeout { nodes: 1, .. }));
    assert!(err.to_string().contains("within budget"));

    let io: std::io::Error = err.into();
    assert_eq!(io.kind(), std::io::ErrorKind::TimedOut);
}

#[test]
fn test_cancelled_search() {
    let mut config = MinimizerConfig::default();
    config.budget.cancel = Some(Arc::new(AtomicBool::new(true)));
    assert_eq!(
        Minimizer::with_config(config).run_labels(&AMBIGUOUS).unwrap_err(),
        MinimizationError::Solver(SolverError::Cancelled)
    );
}

#[test]
fn test_budget_unused_without_solver() {
    // full essential cover never reaches the solver
    let mut config = MinimizerConfig::default();
    config.budget.max_nodes = Some(0);
    let report = Minimizer::with_config(config)
        .run_labels(&["02", "12"])
        .unwrap();
    assert!(!report.solver_called);
}

#[test]
fn test_time_limit_on_large_problem() {
    // 24 elements, every pair of consecutive elements is one subset
    let universe: Vec<_> = (0..24u32)
        .map(|i| {
            let label: String = (0..4)
                .map(|p| ['0', '1', '2'][((i / 3u32.pow(p)) % 3) as usize])
                .collect();
            encode(&label).unwrap()
        })
        .collect();
    let mut problem = CoverProblem::new(universe.clone());
    for i in 0..universe.len() {
        for j in i + 1..universe.len() {
            problem.add_subset(1, [universe[i], universe[j]]);
        }
    }

    let budget = SolverBudget {
        max_nodes: None,
        time_limit: Some(Duration::from_millis(1)),
        cancel: None,
    };
    match BranchAndBound::new().solve(&problem, &budget) {
        Err(SolverError::BudgetExceeded { nodes, .. }) => assert!(nodes >= 1024),
        Ok(response) => assert!(response.optimal),
        Err(other) => panic!("unexpected error: {}", other),
    }
}
