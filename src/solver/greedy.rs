//! Largest-gain-first cover heuristic

use std::collections::BTreeSet;

use log::warn;

use super::{CoverProblem, CoverResponse, CoverSolver, SolverBudget, SolverError, SubsetId};

/// Picks the subset covering the most uncovered elements per unit of cost
/// until the universe is covered
///
/// The answer is a single cover and is never reported as optimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl CoverSolver for Greedy {
    fn name(&self) -> &str {
        "greedy"
    }

    fn solve(
        &self,
        problem: &CoverProblem,
        budget: &SolverBudget,
    ) -> Result<CoverResponse, SolverError> {
        problem.candidates()?;

        let mut meter = budget.meter();
        let mut covered = vec![false; problem.universe().len()];
        let mut remaining = covered.len();
        let mut chosen = BTreeSet::new();

        while remaining > 0 {
            meter.tick()?;
            let mut best: Option<(usize, u32, SubsetId)> = None;
            for subset in problem.subsets() {
                let gain = subset.members.iter().filter(|&&m| !covered[m]).count();
                if gain == 0 {
                    continue;
                }
                // gain / cost compared by cross multiplication
                let better = match best {
                    None => true,
                    Some((g, c, _)) => {
                        (gain as u64) * u64::from(c.max(1)) > (g as u64) * u64::from(subset.cost.max(1))
                    }
                };
                if better {
                    best = Some((gain, subset.cost, subset.id));
                }
            }

            let Some((_, _, id)) = best else {
                break;
            };
            if let Some(subset) = problem.subset(id) {
                for &m in &subset.members {
                    if !covered[m] {
                        covered[m] = true;
                        remaining -= 1;
                    }
                }
            }
            chosen.insert(id);
        }

        warn!(
            "{}: cover of {} subsets is not proven minimum",
            self.name(),
            chosen.len()
        );
        Ok(CoverResponse {
            covers: vec![chosen],
            optimal: false,
        })
    }
}
