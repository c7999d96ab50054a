//! Exact cover search by depth-first branch and bound

use std::collections::BTreeSet;

use log::debug;

use super::{BudgetMeter, CoverProblem, CoverResponse, CoverSolver, SolverBudget, SolverError, SubsetId};

/// Exhaustive solver enumerating every minimum-cost cover
///
/// The search branches on the uncovered element with the fewest available
/// candidates. Branch `i` selects the `i`-th candidate and forbids the earlier
/// ones, so each cover is generated once. A lower bound from elements whose
/// candidate sets are pairwise disjoint prunes branches that cannot reach the
/// best cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBound {
    first_only: bool,
}

impl BranchAndBound {
    /// A solver returning every minimum-cost cover
    pub fn new() -> Self {
        BranchAndBound { first_only: false }
    }

    /// A solver returning a single minimum-cost cover
    pub fn first_only() -> Self {
        BranchAndBound { first_only: true }
    }
}

struct Search<'a> {
    problem: &'a CoverProblem,
    candidates: Vec<Vec<usize>>,
    coverage: Vec<u32>,
    excluded: Vec<bool>,
    chosen: Vec<usize>,
    cost: u64,
    best: Option<u64>,
    found: Vec<Vec<usize>>,
    first_only: bool,
}

impl Search<'_> {
    fn select(&mut self, subset: usize) {
        for &m in &self.problem.subsets()[subset].members {
            self.coverage[m] += 1;
        }
        self.chosen.push(subset);
        self.cost += u64::from(self.problem.subsets()[subset].cost);
    }

    fn deselect(&mut self, subset: usize) {
        for &m in &self.problem.subsets()[subset].members {
            self.coverage[m] -= 1;
        }
        self.chosen.pop();
        self.cost -= u64::from(self.problem.subsets()[subset].cost);
    }

    fn available(&self, element: usize) -> impl Iterator<Item = usize> + '_ {
        self.candidates[element]
            .iter()
            .copied()
            .filter(|&s| !self.excluded[s])
    }

    fn lower_bound(&self, uncovered: &[usize]) -> u64 {
        let mut claimed = vec![false; self.excluded.len()];
        let mut bound = 0;
        for &element in uncovered {
            if self.available(element).any(|s| claimed[s]) {
                continue;
            }
            let mut cheapest = None;
            for s in self.available(element) {
                claimed[s] = true;
                let cost = u64::from(self.problem.subsets()[s].cost);
                cheapest = Some(cheapest.map_or(cost, |c: u64| c.min(cost)));
            }
            bound += cheapest.unwrap_or(0);
        }
        bound
    }

    fn explore(&mut self, meter: &mut BudgetMeter<'_>) -> Result<(), SolverError> {
        meter.tick()?;

        let mut uncovered: Vec<usize> = (0..self.coverage.len())
            .filter(|&e| self.coverage[e] == 0)
            .collect();

        if uncovered.is_empty() {
            match self.best {
                Some(best) if self.cost > best => {}
                Some(best) if self.cost == best => {
                    if !self.first_only {
                        self.found.push(self.chosen.clone());
                    }
                }
                _ => {
                    self.best = Some(self.cost);
                    self.found = vec![self.chosen.clone()];
                }
            }
            return Ok(());
        }

        uncovered.sort_by_key(|&e| (self.available(e).count(), e));
        if let Some(best) = self.best {
            let bound = self.cost + self.lower_bound(&uncovered);
            if bound > best || (self.first_only && bound == best) {
                return Ok(());
            }
        }

        let element = uncovered[0];
        let branches: Vec<usize> = self.available(element).collect();
        for &subset in &branches {
            self.select(subset);
            let result = self.explore(meter);
            self.deselect(subset);
            result?;
            self.excluded[subset] = true;
        }
        for &subset in &branches {
            self.excluded[subset] = false;
        }
        Ok(())
    }
}

impl CoverSolver for BranchAndBound {
    fn name(&self) -> &str {
        "branch-and-bound"
    }

    fn solve(
        &self,
        problem: &CoverProblem,
        budget: &SolverBudget,
    ) -> Result<CoverResponse, SolverError> {
        let candidates = problem.candidates()?;
        let mut search = Search {
            problem,
            coverage: vec![0; problem.universe().len()],
            excluded: vec![false; problem.subsets().len()],
            candidates,
            chosen: Vec::new(),
            cost: 0,
            best: None,
            found: Vec::new(),
            first_only: self.first_only,
        };

        let mut meter = budget.meter();
        search.explore(&mut meter)?;
        debug!(
            "{}: {} minimum covers of cost {:?} after {} nodes",
            self.name(),
            search.found.len(),
            search.best,
            meter.nodes()
        );

        let mut covers: Vec<BTreeSet<SubsetId>> = search
            .found
            .into_iter()
            .map(|chosen| chosen.into_iter().map(|s| problem.subsets()[s].id).collect())
            .collect();
        covers.sort();
        covers.dedup();
        Ok(CoverResponse {
            covers,
            optimal: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{encode, Key};

    fn key(label: &str) -> Key {
        encode(label).unwrap()
    }

    fn universe(n: usize) -> Vec<Key> {
        ["00", "01", "02", "10", "11", "12", "20", "21", "22"]
            .iter()
            .take(n)
            .map(|l| key(l))
            .collect()
    }

    fn brute_force_minimum(problem: &CoverProblem) -> (u64, usize) {
        let n = problem.subsets().len();
        let mut best = u64::MAX;
        let mut count = 0;
        for mask in 0u32..(1 << n) {
            let cover: BTreeSet<SubsetId> = (0..n)
                .filter(|i| mask & (1 << i) != 0)
                .map(SubsetId)
                .collect();
            if !problem.is_cover(&cover) {
                continue;
            }
            let cost = problem.cost_of(&cover).unwrap();
            if cost < best {
                best = cost;
                count = 1;
            } else if cost == best {
                count += 1;
            }
        }
        (best, count)
    }

    #[test]
    fn test_empty_universe_has_empty_cover() {
        let problem = CoverProblem::new(Vec::new());
        let response = BranchAndBound::new()
            .solve(&problem, &SolverBudget::default())
            .unwrap();
        assert_eq!(response.covers, vec![BTreeSet::new()]);
        assert!(response.optimal);
    }

    #[test]
    fn test_enumerates_all_minimum_covers() {
        let u = universe(4);
        let mut problem = CoverProblem::new(u.clone());
        problem.add_subset(1, [u[0], u[1]]);
        problem.add_subset(1, [u[2], u[3]]);
        problem.add_subset(1, [u[1], u[2]]);
        problem.add_subset(1, [u[0], u[3]]);
        problem.add_subset(1, [u[0]]);

        let response = BranchAndBound::new()
            .solve(&problem, &SolverBudget::default())
            .unwrap();
        assert_eq!(
            response.covers,
            vec![
                BTreeSet::from([SubsetId(0), SubsetId(1)]),
                BTreeSet::from([SubsetId(2), SubsetId(3)]),
            ]
        );
    }

    #[test]
    fn test_costs_are_respected() {
        let u = universe(3);
        let mut problem = CoverProblem::new(u.clone());
        problem.add_subset(5, [u[0], u[1], u[2]]);
        problem.add_subset(1, [u[0]]);
        problem.add_subset(1, [u[1]]);
        problem.add_subset(1, [u[2]]);

        let response = BranchAndBound::new()
            .solve(&problem, &SolverBudget::default())
            .unwrap();
        assert_eq!(
            response.covers,
            vec![BTreeSet::from([SubsetId(1), SubsetId(2), SubsetId(3)])]
        );
    }

    #[test]
    fn test_matches_brute_force() {
        let u = universe(6);
        // deterministic pseudo-random families
        for seed in 1u64..12 {
            let mut state = seed;
            let mut problem = CoverProblem::new(u.clone());
            for _ in 0..5 {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                let bits = (state >> 33) as usize;
                let members: Vec<Key> = (0..6)
                    .filter(|i| bits & (1 << i) != 0)
                    .map(|i| u[i])
                    .collect();
                problem.add_subset(1 + (bits % 3) as u32, members);
            }
            for (i, &element) in u.iter().enumerate() {
                problem.add_subset(2 + (i % 2) as u32, [element]);
            }

            let (best, count) = brute_force_minimum(&problem);
            let response = BranchAndBound::new()
                .solve(&problem, &SolverBudget::unlimited())
                .unwrap();
            assert_eq!(response.covers.len(), count, "seed {}", seed);
            for cover in &response.covers {
                assert!(problem.is_cover(cover));
                assert_eq!(problem.cost_of(cover), Some(best));
            }
        }
    }

    #[test]
    fn test_first_only_returns_one_minimum() {
        let u = universe(4);
        let mut problem = CoverProblem::new(u.clone());
        problem.add_subset(1, [u[0], u[1]]);
        problem.add_subset(1, [u[2], u[3]]);
        problem.add_subset(1, [u[1], u[2]]);
        problem.add_subset(1, [u[0], u[3]]);

        let response = BranchAndBound::first_only()
            .solve(&problem, &SolverBudget::default())
            .unwrap();
        assert_eq!(response.covers.len(), 1);
        assert_eq!(problem.cost_of(&response.covers[0]), Some(2));
    }

    #[test]
    fn test_node_budget_is_enforced() {
        let u = universe(9);
        let mut problem = CoverProblem::new(u.clone());
        for i in 0..9 {
            for j in i + 1..9 {
                problem.add_subset(1, [u[i], u[j]]);
            }
        }
        let budget = SolverBudget {
            max_nodes: Some(10),
            ..SolverBudget::unlimited()
        };
        assert!(matches!(
            BranchAndBound::new().solve(&problem, &budget),
            Err(SolverError::BudgetExceeded { .. })
        ));
    }
}
