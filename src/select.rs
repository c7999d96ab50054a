//! Cover selection
//!
//! When the essential primes leave valuations uncovered, the remaining primes
//! restricted to those valuations form a set cover problem. Every prime is
//! one subset of cost 1, so the solver minimizes the number of rules; the
//! [`MinMode`] then decides between equally small covers.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::MinimizationError;
use crate::essential::Extraction;
use crate::label::Key;
use crate::solver::{CoverProblem, CoverResponse, CoverSolver, SolverError};
use crate::table::ImplicantTable;
use crate::MinimizerConfig;

/// Which primes and valuations reach the cover solver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverStrategy {
    /// Essential extraction first, the solver only sees the leftovers
    #[default]
    Hybrid,
    /// Every prime against every valuation
    Full,
}

/// Secondary criterion between covers with the fewest rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinMode {
    /// Fewest literals in total
    #[default]
    Atoms,
    /// Fewest rules only
    Terms,
}

/// One selected set of primes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCover {
    /// Primes of the cover, ascending
    pub keys: Vec<Key>,
    /// Sum of the literal counts of the primes
    pub literal_count: usize,
    /// False when the solver could not prove the cover minimum
    pub optimal: bool,
}

impl SelectedCover {
    fn new(mut keys: Vec<Key>, optimal: bool) -> Self {
        keys.sort();
        keys.dedup();
        let literal_count = keys.iter().map(|k| k.literal_count()).sum();
        SelectedCover {
            keys,
            literal_count,
            optimal,
        }
    }

    fn literal_profile(&self) -> Vec<usize> {
        let mut profile: Vec<usize> = self.keys.iter().map(|k| k.literal_count()).collect();
        profile.sort_unstable();
        profile
    }

    fn generality(&self) -> u64 {
        self.keys.iter().map(|k| k.countermodel_count()).sum()
    }

    /// Order used to pick one cover among equals
    ///
    /// Shorter rules first, then the cover whose rules falsify under more
    /// valuations, then key order.
    fn tie_break(&self, other: &Self) -> Ordering {
        self.literal_profile()
            .cmp(&other.literal_profile())
            .then_with(|| other.generality().cmp(&self.generality()))
            .then_with(|| self.keys.cmp(&other.keys))
    }
}

/// Outcome of cover selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Selected covers in tie-break order; one unless all were requested
    pub covers: Vec<SelectedCover>,
    /// Number of optimal covers found before truncation
    pub optimal_count: usize,
    /// Whether the cover solver was consulted
    pub solver_called: bool,
}

/// The set cover problem left after essential extraction
///
/// Returns the problem together with the prime behind each subset id.
/// Primes that cover no leftover valuation are not offered.
pub fn reduced_problem(table: &ImplicantTable, extraction: &Extraction) -> (CoverProblem, Vec<Key>) {
    let leftover: BTreeSet<Key> = extraction.leftover.iter().copied().collect();
    let mut problem = CoverProblem::new(leftover.iter().copied());
    let mut primes = Vec::new();
    for &prime in &extraction.remaining {
        let Some(implicant) = table.get(prime) else {
            continue;
        };
        let members: Vec<Key> = implicant
            .totalcovers()
            .intersection(&leftover)
            .copied()
            .collect();
        if members.is_empty() {
            continue;
        }
        problem.add_subset(1, members);
        primes.push(prime);
    }
    (problem, primes)
}

/// Choose the minimal covers of a table
pub fn select_cover(
    table: &ImplicantTable,
    extraction: &Extraction,
    solver: &dyn CoverSolver,
    config: &MinimizerConfig,
) -> Result<Selection, MinimizationError> {
    if extraction.is_full_cover() {
        debug!(
            "essential primes cover all {} valuations",
            table.valuations().len()
        );
        return Ok(Selection {
            covers: vec![SelectedCover::new(extraction.essentials.clone(), true)],
            optimal_count: 1,
            solver_called: false,
        });
    }

    let (problem, primes) = reduced_problem(table, extraction);
    debug!(
        "{}: {} valuations, {} candidate primes",
        solver.name(),
        problem.universe().len(),
        problem.subsets().len()
    );
    let response = solver
        .solve(&problem, &config.budget)
        .map_err(|err| match err {
            SolverError::Infeasible { element } => {
                MinimizationError::CoverageIncomplete { valuation: element }
            }
            other => other.into(),
        })?;
    if !response.optimal {
        warn!("{}: solution is not proven minimal", solver.name());
    }

    let mut covers = combine(&problem, &primes, &extraction.essentials, &response);
    if covers.is_empty() {
        let valuation = problem.universe().first().copied().unwrap_or(Key::from_raw(0));
        return Err(MinimizationError::CoverageIncomplete { valuation });
    }

    let best = covers
        .iter()
        .map(|cover| secondary_cost(cover, config))
        .min()
        .unwrap_or((0, 0));
    covers.retain(|cover| secondary_cost(cover, config) == best);
    covers.sort_by(SelectedCover::tie_break);
    let optimal_count = covers.len();
    if !config.all_solutions {
        covers.truncate(1);
    }
    debug!(
        "{} optimal covers, keeping {}",
        optimal_count,
        covers.len()
    );

    Ok(Selection {
        covers,
        optimal_count,
        solver_called: true,
    })
}

fn combine(
    problem: &CoverProblem,
    primes: &[Key],
    essentials: &[Key],
    response: &CoverResponse,
) -> Vec<SelectedCover> {
    let mut covers: Vec<SelectedCover> = Vec::new();
    for cover in &response.covers {
        if !problem.is_cover(cover) {
            warn!("discarding solver answer that leaves valuations uncovered");
            continue;
        }
        let mut keys = essentials.to_vec();
        keys.extend(cover.iter().filter_map(|id| primes.get(id.0).copied()));
        let selected = SelectedCover::new(keys, response.optimal);
        if !covers.contains(&selected) {
            covers.push(selected);
        }
    }
    covers
}

fn secondary_cost(cover: &SelectedCover, config: &MinimizerConfig) -> (usize, usize) {
    match config.min_mode {
        MinMode::Atoms => (cover.keys.len(), cover.literal_count),
        MinMode::Terms => (cover.keys.len(), 0),
    }
}
