//! The minimization pipeline and the [`Minimizable`] implementation for
//! [`Program`]
//!
//! Stages run in order: prime generation, essential extraction, cover
//! selection and rule reconstruction. Each run owns its implicant table, so
//! one [`Minimizer`] can serve many threads.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::error::MinimizationError;
use crate::essential::{extract_essentials, CoverageMap, Extraction};
use crate::label::{encode, Key};
use crate::minimizable::Minimizable;
use crate::primes::PrimeSet;
use crate::program::Program;
use crate::report::{Report, Solution, Timings};
use crate::select::{select_cover, CoverStrategy};
use crate::signature::Signature;
use crate::solver::{BranchAndBound, CoverSolver};
use crate::table::ImplicantTable;
use crate::MinimizerConfig;

/// Runs the pipeline with a configuration and a cover solver
#[derive(Clone)]
pub struct Minimizer {
    config: MinimizerConfig,
    solver: Arc<dyn CoverSolver>,
}

impl std::fmt::Debug for Minimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Minimizer")
            .field("config", &self.config)
            .field("solver", &self.solver.name())
            .finish()
    }
}

impl Default for Minimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Minimizer {
    /// Default configuration with the exact branch-and-bound solver
    pub fn new() -> Self {
        Self::with_config(MinimizerConfig::default())
    }

    /// Custom configuration with the exact branch-and-bound solver
    pub fn with_config(config: MinimizerConfig) -> Self {
        Minimizer {
            config,
            solver: Arc::new(BranchAndBound::new()),
        }
    }

    /// Replace the cover solver
    pub fn solver<S: CoverSolver + 'static>(mut self, solver: S) -> Self {
        self.solver = Arc::new(solver);
        self
    }

    /// Replace the cover solver with a shared one
    pub fn shared_solver(mut self, solver: Arc<dyn CoverSolver>) -> Self {
        self.solver = solver;
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &MinimizerConfig {
        &self.config
    }

    /// Minimize a program
    pub fn run(&self, program: &Program) -> Result<Report, MinimizationError> {
        self.run_keys(program.keys(), program.signature())
    }

    /// Minimize label text with default atom names
    pub fn run_labels<S: AsRef<str>>(&self, labels: &[S]) -> Result<Report, MinimizationError> {
        let keys = labels
            .iter()
            .map(|l| encode(l.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let width = keys.first().map_or(0, |k| k.width());
        self.run_keys(&keys, &Signature::with_width(width))
    }

    /// Minimize packed keys, rendering rules against `signature`
    pub fn run_keys(&self, keys: &[Key], signature: &Signature) -> Result<Report, MinimizationError> {
        let started = Instant::now();
        let mut timings = Timings::default();

        let table = ImplicantTable::from_keys(keys)?;
        debug!(
            "minimizing {} labels of width {} into {} valuations",
            keys.len(),
            table.width(),
            table.valuations().len()
        );

        let stage = Instant::now();
        let prime_set = PrimeSet::build(table, self.config.workers);
        let rounds = prime_set.rounds().to_vec();
        let mut table = prime_set.into_table();
        if let Some(&valuation) = table.uncovered_valuations().first() {
            return Err(MinimizationError::CoverageIncomplete { valuation });
        }
        let primes = table.primes();
        timings.pairing = stage.elapsed();
        debug!(
            "{} primes after {} rounds",
            primes.len(),
            rounds.len()
        );

        let stage = Instant::now();
        let coverage = CoverageMap::build(&table)?;
        let extraction = match self.config.strategy {
            CoverStrategy::Hybrid => extract_essentials(&mut table, &coverage),
            CoverStrategy::Full => Extraction::skipped(&table),
        };
        timings.essential = stage.elapsed();

        let stage = Instant::now();
        let selection = select_cover(&table, &extraction, self.solver.as_ref(), &self.config)?;
        timings.cover = stage.elapsed();

        let stage = Instant::now();
        let mut solutions = Vec::with_capacity(selection.covers.len());
        for cover in selection.covers {
            check_coverage(&table, &cover.keys)?;
            solutions.push(Solution::new(cover, signature));
        }
        timings.selection = stage.elapsed();
        timings.total = started.elapsed();

        Ok(Report {
            solutions,
            optimal_count: selection.optimal_count,
            primes,
            essentials: extraction.essentials,
            valuations: table.valuations().len(),
            rounds,
            solver_called: selection.solver_called,
            timings,
            table,
            signature: signature.clone(),
        })
    }
}

fn check_coverage(table: &ImplicantTable, keys: &[Key]) -> Result<(), MinimizationError> {
    let covered: BTreeSet<Key> = keys
        .iter()
        .filter_map(|&k| table.get(k))
        .flat_map(|i| i.totalcovers().iter().copied())
        .collect();
    match table.valuations().iter().find(|v| !covered.contains(v)) {
        Some(&valuation) => Err(MinimizationError::CoverageIncomplete { valuation }),
        None => Ok(()),
    }
}

impl Minimizable for Program {
    fn minimize_with_solver(
        &self,
        config: &MinimizerConfig,
        solver: Arc<dyn CoverSolver>,
    ) -> Result<Self, MinimizationError> {
        let report = Minimizer::with_config(config.clone())
            .shared_solver(solver)
            .run(self)?;
        let keys = report
            .solutions
            .into_iter()
            .next()
            .map(|s| s.keys)
            .unwrap_or_default();
        Ok(Program::from_keys(keys, self.signature().clone())?.with_grammar(self.grammar()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelError;
    use crate::select::MinMode;
    use crate::solver::Greedy;

    fn labels(keys: &[Key]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_four_valuations() {
        let report = Minimizer::new()
            .run_labels(&["020", "120", "001", "021"])
            .unwrap();
        assert_eq!(labels(&report.primes), vec!["001", "02z", "z20"]);
        assert_eq!(report.essentials.len(), 3);
        assert!(!report.solver_called);
        let best = report.best().unwrap();
        assert_eq!(best.labels(), vec!["001", "02z", "z20"]);
        assert!(best.optimal);
        assert_eq!(report.optimal_count, 1);
    }

    #[test]
    fn test_aggregate_input() {
        let report = Minimizer::new().run_labels(&["0z", "oz", "1z"]).unwrap();
        assert_eq!(report.best().unwrap().labels(), vec!["xz"]);
        assert_eq!(report.best().unwrap().to_rules(), "x1.");
    }

    #[test]
    fn test_essential_covers_shared_valuation() {
        let report = Minimizer::new().run_labels(&["z2", "01"]).unwrap();
        assert_eq!(labels(&report.primes), vec!["0o", "z2"]);
        assert_eq!(report.best().unwrap().labels(), vec!["z2"]);
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(
            Minimizer::new().run_labels(&empty).unwrap_err(),
            MinimizationError::EmptyProgram
        );
    }

    #[test]
    fn test_mixed_widths() {
        assert_eq!(
            Minimizer::new().run_labels(&["02", "120"]).unwrap_err(),
            MinimizationError::Label(LabelError::WidthMismatch {
                expected: 2,
                actual: 3,
                label: Arc::from("120"),
            })
        );
        let keys = [encode("0212").unwrap(), encode("02").unwrap()];
        assert!(matches!(
            Minimizer::new().run_keys(&keys, &Signature::with_width(4)),
            Err(MinimizationError::Label(LabelError::WidthMismatch { .. }))
        ));
    }

    #[test]
    fn test_full_strategy_agrees_with_hybrid() {
        let input = ["020", "120", "001", "021"];
        let hybrid = Minimizer::new().run_labels(&input).unwrap();

        let mut config = MinimizerConfig::default();
        config.strategy = CoverStrategy::Full;
        let full = Minimizer::with_config(config).run_labels(&input).unwrap();
        assert!(full.solver_called);
        assert!(full.essentials.is_empty());
        assert_eq!(full.best().unwrap().keys, hybrid.best().unwrap().keys);
    }

    #[test]
    fn test_greedy_solver_is_not_optimal() {
        let mut config = MinimizerConfig::default();
        config.strategy = CoverStrategy::Full;
        let report = Minimizer::with_config(config)
            .solver(Greedy)
            .run_labels(&["02", "12"])
            .unwrap();
        assert_eq!(report.best().unwrap().labels(), vec!["z2"]);
        assert!(!report.best().unwrap().optimal);
    }

    #[test]
    fn test_rules_use_program_atoms() {
        let program: Program = "p :- q.\np :- not q.\n".parse().unwrap();
        let report = Minimizer::new().run(&program).unwrap();
        assert_eq!(report.best().unwrap().to_rules(), "p :- not q.\np :- q.");

        let mut config = MinimizerConfig::default();
        config.min_mode = MinMode::Terms;
        let minimized = program.minimize_with_config(&config).unwrap();
        assert_eq!(minimized.signature(), program.signature());
        assert_eq!(minimized.grammar(), program.grammar());
    }

    #[test]
    fn test_timings_are_recorded() {
        let report = Minimizer::new().run_labels(&["02", "12"]).unwrap();
        let t = report.timings;
        assert!(t.total >= t.pairing);
        assert!(t.total >= t.cover);
        assert_eq!(report.valuations, 2);
        assert!(!report.rounds.is_empty());
    }
}
