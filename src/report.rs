//! Results of a minimization run

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use crate::label::Key;
use crate::primes::RoundStats;
use crate::rules::key_to_rule;
use crate::select::SelectedCover;
use crate::signature::Signature;
use crate::table::ImplicantTable;

/// One minimal rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// Prime implicants of the rule set, ascending
    pub keys: Vec<Key>,
    /// The primes rendered as rules, in key order
    pub rules: Vec<String>,
    /// Total literal count
    pub literal_count: usize,
    /// False when the cover solver could not prove minimality
    pub optimal: bool,
}

impl Solution {
    pub(crate) fn new(cover: SelectedCover, signature: &Signature) -> Self {
        let rules = cover
            .keys
            .iter()
            .map(|&key| key_to_rule(key, signature).to_string())
            .collect();
        Solution {
            keys: cover.keys,
            rules,
            literal_count: cover.literal_count,
            optimal: cover.optimal,
        }
    }

    /// The primes as label text
    pub fn labels(&self) -> Vec<String> {
        self.keys.iter().map(|k| k.to_string()).collect()
    }

    /// The rules, one per line
    pub fn to_rules(&self) -> String {
        self.rules.join("\n")
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True for the empty rule set
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Wall-clock time spent in each stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Timings {
    /// Prime generation
    pub pairing: Duration,
    /// Coverage indexing and essential extraction
    pub essential: Duration,
    /// Cover solving
    pub cover: Duration,
    /// Building and checking the solutions
    pub selection: Duration,
    /// The whole run
    pub total: Duration,
}

/// Everything a minimization run produced
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Minimal solutions, best first
    pub solutions: Vec<Solution>,
    /// Number of optimal solutions found
    pub optimal_count: usize,
    /// Prime implicants, ascending
    pub primes: Vec<Key>,
    /// Essential primes, ascending
    pub essentials: Vec<Key>,
    /// Number of original valuations
    pub valuations: usize,
    /// Rounds of the prime fixpoint
    pub rounds: Vec<RoundStats>,
    /// Whether the cover solver was consulted
    pub solver_called: bool,
    /// Stage timings
    pub timings: Timings,
    #[serde(skip)]
    pub(crate) table: ImplicantTable,
    #[serde(skip)]
    pub(crate) signature: Signature,
}

impl Report {
    /// The best solution
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }

    /// Atom names used to render the rules
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The implicant table at the fixpoint
    pub fn table(&self) -> &ImplicantTable {
        &self.table
    }

    /// Valuation by prime incidence table
    ///
    /// One row per original valuation and one column per prime; a cell is
    /// `X` when the prime covers the valuation. Essential primes are starred
    /// in the header.
    pub fn cover_table(&self) -> String {
        let width = self.table.width().max("valuation".len());
        let column = self.table.width().max(2) + 1;
        let mut out = String::new();

        let _ = write!(out, "{:<width$} |", "valuation");
        for prime in &self.primes {
            let star = if self.essentials.contains(prime) { "*" } else { "" };
            let _ = write!(out, " {:>column$}", format!("{}{}", prime, star));
        }
        out.push('\n');
        let _ = writeln!(
            out,
            "{}-+{}",
            "-".repeat(width),
            "-".repeat(self.primes.len() * (column + 1))
        );

        for &valuation in self.table.valuations() {
            let _ = write!(out, "{:<width$} |", valuation.to_string());
            for &prime in &self.primes {
                let covered = self
                    .table
                    .get(prime)
                    .is_some_and(|i| i.totalcovers().contains(&valuation));
                let _ = write!(out, " {:>column$}", if covered { "X" } else { "." });
            }
            out.push('\n');
        }
        out
    }
}
