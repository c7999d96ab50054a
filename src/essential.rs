//! Essential prime extraction
//!
//! A prime is essential when it is the only prime covering some valuation
//! that is still unused. Selecting it retires every valuation in its
//! `totalcovers`, which can expose new essentials in the next round.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::MinimizationError;
use crate::label::Key;
use crate::table::ImplicantTable;

/// Which primes cover each original valuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMap {
    covered_by: BTreeMap<Key, Vec<Key>>,
}

impl CoverageMap {
    /// Index the unmarked implicants of a table by the valuations they cover
    ///
    /// Fails with [`MinimizationError::CoverageIncomplete`] when some original
    /// valuation is not covered by any prime.
    pub fn build(table: &ImplicantTable) -> Result<Self, MinimizationError> {
        let primes = table.primes();
        let mut covered_by = BTreeMap::new();
        for &valuation in table.valuations() {
            let holders: Vec<Key> = primes
                .iter()
                .copied()
                .filter(|&prime| {
                    table
                        .get(prime)
                        .is_some_and(|implicant| implicant.totalcovers().contains(&valuation))
                })
                .collect();
            if holders.is_empty() {
                return Err(MinimizationError::CoverageIncomplete { valuation });
            }
            covered_by.insert(valuation, holders);
        }
        Ok(CoverageMap { covered_by })
    }

    /// Primes covering `valuation`
    pub fn covered_by(&self, valuation: Key) -> &[Key] {
        self.covered_by
            .get(&valuation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every original valuation with its covering primes, in key order
    pub fn iter(&self) -> impl Iterator<Item = (Key, &[Key])> {
        self.covered_by.iter().map(|(&v, p)| (v, p.as_slice()))
    }

    /// Number of original valuations
    pub fn len(&self) -> usize {
        self.covered_by.len()
    }

    /// True when there are no valuations
    pub fn is_empty(&self) -> bool {
        self.covered_by.is_empty()
    }
}

/// Outcome of essential extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Essential primes, in key order
    pub essentials: Vec<Key>,
    /// Valuations no essential covers, in key order
    pub leftover: Vec<Key>,
    /// Primes that were not selected as essential, in key order
    pub remaining: Vec<Key>,
    /// Number of rounds that selected at least one essential
    pub rounds: usize,
}

impl Extraction {
    /// No essentials: every valuation left over, every prime remaining
    pub fn skipped(table: &ImplicantTable) -> Self {
        Extraction {
            essentials: Vec::new(),
            leftover: table.valuations().iter().copied().collect(),
            remaining: table.primes(),
            rounds: 0,
        }
    }

    /// True when the essentials alone cover every valuation
    pub fn is_full_cover(&self) -> bool {
        self.leftover.is_empty()
    }
}

/// Select essential primes until no round finds a new one
///
/// Essentials are flagged on the table as they are found.
pub fn extract_essentials(
    table: &mut ImplicantTable,
    coverage: &CoverageMap,
) -> Extraction {
    let mut used: BTreeSet<Key> = BTreeSet::new();
    let mut essentials: BTreeSet<Key> = BTreeSet::new();
    let mut rounds = 0;

    loop {
        let unused: Vec<(Key, &[Key])> = coverage
            .iter()
            .filter(|(valuation, _)| !used.contains(valuation))
            .collect();
        if unused.is_empty() {
            break;
        }

        let found: BTreeSet<Key> = unused
            .iter()
            .filter_map(|(_, holders)| match holders {
                [only] => Some(*only),
                _ => None,
            })
            .filter(|prime| !essentials.contains(prime))
            .collect();
        if found.is_empty() {
            break;
        }

        rounds += 1;
        for &prime in &found {
            table.set_essential(prime);
            if let Some(implicant) = table.get(prime) {
                used.extend(implicant.totalcovers().iter().copied());
            }
        }
        debug!(
            "essential round {}: {} new essentials, {} valuations left",
            rounds,
            found.len(),
            coverage.iter().filter(|(v, _)| !used.contains(v)).count()
        );
        essentials.extend(found);
    }

    let leftover = coverage
        .iter()
        .map(|(valuation, _)| valuation)
        .filter(|valuation| !used.contains(valuation))
        .collect();
    let remaining = table
        .primes()
        .into_iter()
        .filter(|prime| !essentials.contains(prime))
        .collect();

    Extraction {
        essentials: essentials.into_iter().collect(),
        leftover,
        remaining,
        rounds,
    }
}
