//! Prime implicant generation
//!
//! [`PrimeSetBuilder`] drives the implicant table to a fixpoint. Each round
//! has two phases, both computed against a frozen snapshot and committed
//! afterwards, so the resulting prime set does not depend on the order in
//! which pairs are evaluated or on the number of workers:
//!
//! 1. **Expanding**: the original valuations become keys of the table, then
//!    aggregate keys that are only *partially* adjacent to another key are
//!    expanded into the valuations they cover. An expanded key is marked
//!    only when the expansion inserted a key the table did not hold.
//! 2. **Pairing**: every key, marked or not, is bucketed by adjacency value
//!    and keys in nearby buckets are merged with [`adjacent`].
//!
//! Marks are final. The loop stops once a round inserts no key, marks no key
//! and grows no coverage set. The unmarked keys left are exactly the maximal
//! patterns whose countermodels are all original valuations, whatever form
//! the input was written in.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use serde::Serialize;

use crate::adjacency::{adjacent, partially_adjacent, Absorption, Merge, MAX_MERGE_DELTA};
use crate::label::Key;
use crate::parallel;
use crate::table::{Implicant, ImplicantTable};

/// Phase of the prime generation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Inserting valuations and expanding partially adjacent aggregate keys
    Expanding,
    /// Merging adjacent keys
    Pairing,
    /// No further change is possible
    Fixpoint,
}

/// Counters for one round of the fixpoint loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoundStats {
    /// Round number, starting at 1
    pub round: usize,
    /// Valuations inserted by expansion
    pub expansions: usize,
    /// Adjacent pairs found
    pub merges: usize,
    /// Keys marked non-prime during the round
    pub marks: usize,
    /// Table size at the end of the round
    pub table_size: usize,
}

/// One evaluated merge with the coverage it carries
struct MergeEffect {
    operands: (Key, Key),
    merge: Merge,
    coverage: Implicant,
}

/// State machine computing the prime implicants of a table
#[derive(Debug)]
pub struct PrimeSetBuilder {
    table: ImplicantTable,
    phase: Phase,
    workers: usize,
    current: RoundStats,
    progress: bool,
    rounds: Vec<RoundStats>,
}

impl PrimeSetBuilder {
    /// Start from a freshly built table
    pub fn new(table: ImplicantTable, workers: usize) -> Self {
        PrimeSetBuilder {
            table,
            phase: Phase::Expanding,
            workers,
            current: RoundStats {
                round: 1,
                ..RoundStats::default()
            },
            progress: false,
            rounds: Vec::new(),
        }
    }

    /// The phase the next call to [`step`](Self::step) will run
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The table in its current state
    pub fn table(&self) -> &ImplicantTable {
        &self.table
    }

    /// Run one phase and return the phase that follows it
    pub fn step(&mut self) -> Phase {
        self.phase = match self.phase {
            Phase::Expanding => {
                if self.table.has_aggregates() {
                    self.expand();
                }
                Phase::Pairing
            }
            Phase::Pairing => {
                self.pair();
                self.finish_round()
            }
            Phase::Fixpoint => Phase::Fixpoint,
        };
        self.phase
    }

    /// Run to the fixpoint
    pub fn run(mut self) -> PrimeSet {
        while self.step() != Phase::Fixpoint {}
        PrimeSet {
            table: self.table,
            rounds: self.rounds,
        }
    }

    fn finish_round(&mut self) -> Phase {
        self.current.table_size = self.table.len();
        debug!(
            "round {}: {} expansions, {} merges, {} marks, {} implicants",
            self.current.round,
            self.current.expansions,
            self.current.merges,
            self.current.marks,
            self.current.table_size
        );
        self.rounds.push(self.current);

        if !std::mem::take(&mut self.progress) {
            return Phase::Fixpoint;
        }
        self.current = RoundStats {
            round: self.current.round + 1,
            ..RoundStats::default()
        };
        Phase::Expanding
    }

    fn insert_valuation(&mut self, valuation: Key) {
        if self.table.insert_valuation(valuation) {
            self.current.expansions += 1;
            self.progress = true;
        }
    }

    fn mark(&mut self, key: Key) {
        if self.table.mark(key) {
            self.current.marks += 1;
            self.progress = true;
        }
    }

    fn absorb(&mut self, absorber: Key, absorbed: Key) {
        let (marked, grew) = self.table.absorb(absorber, absorbed);
        if marked {
            self.current.marks += 1;
        }
        if marked || grew {
            self.progress = true;
        }
    }

    fn expand(&mut self) {
        let missing: Vec<Key> = self
            .table
            .valuations()
            .iter()
            .copied()
            .filter(|&valuation| !self.table.contains(valuation))
            .collect();
        for valuation in missing {
            self.insert_valuation(valuation);
        }

        let snapshot = self.table.unmarked_keys();
        let indices: Vec<usize> = (0..snapshot.len()).collect();
        let sides: BTreeSet<Key> = parallel::map(&indices, self.workers, |&i| {
            let a = snapshot[i];
            snapshot[i + 1..]
                .iter()
                .filter(|&&b| partially_adjacent(a, b))
                .flat_map(|&b| [a, b])
                .filter(|side| side.aggregate_weight() > 0)
                .collect::<Vec<Key>>()
        })
        .into_iter()
        .flatten()
        .collect();

        let sides: Vec<Key> = sides.into_iter().collect();
        let table = &self.table;
        let fresh: Vec<Vec<Key>> = parallel::map(&sides, self.workers, |&side| {
            table
                .get(side)
                .map(|implicant| {
                    implicant
                        .covers()
                        .iter()
                        .copied()
                        .filter(|valuation| !table.contains(*valuation))
                        .collect()
                })
                .unwrap_or_default()
        });

        for (side, fresh) in sides.into_iter().zip(fresh) {
            // re-expanding into known keys must leave the side alone
            if fresh.is_empty() {
                continue;
            }
            for valuation in fresh {
                self.insert_valuation(valuation);
            }
            self.mark(side);
            trace!("expanded {} into its valuations", side);
        }
    }

    fn pair(&mut self) {
        // absorbed keys stay in the pool: two of them can merge into a
        // prime no unmarked key produces
        let mut buckets: BTreeMap<u32, Vec<Key>> = BTreeMap::new();
        for (key, _) in self.table.iter() {
            buckets.entry(key.adjacency_value()).or_default().push(key);
        }

        let mut candidates = Vec::new();
        for (&low, left) in &buckets {
            for (_, right) in buckets.range(low + 1..=low + MAX_MERGE_DELTA) {
                candidates.extend(left.iter().map(|&l| (l, right)));
            }
        }

        let mut merges: Vec<(Key, Key, Merge)> =
            parallel::map(&candidates, self.workers, |&(l, right)| {
                right
                    .iter()
                    .filter_map(|&r| adjacent(l, r).map(|merge| (l, r, merge)))
                    .collect::<Vec<_>>()
            })
            .into_iter()
            .flatten()
            .collect();
        merges.sort_by_key(|&(l, r, merge)| (merge.key, l, r));
        self.current.merges = merges.len();

        let effects: Vec<MergeEffect> = merges
            .into_iter()
            .map(|(l, r, merge)| MergeEffect {
                operands: (l, r),
                merge,
                coverage: self.table.merged_coverage(l, r),
            })
            .collect();
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<MergeEffect>) {
        let mut absorbed = Vec::new();
        let mut masked = Vec::new();

        for effect in effects {
            let (l, r) = effect.operands;
            trace!("merge {} + {} -> {}", l, r, effect.merge.key);
            if self.table.union_into(effect.merge.key, effect.coverage) {
                self.progress = true;
            }
            match effect.merge.absorption {
                Absorption::Operands => absorbed.push((effect.merge.key, l, r)),
                Absorption::Masked { .. } => masked.push(effect.merge),
            }
        }

        for (key, l, r) in absorbed {
            self.absorb(key, l);
            self.absorb(key, r);
        }

        masked.sort_by_key(|merge| (merge.key.raw().count_ones(), merge.key));
        masked.dedup();
        for merge in masked {
            let victims: Vec<Key> = self
                .table
                .iter()
                .map(|(key, _)| key)
                .filter(|&key| merge.absorbs(key))
                .collect();
            for victim in victims {
                self.absorb(merge.key, victim);
            }
        }
    }
}

/// The table at the fixpoint together with the round history
#[derive(Debug, Clone)]
pub struct PrimeSet {
    table: ImplicantTable,
    rounds: Vec<RoundStats>,
}

impl PrimeSet {
    /// Build the prime set of a table with default settings
    pub fn build(table: ImplicantTable, workers: usize) -> Self {
        PrimeSetBuilder::new(table, workers).run()
    }

    /// The prime implicants in key order
    pub fn primes(&self) -> Vec<Key> {
        self.table.primes()
    }

    /// The table, marked implicants included
    pub fn table(&self) -> &ImplicantTable {
        &self.table
    }

    /// Take the table out
    pub fn into_table(self) -> ImplicantTable {
        self.table
    }

    /// Counters of every round that ran
    pub fn rounds(&self) -> &[RoundStats] {
        &self.rounds
    }
}
