//! Minimum set cover: the problem handed to a solver and the answer it returns
//!
//! The leftover valuations after essential extraction form the universe, and
//! every remaining prime contributes one subset. A [`CoverSolver`] returns
//! every minimum-cost sub-family whose union is the universe.
//!
//! The wire format is a flat list of [`Fact`] triples; both the problem and
//! the response serialize with `serde`.
//!
//! ```
//! use htmin::label::encode;
//! use htmin::solver::{BranchAndBound, CoverProblem, CoverSolver, SolverBudget};
//!
//! let a = encode("01").unwrap();
//! let b = encode("02").unwrap();
//! let c = encode("12").unwrap();
//!
//! let mut problem = CoverProblem::new(vec![a, b, c]);
//! problem.add_subset(1, [a, b]);
//! problem.add_subset(1, [b, c]);
//! let both = problem.add_subset(1, [a, b, c]);
//!
//! let response = BranchAndBound::new()
//!     .solve(&problem, &SolverBudget::default())
//!     .unwrap();
//! assert!(response.optimal);
//! assert_eq!(response.covers.len(), 1);
//! assert!(response.covers[0].contains(&both));
//! ```

mod branch_bound;
mod error;
mod greedy;

pub use branch_bound::BranchAndBound;
pub use error::SolverError;
pub use greedy::Greedy;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::label::Key;

/// Identifier of one subset of a cover problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubsetId(pub usize);

impl fmt::Display for SubsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// One `(subset, cost, member)` triple of the wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fact {
    /// The subset the member belongs to
    pub subset: SubsetId,
    /// Cost of selecting the subset
    pub cost: u32,
    /// An element of the universe covered by the subset
    pub member: Key,
}

/// A candidate subset with its cost and members as universe indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subset {
    /// Identifier reported back in covers
    pub id: SubsetId,
    /// Cost of selecting this subset
    pub cost: u32,
    /// Indices into [`CoverProblem::universe`], ascending
    pub members: Vec<usize>,
}

/// A finite universe and a family of costed subsets of it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverProblem {
    universe: Vec<Key>,
    subsets: Vec<Subset>,
}

impl CoverProblem {
    /// Create a problem over the given universe, duplicates removed
    pub fn new(universe: impl IntoIterator<Item = Key>) -> Self {
        let universe: BTreeSet<Key> = universe.into_iter().collect();
        CoverProblem {
            universe: universe.into_iter().collect(),
            subsets: Vec::new(),
        }
    }

    /// Rebuild a problem from its wire facts
    ///
    /// The universe is the set of all members; each subset keeps the cost of
    /// its first fact.
    pub fn from_facts(facts: &[Fact]) -> Self {
        let mut problem = CoverProblem::new(facts.iter().map(|f| f.member));
        let mut grouped: BTreeMap<SubsetId, (u32, Vec<Key>)> = BTreeMap::new();
        for fact in facts {
            grouped
                .entry(fact.subset)
                .or_insert_with(|| (fact.cost, Vec::new()))
                .1
                .push(fact.member);
        }
        for (id, (cost, members)) in grouped {
            problem.push_subset(id, cost, members);
        }
        problem
    }

    /// Add a subset, keeping only members that belong to the universe
    pub fn add_subset(&mut self, cost: u32, members: impl IntoIterator<Item = Key>) -> SubsetId {
        let id = SubsetId(self.subsets.len());
        self.push_subset(id, cost, members);
        id
    }

    fn push_subset(&mut self, id: SubsetId, cost: u32, members: impl IntoIterator<Item = Key>) {
        let members: BTreeSet<usize> = members
            .into_iter()
            .filter_map(|member| self.universe.binary_search(&member).ok())
            .collect();
        self.subsets.push(Subset {
            id,
            cost,
            members: members.into_iter().collect(),
        });
    }

    /// Elements that must be covered, ascending
    pub fn universe(&self) -> &[Key] {
        &self.universe
    }

    /// Candidate subsets in insertion order
    pub fn subsets(&self) -> &[Subset] {
        &self.subsets
    }

    /// Look up a subset by identifier
    pub fn subset(&self, id: SubsetId) -> Option<&Subset> {
        self.subsets.iter().find(|s| s.id == id)
    }

    /// The problem as `(subset, cost, member)` triples
    pub fn facts(&self) -> Vec<Fact> {
        self.subsets
            .iter()
            .flat_map(|subset| {
                subset.members.iter().map(move |&m| Fact {
                    subset: subset.id,
                    cost: subset.cost,
                    member: self.universe[m],
                })
            })
            .collect()
    }

    /// Total cost of a selection, `None` if it names an unknown subset
    pub fn cost_of(&self, cover: &BTreeSet<SubsetId>) -> Option<u64> {
        cover
            .iter()
            .map(|&id| self.subset(id).map(|s| u64::from(s.cost)))
            .sum()
    }

    /// True when the selected subsets cover the whole universe
    pub fn is_cover(&self, cover: &BTreeSet<SubsetId>) -> bool {
        let covered: BTreeSet<usize> = cover
            .iter()
            .filter_map(|&id| self.subset(id))
            .flat_map(|s| s.members.iter().copied())
            .collect();
        covered.len() == self.universe.len()
    }

    /// Candidate subsets of every element; fails on an uncoverable element
    pub(crate) fn candidates(&self) -> Result<Vec<Vec<usize>>, SolverError> {
        let mut candidates = vec![Vec::new(); self.universe.len()];
        for (index, subset) in self.subsets.iter().enumerate() {
            for &member in &subset.members {
                candidates[member].push(index);
            }
        }
        for (element, list) in candidates.iter_mut().enumerate() {
            if list.is_empty() {
                return Err(SolverError::Infeasible {
                    element: self.universe[element],
                });
            }
            list.sort_by_key(|&s| (self.subsets[s].cost, self.subsets[s].id));
        }
        Ok(candidates)
    }
}

/// Answer of a cover solver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverResponse {
    /// Minimum covers, each a set of subset identifiers
    pub covers: Vec<BTreeSet<SubsetId>>,
    /// True when the covers are proven minimum
    pub optimal: bool,
}

/// Limits placed on one solver call
#[derive(Debug, Clone)]
pub struct SolverBudget {
    /// Maximum number of search nodes, unlimited when `None`
    pub max_nodes: Option<u64>,
    /// Maximum wall-clock time, unlimited when `None`
    pub time_limit: Option<Duration>,
    /// Raised by another thread to stop the search
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SolverBudget {
    /// A budget without any limit
    pub fn unlimited() -> Self {
        SolverBudget {
            max_nodes: None,
            time_limit: None,
            cancel: None,
        }
    }

    /// Start counting against this budget
    pub fn meter(&self) -> BudgetMeter<'_> {
        BudgetMeter {
            budget: self,
            nodes: 0,
            started: Instant::now(),
        }
    }
}

impl Default for SolverBudget {
    fn default() -> Self {
        SolverBudget {
            max_nodes: Some(10_000_000),
            time_limit: None,
            cancel: None,
        }
    }
}

/// Running node count and clock of one solver call
#[derive(Debug)]
pub struct BudgetMeter<'a> {
    budget: &'a SolverBudget,
    nodes: u64,
    started: Instant,
}

impl BudgetMeter<'_> {
    const CLOCK_INTERVAL: u64 = 1024;

    /// Count one search node and check every limit
    pub fn tick(&mut self) -> Result<(), SolverError> {
        self.nodes += 1;
        if let Some(cancel) = &self.budget.cancel {
            if cancel.load(Ordering::Relaxed) {
                return Err(SolverError::Cancelled);
            }
        }
        if self.budget.max_nodes.is_some_and(|max| self.nodes > max) {
            return Err(self.exceeded());
        }
        if self.nodes % Self::CLOCK_INTERVAL == 0 {
            if let Some(limit) = self.budget.time_limit {
                if self.started.elapsed() > limit {
                    return Err(self.exceeded());
                }
            }
        }
        Ok(())
    }

    /// Nodes counted so far
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Time since the meter started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn exceeded(&self) -> SolverError {
        SolverError::BudgetExceeded {
            nodes: self.nodes,
            elapsed: self.started.elapsed(),
        }
    }
}

/// A minimum set cover engine
///
/// Implementations must return only covers of the whole universe. When
/// `optimal` is true every returned cover has minimum total cost and every
/// minimum-cost cover is returned.
pub trait CoverSolver: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Solve the problem within the budget
    fn solve(
        &self,
        problem: &CoverProblem,
        budget: &SolverBudget,
    ) -> Result<CoverResponse, SolverError>;
}
