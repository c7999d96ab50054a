//! # htmin
//!
//! Minimization of logic programs under Here-and-There (HT) logic.
//!
//! A rule set is replaced by a smallest rule set that is *strongly
//! equivalent* to it, meaning the two can be swapped inside any larger
//! program without changing its answer sets. The method is Quine-McCluskey
//! lifted to three truth values, followed by Petrick's method:
//!
//! 1. every rule becomes a [`Key`](label::Key), a packed pattern of the
//!    truth values that falsify it;
//! 2. adjacent patterns are merged until only prime implicants remain
//!    ([`primes`]);
//! 3. primes that are the only cover of some valuation are selected
//!    ([`essential`]);
//! 4. the rest is a set cover problem handed to a [`CoverSolver`]
//!    ([`select`]);
//! 5. the selected primes are rendered back as rules ([`rules`]).
//!
//! ## Minimizing rules
//!
//! ```
//! use htmin::{Minimizable, Program};
//!
//! # fn main() -> std::io::Result<()> {
//! let program: Program = "p :- q.\np ; not p :- q.\n".parse()?;
//! let minimized = program.minimize()?;
//! println!("{}", minimized.to_rules());
//! # Ok(())
//! # }
//! ```
//!
//! ## Minimizing labels
//!
//! Programs can also be given directly as labels over `{0, 1, 2, z, o, x}`,
//! one character per atom:
//!
//! | label | rule literal for atom `a` |
//! |-------|---------------------------|
//! | `2`   | `a` in the body           |
//! | `0`   | `not a` in the body       |
//! | `z`   | `a` in the head           |
//! | `o`   | `not a` in the head       |
//! | `1`   | `a ; not a` in the head   |
//! | `x`   | `a` does not occur        |
//!
//! [`Minimizer`] exposes the whole [`Report`]: every optimal solution, the
//! prime and essential implicants and the time spent per stage.
//!
//! ```
//! use htmin::Minimizer;
//!
//! # fn main() -> Result<(), htmin::MinimizationError> {
//! let report = Minimizer::new().run_labels(&["020", "120", "001", "021"])?;
//! let best = report.best().unwrap();
//! assert_eq!(best.labels(), vec!["001", "02z", "z20"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Cover solvers
//!
//! The minimum cover search is exponential in the worst case and runs under
//! a [`SolverBudget`]. [`BranchAndBound`] is exact and enumerates every
//! minimum cover; [`Greedy`] returns one cover quickly without an optimality
//! guarantee. Any other backend can be plugged in through [`CoverSolver`].
//!
//! ```
//! use htmin::{Greedy, Minimizer};
//!
//! # fn main() -> Result<(), htmin::MinimizationError> {
//! let report = Minimizer::new()
//!     .solver(Greedy)
//!     .run_labels(&["2o", "o2"])?;
//! assert!(!report.solutions.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety and Concurrency
//!
//! Every run owns its implicant table; nothing is shared between runs, so a
//! [`Minimizer`] can be cloned or shared across threads freely. Within a run,
//! expansion and pairing can be spread over worker threads with
//! [`MinimizerConfig::workers`]. The result does not depend on the number of
//! workers.

// Public modules
pub mod adjacency;
pub mod error;
pub mod essential;
pub mod label;
pub mod primes;
pub mod program;
pub mod report;
pub mod rules;
pub mod select;
pub mod signature;
pub mod solver;
pub mod table;
pub mod verify;

mod minimizable;
mod minimize;
mod parallel;

// Re-export high-level public API
pub use error::{MinimizationError, ProgramReadError};
pub use label::{Key, LabelError};
pub use minimizable::Minimizable;
pub use minimize::Minimizer;
pub use program::{Grammar, Program};
pub use report::{Report, Solution, Timings};
pub use rules::{key_to_rule, keys_to_rules, Rule};
pub use select::{CoverStrategy, MinMode};
pub use signature::Signature;
pub use solver::{
    BranchAndBound, CoverProblem, CoverResponse, CoverSolver, Greedy, SolverBudget, SolverError,
};

/// Configuration for a minimization run
#[derive(Debug, Clone)]
pub struct MinimizerConfig {
    /// Which primes and valuations reach the cover solver
    pub strategy: CoverStrategy,
    /// Criterion between covers with the fewest rules
    pub min_mode: MinMode,
    /// Report every optimal solution instead of one
    pub all_solutions: bool,
    /// Worker threads for expansion and pairing, 0 for one per core
    pub workers: usize,
    /// Limits for the cover solver
    pub budget: SolverBudget,
}

impl Default for MinimizerConfig {
    fn default() -> Self {
        MinimizerConfig {
            strategy: CoverStrategy::Hybrid,
            min_mode: MinMode::Atoms,
            all_solutions: false,
            workers: 1,
            budget: SolverBudget::default(),
        }
    }
}

impl MinimizerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }
}
