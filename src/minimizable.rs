//! Minimizable trait for rule sets
//!
//! This module provides the public [`Minimizable`] trait, a uniform interface
//! for turning a rule set into a minimal strongly equivalent one.

use std::sync::Arc;

use crate::error::MinimizationError;
use crate::solver::{BranchAndBound, CoverSolver};
use crate::MinimizerConfig;

/// Public trait for types that can be minimized
///
/// All methods take `&self` and return a new minimized instance, leaving the
/// original untouched:
///
/// ```
/// use htmin::{Minimizable, Program};
///
/// # fn main() -> std::io::Result<()> {
/// let program: Program = "a :- b.\nnot a :- b.\n".parse()?;
/// let minimized = program.minimize()?;
///
/// assert_eq!(minimized.to_rules(), ":- b.");
/// assert_eq!(program.len(), 2);
/// # Ok(())
/// # }
/// ```
///
/// When several minimal rule sets exist the first in tie-break order is
/// returned; use [`Minimizer`](crate::Minimizer) to see all of them.
pub trait Minimizable {
    /// Minimize with the default configuration and the exact solver
    fn minimize(&self) -> Result<Self, MinimizationError>
    where
        Self: Sized,
    {
        self.minimize_with_config(&MinimizerConfig::default())
    }

    /// Minimize with a custom configuration and the exact solver
    fn minimize_with_config(&self, config: &MinimizerConfig) -> Result<Self, MinimizationError>
    where
        Self: Sized,
    {
        self.minimize_with_solver(config, Arc::new(BranchAndBound::new()))
    }

    /// Minimize with a custom configuration and cover solver
    ///
    /// This is the method implementations must provide.
    fn minimize_with_solver(
        &self,
        config: &MinimizerConfig,
        solver: Arc<dyn CoverSolver>,
    ) -> Result<Self, MinimizationError>
    where
        Self: Sized;
}
