//! Error types for the minimizer
//!
//! Each concern has its own enum: [`LabelError`] for label text,
//! [`SolverError`] for cover solving, [`MinimizationError`] for a
//! minimization run and [`ProgramReadError`] for reading programs. All of
//! them convert into [`io::Error`] for callers that only deal in I/O errors.

use std::fmt;
use std::io;
use std::time::Duration;

use crate::label::{Key, LabelError};
use crate::solver::SolverError;

/// Errors raised by a minimization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinimizationError {
    /// The program holds no rule or valuation
    EmptyProgram,

    /// A label could not be encoded
    Label(LabelError),

    /// An original valuation is covered by no prime implicant
    ///
    /// This indicates a defect in merging or expansion and is never expected
    /// in a correct run.
    CoverageIncomplete {
        /// The uncovered valuation
        valuation: Key,
    },

    /// The cover solver ran out of budget before proving a minimum
    ///
    /// Retrying with a larger budget, or with the greedy solver, may succeed.
    SolverTimeout {
        /// Search nodes visited
        nodes: u64,
        /// Time spent searching
        elapsed: Duration,
    },

    /// Any other cover solver failure
    Solver(SolverError),
}

impl fmt::Display for MinimizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinimizationError::EmptyProgram => write!(f, "Program has no fundamental rules"),
            MinimizationError::Label(e) => write!(f, "{}", e),
            MinimizationError::CoverageIncomplete { valuation } => write!(
                f,
                "Valuation {} is not covered by any prime implicant",
                valuation
            ),
            MinimizationError::SolverTimeout { nodes, elapsed } => write!(
                f,
                "No minimal solution found within budget ({} nodes, {:.3} s)",
                nodes,
                elapsed.as_secs_f64()
            ),
            MinimizationError::Solver(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for MinimizationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MinimizationError::Label(e) => Some(e),
            MinimizationError::Solver(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LabelError> for MinimizationError {
    fn from(err: LabelError) -> Self {
        MinimizationError::Label(err)
    }
}

impl From<SolverError> for MinimizationError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::BudgetExceeded { nodes, elapsed } => {
                MinimizationError::SolverTimeout { nodes, elapsed }
            }
            other => MinimizationError::Solver(other),
        }
    }
}

impl From<MinimizationError> for io::Error {
    fn from(err: MinimizationError) -> Self {
        match err {
            MinimizationError::Label(e) => e.into(),
            MinimizationError::Solver(e) => e.into(),
            MinimizationError::SolverTimeout { .. } => io::Error::new(io::ErrorKind::TimedOut, err),
            MinimizationError::EmptyProgram => io::Error::new(io::ErrorKind::InvalidInput, err),
            MinimizationError::CoverageIncomplete { .. } => io::Error::other(err),
        }
    }
}

/// Errors that can occur while reading a program
#[derive(Debug)]
pub enum ProgramReadError {
    /// Reading the source failed
    Io(io::Error),
    /// A label line could not be encoded
    Label(LabelError),
}

impl fmt::Display for ProgramReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramReadError::Io(e) => write!(f, "{}", e),
            ProgramReadError::Label(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProgramReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgramReadError::Io(e) => Some(e),
            ProgramReadError::Label(e) => Some(e),
        }
    }
}

impl From<io::Error> for ProgramReadError {
    fn from(err: io::Error) -> Self {
        ProgramReadError::Io(err)
    }
}

impl From<LabelError> for ProgramReadError {
    fn from(err: LabelError) -> Self {
        ProgramReadError::Label(err)
    }
}

impl From<ProgramReadError> for io::Error {
    fn from(err: ProgramReadError) -> Self {
        match err {
            ProgramReadError::Io(e) => e,
            ProgramReadError::Label(e) => e.into(),
        }
    }
}
