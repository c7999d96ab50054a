//! Errors returned by cover solvers

use std::fmt;
use std::io;
use std::time::Duration;

use crate::label::Key;

/// Failure of a cover solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The node or time budget ran out before the search finished
    BudgetExceeded {
        /// Search nodes visited
        nodes: u64,
        /// Time spent searching
        elapsed: Duration,
    },
    /// The caller raised the cancellation flag
    Cancelled,
    /// An element of the universe belongs to no subset
    Infeasible {
        /// The uncoverable element
        element: Key,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::BudgetExceeded { nodes, elapsed } => write!(
                f,
                "Cover search exceeded its budget after {} nodes in {:.3} s",
                nodes,
                elapsed.as_secs_f64()
            ),
            SolverError::Cancelled => write!(f, "Cover search was cancelled"),
            SolverError::Infeasible { element } => {
                write!(f, "Element {} is not covered by any subset", element)
            }
        }
    }
}

impl std::error::Error for SolverError {}

impl From<SolverError> for io::Error {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::BudgetExceeded { .. } => io::Error::new(io::ErrorKind::TimedOut, err),
            SolverError::Cancelled => io::Error::new(io::ErrorKind::Interrupted, err),
            SolverError::Infeasible { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::encode;

    #[test]
    fn test_budget_exceeded_display() {
        let err = SolverError::BudgetExceeded {
            nodes: 1200,
            elapsed: Duration::from_millis(1500),
        };
        let msg = err.to_string();
        assert!(msg.contains("1200 nodes"));
        assert!(msg.contains("1.500 s"));
    }

    #[test]
    fn test_infeasible_names_element() {
        let err = SolverError::Infeasible {
            element: encode("02z").unwrap(),
        };
        assert!(err.to_string().contains("02z"));
    }

    #[test]
    fn test_io_error_kinds() {
        let timeout: io::Error = SolverError::BudgetExceeded {
            nodes: 1,
            elapsed: Duration::ZERO,
        }
        .into();
        assert_eq!(timeout.kind(), io::ErrorKind::TimedOut);
        let cancelled: io::Error = SolverError::Cancelled.into();
        assert_eq!(cancelled.kind(), io::ErrorKind::Interrupted);
    }
}
