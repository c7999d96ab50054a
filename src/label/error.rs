//! Error types for label encoding

use std::fmt;
use std::io;
use std::sync::Arc;

use super::key::MAX_WIDTH;

/// Errors raised while turning label text into packed keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// A character outside the `{0, 1, 2, z, o, x}` alphabet
    InvalidSymbol {
        /// The offending character
        symbol: char,
        /// Position of the character in the label
        position: usize,
        /// The whole label
        label: Arc<str>,
    },
    /// A label with no positions
    Empty,
    /// A label with more positions than a key can hold
    TooWide {
        /// Number of positions in the label
        width: usize,
    },
    /// A label whose width differs from the rest of its program
    WidthMismatch {
        /// Width shared by the program
        expected: usize,
        /// Width of this label
        actual: usize,
        /// The offending label
        label: Arc<str>,
    },
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelError::InvalidSymbol {
                symbol,
                position,
                label,
            } => write!(
                f,
                "Invalid symbol '{}' at position {} in label '{}'. Expected one of 0, 1, 2, z, o, x.",
                symbol, position, label
            ),
            LabelError::Empty => write!(f, "Label has no positions"),
            LabelError::TooWide { width } => write!(
                f,
                "Label has {} positions but at most {} are supported",
                width, MAX_WIDTH
            ),
            LabelError::WidthMismatch {
                expected,
                actual,
                label,
            } => write!(
                f,
                "Label '{}' has {} positions, expected {}",
                label, actual, expected
            ),
        }
    }
}

impl std::error::Error for LabelError {}

impl From<LabelError> for io::Error {
    fn from(err: LabelError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_symbol_display() {
        let err = LabelError::InvalidSymbol {
            symbol: 'q',
            position: 3,
            label: Arc::from("020q"),
        };
        let msg = err.to_string();
        assert!(msg.contains("'q'"));
        assert!(msg.contains("position 3"));
        assert!(msg.contains("020q"));
    }

    #[test]
    fn test_too_wide_display() {
        let msg = LabelError::TooWide { width: 30 }.to_string();
        assert!(msg.contains("30"));
        assert!(msg.contains(&MAX_WIDTH.to_string()));
    }

    #[test]
    fn test_label_error_to_io_error() {
        let io_err: io::Error = LabelError::Empty.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }
}
