//! Packed keys and their textual labels
//!
//! A label of `N` literals packs into one integer of `N` 3-bit lanes, the
//! leftmost literal in the most significant lane. No literal has code `000`,
//! so the width of a key is recoverable from the key alone.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::LabelError;
use super::literal::{Literal, LANE_BITS, LANE_MASK};

/// Maximum number of positions a key can hold
pub const MAX_WIDTH: usize = (u64::BITS / LANE_BITS) as usize;

/// A packed literal pattern identifying one implicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(u64);

impl Key {
    /// Wrap a raw packed value
    pub const fn from_raw(raw: u64) -> Self {
        Key(raw)
    }

    /// The raw packed value
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Number of positions in the key
    pub fn width(self) -> usize {
        let mut width = 0;
        let mut rest = self.0;
        while rest & LANE_MASK != 0 {
            width += 1;
            rest >>= LANE_BITS;
        }
        width
    }

    /// Lane code at `lane`, counted from the least significant (rightmost) lane
    pub(crate) fn lane(self, lane: usize) -> u64 {
        (self.0 >> (lane as u32 * LANE_BITS)) & LANE_MASK
    }

    /// Literal at `position`, counted from the left
    pub fn literal_at(self, position: usize) -> Option<Literal> {
        let width = self.width();
        if position >= width {
            return None;
        }
        Literal::from_code(self.lane(width - 1 - position))
    }

    /// Iterate over the literals from left to right
    pub fn literals(self) -> impl Iterator<Item = Literal> {
        let width = self.width();
        (0..width)
            .rev()
            .filter_map(move |lane| Literal::from_code(self.lane(lane)))
    }

    /// Sum of per-literal aggregate weights
    pub fn aggregate_weight(self) -> u32 {
        self.literals().map(Literal::aggregate_weight).sum()
    }

    /// Sum of per-literal adjacency weights, used to bucket pairing candidates
    pub fn adjacency_value(self) -> u32 {
        self.literals().map(Literal::adjacency_weight).sum()
    }

    /// Number of literals the key renders as in a rule
    pub fn literal_count(self) -> usize {
        self.literals().map(Literal::literal_count).sum()
    }

    /// Number of concrete valuations the key falsifies under
    pub fn countermodel_count(self) -> u64 {
        self.literals()
            .map(|literal| u64::from(literal.code().count_ones()))
            .product()
    }

    /// True when every position holds a single truth value
    pub fn is_concrete(self) -> bool {
        self.literals().all(Literal::is_concrete)
    }

    /// True when `self` falsifies under every valuation `other` does
    ///
    /// This is lane-wise set inclusion of the falsifying value sets.
    pub fn subsumes(self, other: Key) -> bool {
        self.0 | other.0 == self.0
    }

    /// Decode into a label
    pub fn label(self) -> Label {
        Label(self.literals().collect())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for literal in self.literals() {
            write!(f, "{}", literal.symbol())?;
        }
        Ok(())
    }
}

/// A sequence of literals, one per atom of the program signature
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(Vec<Literal>);

impl Label {
    /// Create a label from literals
    pub fn new(literals: Vec<Literal>) -> Self {
        Label(literals)
    }

    /// The literals of this label
    pub fn literals(&self) -> &[Literal] {
        &self.0
    }

    /// Number of positions
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// Pack the label into a key
    pub fn key(&self) -> Result<Key, LabelError> {
        if self.0.is_empty() {
            return Err(LabelError::Empty);
        }
        if self.0.len() > MAX_WIDTH {
            return Err(LabelError::TooWide {
                width: self.0.len(),
            });
        }
        let raw = self
            .0
            .iter()
            .fold(0u64, |acc, literal| (acc << LANE_BITS) | literal.code());
        Ok(Key(raw))
    }
}

impl FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, symbol)| {
                Literal::from_symbol(symbol).ok_or_else(|| LabelError::InvalidSymbol {
                    symbol,
                    position,
                    label: Arc::from(s),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Label)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for literal in &self.0 {
            write!(f, "{}", literal.symbol())?;
        }
        Ok(())
    }
}

impl From<Key> for Label {
    fn from(key: Key) -> Self {
        key.label()
    }
}

/// Encode label text into a key
pub fn encode(label: &str) -> Result<Key, LabelError> {
    label.parse::<Label>()?.key()
}

/// Decode a key back into its label
pub fn decode(key: Key) -> Label {
    key.label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uses_leftmost_lane_as_most_significant() {
        let key = encode("0z").unwrap();
        assert_eq!(key.raw(), 0b001_011);
        assert_eq!(key.width(), 2);
        assert_eq!(key.literal_at(0), Some(Literal::NegativeBody));
        assert_eq!(key.literal_at(1), Some(Literal::PositiveHead));
        assert_eq!(key.literal_at(2), None);
    }

    #[test]
    fn test_encode_decode_inverse() {
        for text in ["0", "x", "012zox", "zzzz", "1x0o2"] {
            let key = encode(text).unwrap();
            assert_eq!(decode(key).to_string(), text);
            assert_eq!(key.to_string(), text);
        }
    }

    #[test]
    fn test_encode_rejects_foreign_symbol() {
        match encode("02a1") {
            Err(LabelError::InvalidSymbol {
                symbol, position, ..
            }) => {
                assert_eq!(symbol, 'a');
                assert_eq!(position, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_encode_rejects_empty_and_wide_labels() {
        assert_eq!(encode(""), Err(LabelError::Empty));
        let wide = "0".repeat(MAX_WIDTH + 1);
        assert_eq!(
            encode(&wide),
            Err(LabelError::TooWide {
                width: MAX_WIDTH + 1
            })
        );
        assert!(encode(&"x".repeat(MAX_WIDTH)).is_ok());
    }

    #[test]
    fn test_weights_read_digits_independently() {
        let key = encode("012zox").unwrap();
        assert_eq!(key.aggregate_weight(), 4);
        assert_eq!(key.adjacency_value(), 1 + 0 + 1 + 2 + 3 + 6);
        assert_eq!(key.literal_count(), 1 + 2 + 1 + 1 + 1);
        assert_eq!(key.countermodel_count(), 2 * 2 * 3);
        assert!(!key.is_concrete());
        assert!(encode("0120").unwrap().is_concrete());
    }

    #[test]
    fn test_subsumes_is_lanewise_inclusion() {
        let general = encode("xz").unwrap();
        assert!(general.subsumes(encode("0z").unwrap()));
        assert!(general.subsumes(encode("o1").unwrap()));
        assert!(!general.subsumes(encode("o2").unwrap()));
        assert!(general.subsumes(general));
    }
}
