//! The six literal states a rule position can take
//!
//! Each state is stored as a 3-bit lane. Bit `i` of the lane is set when the
//! Here-and-There truth value `i` of the atom falsifies the literal at that
//! position (0 = false in both worlds, 1 = false here and true there,
//! 2 = true in both worlds). Unions of lanes are therefore unions of
//! falsifying value sets, which is what makes bitwise OR a merge operation.

use std::fmt;

/// Number of bits used by one lane of a packed key
pub const LANE_BITS: u32 = 3;

/// Mask selecting the lowest lane of a packed key
pub const LANE_MASK: u64 = 0b111;

/// Lane value produced by merging a negative and a positive body literal.
///
/// No literal carries this code; a merge whose union contains it is rejected.
pub const INCOMPATIBLE_UNION: u64 = 0b101;

/// A literal state at one position of a rule label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Literal {
    /// `0`: the atom occurs negated in the body (`not a`)
    NegativeBody,
    /// `1`: the atom occurs in the head both plain and negated (`a ; not a`)
    Free,
    /// `2`: the atom occurs in the body (`a`)
    PositiveBody,
    /// `z`: the atom occurs in the head (`a`)
    PositiveHead,
    /// `o`: the atom occurs negated in the head (`not a`)
    NegativeHead,
    /// `x`: the atom does not occur in the rule
    Absent,
}

impl Literal {
    /// Every literal, in codebook order
    pub const ALL: [Literal; 6] = [
        Literal::NegativeBody,
        Literal::Free,
        Literal::PositiveBody,
        Literal::PositiveHead,
        Literal::NegativeHead,
        Literal::Absent,
    ];

    /// The 3-bit lane code of this literal
    pub const fn code(self) -> u64 {
        match self {
            Literal::NegativeBody => 0b001,
            Literal::Free => 0b010,
            Literal::PositiveBody => 0b100,
            Literal::PositiveHead => 0b011,
            Literal::NegativeHead => 0b110,
            Literal::Absent => 0b111,
        }
    }

    /// Decode a lane code, `None` for `000` and the incompatible union
    pub const fn from_code(code: u64) -> Option<Self> {
        match code {
            0b001 => Some(Literal::NegativeBody),
            0b010 => Some(Literal::Free),
            0b100 => Some(Literal::PositiveBody),
            0b011 => Some(Literal::PositiveHead),
            0b110 => Some(Literal::NegativeHead),
            0b111 => Some(Literal::Absent),
            _ => None,
        }
    }

    /// The character used for this literal in labels
    pub const fn symbol(self) -> char {
        match self {
            Literal::NegativeBody => '0',
            Literal::Free => '1',
            Literal::PositiveBody => '2',
            Literal::PositiveHead => 'z',
            Literal::NegativeHead => 'o',
            Literal::Absent => 'x',
        }
    }

    /// Parse a label character
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '0' => Some(Literal::NegativeBody),
            '1' => Some(Literal::Free),
            '2' => Some(Literal::PositiveBody),
            'z' => Some(Literal::PositiveHead),
            'o' => Some(Literal::NegativeHead),
            'x' => Some(Literal::Absent),
            _ => None,
        }
    }

    /// Contribution to the aggregate weight of a key.
    ///
    /// A key with nonzero aggregate weight stands for more than one countermodel.
    pub const fn aggregate_weight(self) -> u32 {
        match self {
            Literal::PositiveHead | Literal::NegativeHead => 1,
            Literal::Absent => 2,
            _ => 0,
        }
    }

    /// Contribution to the adjacency value used for bucketed pairing
    ///
    /// Every valid single-lane merge changes this weight by one or two steps.
    pub const fn adjacency_weight(self) -> u32 {
        match self {
            Literal::Free => 0,
            Literal::NegativeBody | Literal::PositiveBody => 1,
            Literal::PositiveHead => 2,
            Literal::NegativeHead => 3,
            Literal::Absent => 6,
        }
    }

    /// Number of rule literals this position renders as
    pub const fn literal_count(self) -> usize {
        match self {
            Literal::Absent => 0,
            Literal::Free => 2,
            _ => 1,
        }
    }

    /// True when the literal stands for exactly one truth value
    pub const fn is_concrete(self) -> bool {
        matches!(
            self,
            Literal::NegativeBody | Literal::Free | Literal::PositiveBody
        )
    }

    /// True when the literal renders in the rule head
    pub const fn is_head(self) -> bool {
        matches!(
            self,
            Literal::Free | Literal::PositiveHead | Literal::NegativeHead
        )
    }

    /// True when the literal renders in the rule body
    pub const fn is_body(self) -> bool {
        matches!(self, Literal::NegativeBody | Literal::PositiveBody)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
