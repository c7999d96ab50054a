//! Adjacency between packed keys
//!
//! Two keys are adjacent when they differ in exactly one lane and the union
//! of that lane is a valid literal. The union of the two keys is then a more
//! general implicant covering both.

use crate::label::{Key, Literal, INCOMPATIBLE_UNION, LANE_BITS, LANE_MASK};

/// Largest change of adjacency value a single merge can cause
pub const MAX_MERGE_DELTA: u32 = 2;

/// Which implicants a merge proves non-prime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absorption {
    /// Both operands held concrete values in the changed lane and are absorbed
    Operands,
    /// The changed lane became `x`: every key equal to the merged key outside
    /// the changed lane is absorbed
    Masked {
        /// Bits of the lanes that must match the merged key
        mask: u64,
    },
}

/// Result of merging two adjacent keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    /// The merged key, the bitwise union of the operands
    pub key: Key,
    /// Position of the changed lane, counted from the left
    pub position: usize,
    /// Absorption rule triggered by the merge
    pub absorption: Absorption,
}

impl Merge {
    /// True when the merge proves `candidate` non-prime
    pub fn absorbs(&self, candidate: Key) -> bool {
        match self.absorption {
            Absorption::Operands => false,
            Absorption::Masked { mask } => {
                candidate != self.key && candidate.raw() & mask == self.key.raw() & mask
            }
        }
    }
}

fn lane_of(raw: u64, lane: usize) -> u64 {
    (raw >> (lane as u32 * LANE_BITS)) & LANE_MASK
}

fn full_mask(width: usize) -> u64 {
    if width as u32 * LANE_BITS >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << (width as u32 * LANE_BITS)) - 1
    }
}

/// Merge two keys differing in exactly one mergeable lane
///
/// Returns `None` when the keys differ in zero or several lanes, when any lane
/// of the union is the incompatible `0`/`2` combination, or when one key
/// already contains the other.
pub fn adjacent(a: Key, b: Key) -> Option<Merge> {
    let union = a.raw() | b.raw();
    let diff = a.raw() ^ b.raw();
    if diff == 0 || union == a.raw() || union == b.raw() {
        return None;
    }

    let width = a.width().max(b.width());
    let mut changed = None;
    let mut differences = 0;
    for lane in 0..width {
        if lane_of(union, lane) == INCOMPATIBLE_UNION {
            return None;
        }
        if lane_of(diff, lane) != 0 {
            differences += 1;
            changed = Some(lane);
        }
    }
    if differences != 1 {
        return None;
    }
    let lane = changed?;

    let absorption = if lane_of(union, lane) == Literal::Absent.code() {
        Absorption::Masked {
            mask: full_mask(width) & !(LANE_MASK << (lane as u32 * LANE_BITS)),
        }
    } else {
        Absorption::Operands
    };

    Some(Merge {
        key: Key::from_raw(union),
        position: width - 1 - lane,
        absorption,
    })
}

fn partially_adjacent_directed(a: Key, b: Key) -> bool {
    let width = a.width().max(b.width());
    let mut containing = 0;
    let mut adjacent = 0;
    for lane in 0..width {
        let x = lane_of(a.raw(), lane);
        let y = lane_of(b.raw(), lane);
        if x == y {
            continue;
        }
        if x & y == y && x | y == x {
            containing += 1;
        } else if x & y == 0 && x ^ y != INCOMPATIBLE_UNION {
            adjacent += 1;
        } else if x & y == Literal::Free.code()
            && x | y == Literal::Absent.code()
            && x ^ y == INCOMPATIBLE_UNION
        {
            adjacent += 1;
        } else {
            return false;
        }
    }
    containing >= 1 && adjacent == 1
}

/// True when two keys would merge once the aggregate side is expanded
///
/// Every lane must be equal, contain the other side's lane, or be a valid
/// single difference. At least one lane must be a containment and exactly
/// one a difference. The test is symmetric in its arguments.
pub fn partially_adjacent(a: Key, b: Key) -> bool {
    partially_adjacent_directed(a, b) || partially_adjacent_directed(b, a)
}
