//! Closure expansion of aggregate keys
//!
//! [`countermodels`] splits every lane into the single truth values it
//! contains, producing the concrete valuations a pattern stands for.
//! [`totalize`] only splits positive-body lanes into their two polarities.
//! Both are lazy cartesian products over per-lane substitution sets.

use std::collections::BTreeSet;

use super::key::Key;
use super::literal::{Literal, LANE_BITS};

#[derive(Debug, Clone)]
struct Choice {
    shift: u32,
    options: Vec<u64>,
}

/// Lazy iterator over the keys obtained by substituting lanes of a key
///
/// Lanes are enumerated with the rightmost lane varying fastest.
#[derive(Debug, Clone)]
pub struct Expansion {
    fixed: u64,
    choices: Vec<Choice>,
    cursor: Vec<usize>,
    exhausted: bool,
}

impl Expansion {
    fn new(key: Key, substitute: impl Fn(u64) -> Option<Vec<u64>>) -> Self {
        let width = key.width();
        let mut fixed = 0u64;
        let mut choices = Vec::new();
        for lane in (0..width).rev() {
            let shift = lane as u32 * LANE_BITS;
            let code = key.lane(lane);
            match substitute(code) {
                Some(options) => choices.push(Choice { shift, options }),
                None => fixed |= code << shift,
            }
        }
        let cursor = vec![0; choices.len()];
        Expansion {
            fixed,
            choices,
            cursor,
            exhausted: false,
        }
    }

    /// Total number of keys this expansion yields from the start
    pub fn total(&self) -> usize {
        self.choices.iter().map(|c| c.options.len()).product()
    }
}

impl Iterator for Expansion {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        if self.exhausted {
            return None;
        }
        let raw = self
            .choices
            .iter()
            .zip(&self.cursor)
            .fold(self.fixed, |acc, (choice, &i)| {
                acc | (choice.options[i] << choice.shift)
            });

        let mut lane = self.choices.len();
        loop {
            if lane == 0 {
                self.exhausted = true;
                break;
            }
            lane -= 1;
            self.cursor[lane] += 1;
            if self.cursor[lane] < self.choices[lane].options.len() {
                break;
            }
            self.cursor[lane] = 0;
        }

        Some(Key::from_raw(raw))
    }
}

/// Concrete valuations represented by a key
pub fn countermodels(key: Key) -> Expansion {
    Expansion::new(key, |code| {
        if code.count_ones() > 1 {
            Some(
                (0..LANE_BITS)
                    .map(|bit| 1u64 << bit)
                    .filter(|bit| code & bit != 0)
                    .collect(),
            )
        } else {
            None
        }
    })
}

/// Keys obtained by splitting every positive-body lane into both polarities
pub fn totalize(key: Key) -> Expansion {
    Expansion::new(key, |code| {
        (code == Literal::PositiveBody.code())
            .then(|| vec![Literal::Free.code(), Literal::PositiveBody.code()])
    })
}

/// A concrete valuation closed under totalization
pub fn total_covers(valuation: Key) -> BTreeSet<Key> {
    totalize(valuation).collect()
}

/// The totalized countermodel set of a key
pub fn total_countermodels(key: Key) -> BTreeSet<Key> {
    countermodels(key).flat_map(totalize).collect()
}
