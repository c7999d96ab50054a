//! The implicant table shared by the fixpoint stages
//!
//! Every implicant is keyed by its packed [`Key`] and appears at most once.
//! Coverage only ever grows: inserting an existing key unions the coverage
//! sets, and marking an implicant hands its coverage to the absorbing one.
//! Marks are never cleared.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::error::MinimizationError;
use crate::label::{countermodels, total_covers, Key, LabelError};

/// One generalized literal pattern and the valuations it subsumes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Implicant {
    marked: bool,
    covers: BTreeSet<Key>,
    totalcovers: BTreeSet<Key>,
    is_essential: bool,
}

impl Implicant {
    fn with_covers(covers: BTreeSet<Key>) -> Self {
        let totalcovers = covers.iter().flat_map(|&c| total_covers(c)).collect();
        Implicant {
            marked: false,
            covers,
            totalcovers,
            is_essential: false,
        }
    }

    /// True once the implicant has been proven non-prime
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Valuations directly subsumed
    pub fn covers(&self) -> &BTreeSet<Key> {
        &self.covers
    }

    /// `covers` closed under totalization
    pub fn totalcovers(&self) -> &BTreeSet<Key> {
        &self.totalcovers
    }

    /// True once selected as the unique cover of some valuation
    pub fn is_essential(&self) -> bool {
        self.is_essential
    }
}

/// All implicants of one minimization run, plus the original valuations
#[derive(Debug, Clone)]
pub struct ImplicantTable {
    width: usize,
    entries: BTreeMap<Key, Implicant>,
    valuations: BTreeSet<Key>,
    has_aggregates: bool,
}

impl ImplicantTable {
    /// Build the table from the keys of a parsed program
    ///
    /// Keys carrying aggregate literals cover their countermodels; concrete
    /// keys cover themselves. The union of all covers is the set of original
    /// valuations. Every key must have the width of the first one.
    pub fn from_keys(keys: &[Key]) -> Result<Self, MinimizationError> {
        let width = match keys.first() {
            Some(key) => key.width(),
            None => return Err(MinimizationError::EmptyProgram),
        };
        if let Some(other) = keys.iter().find(|k| k.width() != width) {
            return Err(LabelError::WidthMismatch {
                expected: width,
                actual: other.width(),
                label: Arc::from(other.to_string().as_str()),
            }
            .into());
        }

        let mut table = ImplicantTable {
            width,
            entries: BTreeMap::new(),
            valuations: BTreeSet::new(),
            has_aggregates: false,
        };

        for &key in keys {
            let covers: BTreeSet<Key> = if key.aggregate_weight() > 0 {
                table.has_aggregates = true;
                countermodels(key).collect()
            } else {
                BTreeSet::from([key])
            };
            table.valuations.extend(covers.iter().copied());
            table.union_into(key, Implicant::with_covers(covers));
        }

        Ok(table)
    }

    /// Number of positions of every key in the table
    pub fn width(&self) -> usize {
        self.width
    }

    /// True when some input key carried aggregate literals
    pub fn has_aggregates(&self) -> bool {
        self.has_aggregates
    }

    /// The original valuations every solution must cover
    pub fn valuations(&self) -> &BTreeSet<Key> {
        &self.valuations
    }

    /// Number of implicants, marked ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no implicant
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an implicant
    pub fn get(&self, key: Key) -> Option<&Implicant> {
        self.entries.get(&key)
    }

    /// True when the key is present, marked or not
    pub fn contains(&self, key: Key) -> bool {
        self.entries.contains_key(&key)
    }

    /// Iterate over every implicant in key order
    pub fn iter(&self) -> impl Iterator<Item = (Key, &Implicant)> {
        self.entries.iter().map(|(&k, v)| (k, v))
    }

    /// Keys not yet proven non-prime, in key order
    pub fn unmarked_keys(&self) -> Vec<Key> {
        self.iter()
            .filter(|(_, implicant)| !implicant.marked)
            .map(|(key, _)| key)
            .collect()
    }

    /// The prime implicants: every unmarked key
    pub fn primes(&self) -> Vec<Key> {
        self.unmarked_keys()
    }

    /// Insert a concrete valuation discovered by expansion
    ///
    /// Returns false when the key was already present.
    pub(crate) fn insert_valuation(&mut self, key: Key) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries
            .insert(key, Implicant::with_covers(BTreeSet::from([key])));
        true
    }

    /// Insert an implicant, or union its coverage into the existing one
    ///
    /// Returns true when the table changed.
    pub(crate) fn union_into(&mut self, key: Key, implicant: Implicant) -> bool {
        match self.entries.get_mut(&key) {
            Some(existing) => {
                let before = (existing.covers.len(), existing.totalcovers.len());
                existing.covers.extend(implicant.covers);
                existing.totalcovers.extend(implicant.totalcovers);
                before != (existing.covers.len(), existing.totalcovers.len())
            }
            None => {
                self.entries.insert(key, implicant);
                true
            }
        }
    }

    /// Coverage of two implicants combined, for a merge result
    pub(crate) fn merged_coverage(&self, a: Key, b: Key) -> Implicant {
        let mut merged = Implicant::default();
        for key in [a, b] {
            if let Some(implicant) = self.entries.get(&key) {
                merged.covers.extend(implicant.covers.iter().copied());
                merged.totalcovers.extend(implicant.totalcovers.iter().copied());
            }
        }
        merged
    }

    /// Copy the coverage of `source` into `target`
    ///
    /// Returns true when the coverage of `target` grew.
    pub(crate) fn propagate(&mut self, target: Key, source: Key) -> bool {
        if target == source {
            return false;
        }
        let coverage = match self.entries.get(&source) {
            Some(implicant) => Implicant {
                covers: implicant.covers.clone(),
                totalcovers: implicant.totalcovers.clone(),
                ..Implicant::default()
            },
            None => return false,
        };
        match self.entries.get(&target) {
            Some(_) => self.union_into(target, coverage),
            None => false,
        }
    }

    /// Mark `absorbed` non-prime after handing its coverage to `absorber`
    ///
    /// Returns `(mark_changed, absorber_grew)`.
    pub(crate) fn absorb(&mut self, absorber: Key, absorbed: Key) -> (bool, bool) {
        let grew = self.propagate(absorber, absorbed);
        (self.mark(absorbed), grew)
    }

    /// Mark a key non-prime, returning true when the flag changed
    pub(crate) fn mark(&mut self, key: Key) -> bool {
        match self.entries.get_mut(&key) {
            Some(implicant) if !implicant.marked => {
                implicant.marked = true;
                true
            }
            _ => false,
        }
    }

    /// Flag a prime as essential
    pub(crate) fn set_essential(&mut self, key: Key) -> bool {
        match self.entries.get_mut(&key) {
            Some(implicant) if !implicant.is_essential => {
                implicant.is_essential = true;
                true
            }
            _ => false,
        }
    }

    /// Original valuations without any unmarked implicant covering them
    pub fn uncovered_valuations(&self) -> Vec<Key> {
        let mut remaining = self.valuations.clone();
        for implicant in self.entries.values().filter(|i| !i.marked) {
            for covered in &implicant.totalcovers {
                remaining.remove(covered);
            }
        }
        remaining.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::encode;

    fn key(label: &str) -> Key {
        encode(label).unwrap()
    }

    #[test]
    fn test_empty_program_is_rejected() {
        assert!(matches!(
            ImplicantTable::from_keys(&[]),
            Err(MinimizationError::EmptyProgram)
        ));
    }

    #[test]
    fn test_aggregate_inputs_cover_their_countermodels() {
        let table = ImplicantTable::from_keys(&[key("z2"), key("01")]).unwrap();
        assert!(table.has_aggregates());
        assert_eq!(table.len(), 2);

        let valuations: Vec<String> = table.valuations().iter().map(|k| k.to_string()).collect();
        assert_eq!(valuations, vec!["01", "02", "12"]);

        let z2 = table.get(key("z2")).unwrap();
        assert_eq!(z2.covers().len(), 2);
        // 02 and 12 each totalize into two valuations
        assert_eq!(z2.totalcovers().len(), 4);
    }

    #[test]
    fn test_duplicate_keys_union_coverage() {
        let mut table = ImplicantTable::from_keys(&[key("02"), key("02")]).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.union_into(key("02"), Implicant::with_covers(BTreeSet::from([key("02")]))));
        assert!(table.union_into(key("02"), Implicant::with_covers(BTreeSet::from([key("12")]))));
        assert_eq!(table.get(key("02")).unwrap().covers().len(), 2);
    }

    #[test]
    fn test_absorb_propagates_before_marking() {
        let mut table = ImplicantTable::from_keys(&[key("02"), key("12")]).unwrap();
        let merged = table.merged_coverage(key("02"), key("12"));
        assert!(table.union_into(key("z2"), merged));
        let (marked, grew) = table.absorb(key("z2"), key("02"));
        assert!(marked);
        assert!(!grew);
        assert!(table.get(key("02")).unwrap().is_marked());
        assert_eq!(table.primes(), vec![key("12"), key("z2")]);
    }

    #[test]
    fn test_mixed_widths_are_rejected() {
        let err = ImplicantTable::from_keys(&[key("02"), key("120")]).unwrap_err();
        assert_eq!(
            err,
            MinimizationError::Label(LabelError::WidthMismatch {
                expected: 2,
                actual: 3,
                label: Arc::from("120"),
            })
        );
    }

    #[test]
    fn test_uncovered_valuations() {
        let mut table = ImplicantTable::from_keys(&[key("02"), key("12")]).unwrap();
        assert!(table.uncovered_valuations().is_empty());
        table.mark(key("12"));
        assert_eq!(table.uncovered_valuations(), vec![key("12")]);
    }
}
