//! Checks that a minimized rule set can replace the original
//!
//! Two rule sets are strongly equivalent in Here-and-There logic exactly when
//! they have the same countermodels closed under totalization. Subsumption is
//! a weaker sanity check: every minimized rule should generalize some rule
//! of the original set. A rule that generalizes none still passes with a
//! warning when it is no longer than an original rule it overlaps and the
//! program did not grow.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::label::{total_countermodels, Key};

/// The totalized countermodels of a set of keys
pub fn countermodel_closure(keys: &[Key]) -> BTreeSet<Key> {
    keys.iter().flat_map(|&key| total_countermodels(key)).collect()
}

/// True when the two key sets are strongly equivalent
pub fn strongly_equivalent(a: &[Key], b: &[Key]) -> bool {
    countermodel_closure(a) == countermodel_closure(b)
}

/// Verdict of the subsumption check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsumptionOutcome {
    /// Every minimized key subsumes an original key
    Ok,
    /// Some keys subsume nothing, but each is syntactically simpler than an
    /// original key and the rule count did not grow
    Warning,
    Error,
}

impl fmt::Display for SubsumptionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubsumptionOutcome::Ok => write!(f, "OK"),
            SubsumptionOutcome::Warning => write!(f, "WARNING"),
            SubsumptionOutcome::Error => write!(f, "ERROR"),
        }
    }
}

/// Outcome of the subsumption check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubsumptionReport {
    /// Minimized keys that subsume no original key
    pub unsupported: Vec<Key>,
    /// Original keys subsumed by no minimized key
    pub uncovered: Vec<Key>,
    /// Unsupported keys overlapping an original key with at least as many
    /// literals
    pub simpler: Vec<Key>,
    /// True when the minimized set has more keys than the original
    pub grew: bool,
}

impl SubsumptionReport {
    /// True when every minimized key generalizes an original one
    pub fn is_ok(&self) -> bool {
        self.unsupported.is_empty()
    }

    pub fn outcome(&self) -> SubsumptionOutcome {
        if self.is_ok() {
            SubsumptionOutcome::Ok
        } else if !self.grew && self.simpler.len() == self.unsupported.len() {
            SubsumptionOutcome::Warning
        } else {
            SubsumptionOutcome::Error
        }
    }
}

// some valuation falsifies both keys
fn overlaps(a: Key, b: Key) -> bool {
    a.width() == b.width()
        && a.literals()
            .zip(b.literals())
            .all(|(x, y)| x.code() & y.code() != 0)
}

/// Relate each minimized key to the original keys it generalizes
pub fn subsumption(original: &[Key], minimized: &[Key]) -> SubsumptionReport {
    let unsupported: Vec<Key> = minimized
        .iter()
        .copied()
        .filter(|&m| !original.iter().any(|&o| m.subsumes(o)))
        .collect();
    let uncovered = original
        .iter()
        .copied()
        .filter(|&o| !minimized.iter().any(|&m| m.subsumes(o)))
        .collect();
    let simpler = unsupported
        .iter()
        .copied()
        .filter(|&m| {
            original
                .iter()
                .any(|&o| overlaps(m, o) && m.literal_count() <= o.literal_count())
        })
        .collect();
    SubsumptionReport {
        unsupported,
        uncovered,
        simpler,
        grew: minimized.len() > original.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::encode;

    fn keys(labels: &[&str]) -> Vec<Key> {
        labels.iter().map(|l| encode(l).unwrap()).collect()
    }

    #[test]
    fn test_merged_rule_is_equivalent() {
        assert!(strongly_equivalent(&keys(&["02", "12"]), &keys(&["z2"])));
        assert!(strongly_equivalent(&keys(&["z2", "o2"]), &keys(&["x2"])));
        assert!(!strongly_equivalent(&keys(&["02"]), &keys(&["z2"])));
    }

    #[test]
    fn test_totalization_makes_body_atoms_equivalent() {
        // a :- b already excludes here-false there-true b
        assert!(strongly_equivalent(&keys(&["z2", "01"]), &keys(&["z2"])));
        assert_eq!(countermodel_closure(&keys(&["z2"])).len(), 4);
    }

    #[test]
    fn test_subsumption() {
        let report = subsumption(&keys(&["02", "12"]), &keys(&["z2"]));
        assert!(report.is_ok());
        assert!(report.uncovered.is_empty());

        let report = subsumption(&keys(&["02", "12"]), &keys(&["z2", "0z"]));
        assert_eq!(report.unsupported, keys(&["0z"]));
        assert!(!report.is_ok());
        assert_eq!(report.outcome(), SubsumptionOutcome::Error);

        let report = subsumption(&keys(&["02", "11"]), &keys(&["z2"]));
        assert_eq!(report.uncovered, keys(&["11"]));
    }

    #[test]
    fn test_equal_size_simpler_rule_is_a_warning() {
        // z2 does not subsume 0o, but both falsify under 02 and z2 is no longer
        let report = subsumption(&keys(&["0o"]), &keys(&["z2"]));
        assert_eq!(report.unsupported, keys(&["z2"]));
        assert_eq!(report.simpler, keys(&["z2"]));
        assert_eq!(report.outcome(), SubsumptionOutcome::Warning);
        assert_eq!(report.outcome().to_string(), "WARNING");

        // same rule, but the program grew
        let report = subsumption(&keys(&["0o"]), &keys(&["z2", "0o"]));
        assert_eq!(report.simpler, keys(&["z2"]));
        assert_eq!(report.outcome(), SubsumptionOutcome::Error);

        // 2x has one literal, 0o two, but they share no countermodel
        let report = subsumption(&keys(&["0o"]), &keys(&["2x"]));
        assert!(report.simpler.is_empty());
        assert_eq!(report.outcome(), SubsumptionOutcome::Error);

        assert_eq!(
            subsumption(&keys(&["02", "12"]), &keys(&["z2"])).outcome(),
            SubsumptionOutcome::Ok
        );
    }
}
