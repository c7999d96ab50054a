//! Programs: the labels to minimize and the atoms they range over
//!
//! A program is read one item per line in one of two grammars, chosen by the
//! first line that matches either:
//!
//! - **valuations**: fixed-width strings over `{0, 1, 2, z, o, x}`, one
//!   position per atom;
//! - **rules**: `head :- body.` with `;` between head disjuncts, `,` between
//!   body conjuncts and stacked `not` prefixes.
//!
//! A directive line `/abc/` names single-character atoms and pins their
//! column order. Lines matching neither grammar are skipped.
//!
//! ```
//! use htmin::Program;
//!
//! let program: Program = "a :- b.\na :- not b.\n".parse().unwrap();
//! assert_eq!(program.len(), 2);
//! assert_eq!(program.labels(), vec!["z2", "z0"]);
//! ```

pub mod ast;
mod parser;

pub use ast::{DropReason, Occurrence, Role, RuleAst};
pub use parser::{parse_rule, RuleSyntaxError};

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::ProgramReadError;
use crate::label::{encode, Key, Label, LabelError, Literal, MAX_WIDTH};
use crate::rules::keys_to_rules;
use crate::signature::Signature;

/// Which grammar the lines of a program follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// One label per line
    Valuations,
    /// One rule per line
    Rules,
}

/// A rule the parser refused, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRule {
    /// Line number, starting at 1
    pub line: usize,
    /// The rule text
    pub text: Arc<str>,
    /// The atom whose occurrences cannot be reconciled
    pub atom: Arc<str>,
    /// Why the rule was dropped
    pub reason: DropReason,
}

/// Labels to minimize with their atom names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    grammar: Grammar,
    signature: Signature,
    keys: Vec<Key>,
    dropped: Vec<DroppedRule>,
}

fn is_valuation_line(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| "012ozx".contains(c))
}

fn directive_atoms(line: &str) -> Option<Vec<String>> {
    let inner = line.strip_prefix('/')?.strip_suffix('/')?;
    if inner.is_empty() || !inner.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    let mut atoms: Vec<String> = Vec::new();
    for c in inner.chars() {
        let atom = c.to_string();
        if !atoms.contains(&atom) {
            atoms.push(atom);
        }
    }
    Some(atoms)
}

impl Program {
    /// Build a program from label text with default atom names
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, LabelError> {
        let keys = labels
            .iter()
            .map(|label| encode(label.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_keys(keys, Signature::new())
    }

    /// Build a program from packed keys
    ///
    /// All keys must share one width; the signature is backfilled with
    /// default names up to that width.
    pub fn from_keys(keys: Vec<Key>, mut signature: Signature) -> Result<Self, LabelError> {
        if let Some(first) = keys.first() {
            let expected = first.width();
            if let Some(other) = keys.iter().find(|k| k.width() != expected) {
                return Err(LabelError::WidthMismatch {
                    expected,
                    actual: other.width(),
                    label: Arc::from(other.to_string().as_str()),
                });
            }
            signature.backfill_to(expected);
        }
        Ok(Program {
            grammar: Grammar::Valuations,
            signature,
            keys,
            dropped: Vec::new(),
        })
    }

    /// Read a program from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ProgramReadError> {
        let mut grammar = None;
        let mut explicit: Vec<String> = Vec::new();
        let mut valuations: Vec<(usize, Key)> = Vec::new();
        let mut rules: Vec<(usize, Arc<str>, RuleAst)> = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let number = index + 1;
            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            if let Some(atoms) = directive_atoms(line) {
                explicit = atoms;
                continue;
            }

            if is_valuation_line(line) && grammar != Some(Grammar::Rules) {
                grammar = Some(Grammar::Valuations);
                let key = encode(line)?;
                match valuations.first() {
                    Some((_, first)) if first.width() != key.width() => {
                        debug!(
                            "line {}: skipping '{}' of width {}, expected {}",
                            number,
                            line,
                            key.width(),
                            first.width()
                        );
                    }
                    _ => valuations.push((number, key)),
                }
            } else if line.ends_with('.') && grammar != Some(Grammar::Valuations) {
                match parse_rule(line) {
                    Ok(rule) => {
                        grammar = Some(Grammar::Rules);
                        rules.push((number, Arc::from(line), rule));
                    }
                    Err(e) => debug!("line {}: {}", number, e),
                }
            } else {
                debug!("line {}: ignoring '{}'", number, line);
            }
        }

        match grammar {
            Some(Grammar::Rules) => Self::from_rules(rules, explicit),
            _ => {
                let keys = valuations.into_iter().map(|(_, key)| key).collect();
                Ok(Self::from_keys(keys, Signature::from_atoms(&explicit))?)
            }
        }
    }

    fn from_rules(
        rules: Vec<(usize, Arc<str>, RuleAst)>,
        explicit: Vec<String>,
    ) -> Result<Self, ProgramReadError> {
        let mut dropped = Vec::new();
        let mut accepted: Vec<BTreeMap<Arc<str>, Literal>> = Vec::new();
        for (line, text, rule) in rules {
            match rule.literals() {
                Ok(literals) => accepted.push(literals),
                Err((atom, reason)) => {
                    warn!("line {}: dropping '{}': {} on atom {}", line, text, reason, atom);
                    dropped.push(DroppedRule {
                        line,
                        text,
                        atom,
                        reason,
                    });
                }
            }
        }

        let mut signature = Signature::from_atoms(&explicit);
        let mut atoms: Vec<&Arc<str>> = accepted.iter().flat_map(|rule| rule.keys()).collect();
        atoms.sort();
        for atom in atoms {
            signature.push(atom);
        }
        if signature.len() > MAX_WIDTH {
            return Err(LabelError::TooWide {
                width: signature.len(),
            }
            .into());
        }

        let mut keys = Vec::with_capacity(accepted.len());
        if !signature.is_empty() {
            for literals in &accepted {
                let label: Vec<Literal> = signature
                    .atoms()
                    .iter()
                    .map(|atom| literals.get(atom).copied().unwrap_or(Literal::Absent))
                    .collect();
                keys.push(Label::new(label).key()?);
            }
        }

        Ok(Program {
            grammar: Grammar::Rules,
            signature,
            keys,
            dropped,
        })
    }

    pub(crate) fn with_grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    /// Read a program from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProgramReadError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// The grammar the program was read in
    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// Atom names, one per label position
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The packed labels, in input order
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// The labels as text, in input order
    pub fn labels(&self) -> Vec<String> {
        self.keys.iter().map(|k| k.to_string()).collect()
    }

    /// Rules refused while reading
    pub fn dropped(&self) -> &[DroppedRule] {
        &self.dropped
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when there is nothing to minimize
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of positions per label
    pub fn width(&self) -> usize {
        self.signature.len()
    }

    /// Render the program as rules
    pub fn to_rules(&self) -> String {
        keys_to_rules(&self.keys, &self.signature)
    }
}

impl FromStr for Program {
    type Err = ProgramReadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_reader(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valuation_lines() {
        let program: Program = "020\n120\n\n001\n021\n".parse().unwrap();
        assert_eq!(program.grammar(), Grammar::Valuations);
        assert_eq!(program.labels(), vec!["020", "120", "001", "021"]);
        let names: Vec<&str> = program.signature().atoms().iter().map(|a| a.as_ref()).collect();
        assert_eq!(names, vec!["x0", "x1", "x2"]);
    }

    #[test]
    fn test_mismatched_widths_are_skipped() {
        let program: Program = "02\n0212\n12\n".parse().unwrap();
        assert_eq!(program.labels(), vec!["02", "12"]);
    }

    #[test]
    fn test_directive_names_valuation_columns() {
        let program: Program = "/pq/\nz2\n".parse().unwrap();
        assert_eq!(program.to_rules(), "p :- q.");
    }

    #[test]
    fn test_rule_lines_use_sorted_atoms() {
        let program: Program = "b :- a.\nc ; not b.\n".parse().unwrap();
        assert_eq!(program.grammar(), Grammar::Rules);
        assert_eq!(program.labels(), vec!["2zx", "xoz"]);
    }

    #[test]
    fn test_directive_pins_rule_order() {
        let program: Program = "/cb/\nb :- a.\nc ; not b.\n".parse().unwrap();
        let names: Vec<&str> = program.signature().atoms().iter().map(|a| a.as_ref()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);
        assert_eq!(program.labels(), vec!["xz2", "zox"]);
    }

    #[test]
    fn test_first_grammar_wins() {
        let program: Program = "a :- b.\n02\nb.\n".parse().unwrap();
        assert_eq!(program.grammar(), Grammar::Rules);
        assert_eq!(program.len(), 2);

        let program: Program = "02\na :- b.\n12\n".parse().unwrap();
        assert_eq!(program.grammar(), Grammar::Valuations);
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn test_unfalsifiable_rules_are_dropped() {
        let program: Program = "a :- b, not b.\na :- a.\na :- b.\n".parse().unwrap();
        assert_eq!(program.labels(), vec!["z2"]);
        assert_eq!(program.dropped().len(), 2);
        assert_eq!(program.dropped()[0].line, 1);
        assert_eq!(program.dropped()[0].reason, DropReason::ContradictoryBody);
        assert_eq!(program.dropped()[1].reason, DropReason::Tautology);
    }

    #[test]
    fn test_comments_and_noise_are_ignored() {
        let program: Program = "% header\nthis is noise\n:- a, not b.\n".parse().unwrap();
        assert_eq!(program.labels(), vec!["20"]);
    }

    #[test]
    fn test_empty_input() {
        let program: Program = "\n% nothing\n".parse().unwrap();
        assert!(program.is_empty());
        assert_eq!(program.width(), 0);
    }

    #[test]
    fn test_from_keys_rejects_mixed_widths() {
        let keys = vec![encode("02").unwrap(), encode("021").unwrap()];
        assert!(matches!(
            Program::from_keys(keys, Signature::new()),
            Err(LabelError::WidthMismatch {
                expected: 2,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_rules_round_trip() {
        let text = "a ; not a :- b.\n:- b, not a.\nb.";
        let program: Program = text.parse().unwrap();
        assert_eq!(program.to_rules(), text);
    }
}
