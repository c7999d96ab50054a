//! Turning keys back into rules
//!
//! Each position of a key is one atom of the [`Signature`]. Head literals
//! form a disjunctive head and body literals a conjunctive body:
//!
//! | literal | renders as            |
//! |---------|-----------------------|
//! | `z`     | `a` in the head       |
//! | `o`     | `not a` in the head   |
//! | `1`     | `a ; not a` in the head |
//! | `2`     | `a` in the body       |
//! | `0`     | `not a` in the body   |
//! | `x`     | nothing               |
//!
//! The output is accepted by the rule grammar of [`Program`](crate::Program),
//! so minimizing rendered rules again is possible.

use std::fmt;
use std::sync::Arc;

use crate::label::{Key, Literal};
use crate::signature::Signature;

/// A rule with a disjunctive head and a conjunctive body
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rule {
    positive_head: Vec<Arc<str>>,
    negative_head: Vec<Arc<str>>,
    positive_body: Vec<Arc<str>>,
    negative_body: Vec<Arc<str>>,
}

impl Rule {
    /// Decode a key against a signature
    ///
    /// Positions beyond the signature are named `x{position}`.
    pub fn from_key(key: Key, signature: &Signature) -> Self {
        let mut rule = Rule::default();
        for (position, literal) in key.literals().enumerate() {
            let atom = signature
                .get(position)
                .cloned()
                .unwrap_or_else(|| Arc::from(format!("x{}", position).as_str()));
            match literal {
                Literal::PositiveHead => rule.positive_head.push(atom),
                Literal::NegativeHead => rule.negative_head.push(atom),
                Literal::Free => {
                    rule.positive_head.push(Arc::clone(&atom));
                    rule.negative_head.push(atom);
                }
                Literal::PositiveBody => rule.positive_body.push(atom),
                Literal::NegativeBody => rule.negative_body.push(atom),
                Literal::Absent => {}
            }
        }
        rule
    }

    /// Atoms occurring positively in the head
    pub fn positive_head(&self) -> &[Arc<str>] {
        &self.positive_head
    }

    /// Atoms occurring negated in the head
    pub fn negative_head(&self) -> &[Arc<str>] {
        &self.negative_head
    }

    /// Atoms occurring positively in the body
    pub fn positive_body(&self) -> &[Arc<str>] {
        &self.positive_body
    }

    /// Atoms occurring negated in the body
    pub fn negative_body(&self) -> &[Arc<str>] {
        &self.negative_body
    }

    /// True when the head is empty
    pub fn is_constraint(&self) -> bool {
        self.positive_head.is_empty() && self.negative_head.is_empty()
    }

    /// True when the body is empty
    pub fn is_fact(&self) -> bool {
        self.positive_body.is_empty() && self.negative_body.is_empty()
    }

    /// Number of literals in the rule
    pub fn literal_count(&self) -> usize {
        self.positive_head.len()
            + self.negative_head.len()
            + self.positive_body.len()
            + self.negative_body.len()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: Vec<String> = self
            .positive_head
            .iter()
            .map(|a| a.to_string())
            .chain(self.negative_head.iter().map(|a| format!("not {}", a)))
            .collect();
        let body: Vec<String> = self
            .positive_body
            .iter()
            .map(|a| a.to_string())
            .chain(self.negative_body.iter().map(|a| format!("not {}", a)))
            .collect();

        write!(f, "{}", head.join(" ; "))?;
        if !body.is_empty() || head.is_empty() {
            if !head.is_empty() {
                write!(f, " ")?;
            }
            write!(f, ":- {}", body.join(", "))?;
        }
        write!(f, ".")
    }
}

/// Decode one key into a rule
pub fn key_to_rule(key: Key, signature: &Signature) -> Rule {
    Rule::from_key(key, signature)
}

/// Render keys as rule text, one rule per line
pub fn keys_to_rules(keys: &[Key], signature: &Signature) -> String {
    keys.iter()
        .map(|&key| key_to_rule(key, signature).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
