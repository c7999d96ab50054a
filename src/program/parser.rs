//! Parsing support for rule lines

use std::fmt;
use std::sync::Arc;

use super::ast::RuleAst;

// Lalrpop-generated parser module (generated in OUT_DIR at build time)
#[allow(clippy::all)]
mod parser_impl {
    #![allow(clippy::all)]
    #![allow(dead_code)]
    #![allow(unused_variables)]
    #![allow(unused_imports)]
    #![allow(non_snake_case)]
    #![allow(non_camel_case_types)]
    #![allow(non_upper_case_globals)]
    include!(concat!(env!("OUT_DIR"), "/program/rule.rs"));
}

/// A rule line the grammar rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSyntaxError {
    /// Message produced by the parser
    pub message: Arc<str>,
    /// The rejected line
    pub input: Arc<str>,
}

impl fmt::Display for RuleSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse rule: {}. Input: {:?}", self.message, self.input)
    }
}

impl std::error::Error for RuleSyntaxError {}

/// Parse one `head :- body.` line
pub fn parse_rule(input: &str) -> Result<RuleAst, RuleSyntaxError> {
    parser_impl::RuleParser::new()
        .parse(input)
        .map_err(|e| RuleSyntaxError {
            message: Arc::from(e.to_string().as_str()),
            input: Arc::from(input),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::ast::Occurrence;

    fn side(occurrences: &[Occurrence]) -> Vec<(usize, &str)> {
        occurrences
            .iter()
            .map(|o| (o.negations, o.atom.as_ref()))
            .collect()
    }

    fn atoms(rule: &RuleAst) -> (Vec<(usize, &str)>, Vec<(usize, &str)>) {
        (side(&rule.head), side(&rule.body))
    }

    #[test]
    fn test_parse_full_rule() {
        let rule = parse_rule("a ; not b :- c, not not d.").unwrap();
        let (head, body) = atoms(&rule);
        assert_eq!(head, vec![(0, "a"), (1, "b")]);
        assert_eq!(body, vec![(0, "c"), (2, "d")]);
    }

    #[test]
    fn test_parse_fact_and_constraint() {
        let fact = parse_rule("p.").unwrap();
        assert_eq!(atoms(&fact), (vec![(0, "p")], vec![]));

        let constraint = parse_rule(":- p, not q.").unwrap();
        assert_eq!(atoms(&constraint), (vec![], vec![(0, "p"), (1, "q")]));

        let empty = parse_rule(":- .").unwrap();
        assert_eq!(empty, RuleAst::default());
    }

    #[test]
    fn test_atoms_may_start_with_not() {
        let rule = parse_rule("nothing :- notable.").unwrap();
        assert_eq!(atoms(&rule), (vec![(0, "nothing")], vec![(0, "notable")]));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(parse_rule("a :- b").is_err());
        assert!(parse_rule("a ;; b.").is_err());
        let err = parse_rule("a :- (b).").unwrap_err();
        assert!(err.to_string().contains("Failed to parse rule"));
    }
}
