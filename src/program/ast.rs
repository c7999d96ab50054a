//! Parsed rule syntax before it is mapped onto label positions

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::label::{Literal, LANE_MASK};

/// Role an atom occurrence plays after resolving stacked negations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// `a` in the head
    PositiveHead,
    /// `not a` in the head
    NegativeHead,
    /// `a` in the body
    PositiveBody,
    /// `not a` in the body
    NegativeBody,
}

impl Role {
    /// The literal whose falsifying values are those of this role
    pub fn literal(self) -> Literal {
        match self {
            Role::PositiveHead => Literal::PositiveHead,
            Role::NegativeHead => Literal::NegativeHead,
            Role::PositiveBody => Literal::PositiveBody,
            Role::NegativeBody => Literal::NegativeBody,
        }
    }
}

/// One atom occurrence with its count of `not` prefixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Number of stacked `not` tokens
    pub negations: usize,
    /// Atom name
    pub atom: Arc<str>,
}

impl Occurrence {
    /// Create an occurrence
    pub fn new(negations: usize, atom: Arc<str>) -> Self {
        Occurrence { negations, atom }
    }

    /// Role of the occurrence in a head
    ///
    /// `not not a` in a head is falsified exactly when `a` is false, like a
    /// negative body literal; a third `not` flips it back to a negative head.
    pub fn head_role(&self) -> Role {
        match self.negations {
            0 => Role::PositiveHead,
            1 => Role::NegativeHead,
            n if n % 2 == 0 => Role::NegativeBody,
            _ => Role::NegativeHead,
        }
    }

    /// Role of the occurrence in a body
    pub fn body_role(&self) -> Role {
        match self.negations {
            0 => Role::PositiveBody,
            1 => Role::NegativeBody,
            n if n % 2 == 0 => Role::NegativeHead,
            _ => Role::NegativeBody,
        }
    }
}

/// Why a parsed rule cannot become a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The body requires an atom to be both true and false
    ContradictoryBody,
    /// A head literal repeats a body literal, so the rule always holds
    Tautology,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::ContradictoryBody => write!(f, "body is contradictory"),
            DropReason::Tautology => write!(f, "rule is a tautology"),
        }
    }
}

/// A parsed `head :- body.` rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleAst {
    /// Head disjuncts
    pub head: Vec<Occurrence>,
    /// Body conjuncts
    pub body: Vec<Occurrence>,
}

impl RuleAst {
    /// Create a rule
    pub fn new(head: Vec<Occurrence>, body: Vec<Occurrence>) -> Self {
        RuleAst { head, body }
    }

    /// Every atom with the roles it occurs in
    pub fn roles(&self) -> BTreeMap<Arc<str>, Vec<Role>> {
        let mut roles: BTreeMap<Arc<str>, Vec<Role>> = BTreeMap::new();
        let occurrences = self
            .head
            .iter()
            .map(|o| (o, o.head_role()))
            .chain(self.body.iter().map(|o| (o, o.body_role())));
        for (occurrence, role) in occurrences {
            let entry = roles.entry(Arc::clone(&occurrence.atom)).or_default();
            if !entry.contains(&role) {
                entry.push(role);
            }
        }
        roles
    }

    /// The literal of every atom in the rule
    ///
    /// A rule is falsified when its body holds and its head fails, so the
    /// falsifying values of an atom are the intersection over all its
    /// occurrences. An empty intersection means no valuation falsifies the
    /// rule and it is reported as dropped, naming the offending atom.
    pub fn literals(&self) -> Result<BTreeMap<Arc<str>, Literal>, (Arc<str>, DropReason)> {
        let mut literals = BTreeMap::new();
        for (atom, roles) in self.roles() {
            let code = roles
                .iter()
                .fold(LANE_MASK, |code, role| code & role.literal().code());
            match Literal::from_code(code) {
                Some(literal) => {
                    literals.insert(atom, literal);
                }
                None => {
                    let reason = if roles.contains(&Role::PositiveBody)
                        && roles.contains(&Role::NegativeBody)
                    {
                        DropReason::ContradictoryBody
                    } else {
                        DropReason::Tautology
                    };
                    return Err((atom, reason));
                }
            }
        }
        Ok(literals)
    }
}
