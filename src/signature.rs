//! Atom names of a program, one per label position

use std::collections::HashMap;
use std::sync::Arc;

/// Ordered atom names with fast name to position lookup
///
/// Positions without an explicit name get `x{position}`; if that name is
/// taken the next free index is used instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    atoms: Vec<Arc<str>>,
    positions: HashMap<Arc<str>, usize>,
}

impl Signature {
    /// Create an empty signature
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from names in position order, later duplicates ignored
    pub fn from_atoms<I, S>(atoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut signature = Self::new();
        for atom in atoms {
            signature.push(atom.as_ref());
        }
        signature
    }

    /// Signature of `width` default names `x0`, `x1`, ...
    pub fn with_width(width: usize) -> Self {
        let mut signature = Self::new();
        signature.backfill_to(width);
        signature
    }

    /// Number of atoms
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// True when there are no atoms
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Atom at a position
    pub fn get(&self, position: usize) -> Option<&Arc<str>> {
        self.atoms.get(position)
    }

    /// All atoms in position order
    pub fn atoms(&self) -> &[Arc<str>] {
        &self.atoms
    }

    /// Position of a named atom
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// True when the atom is named
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Append an atom unless already present, returning its position
    pub fn push(&mut self, name: &str) -> usize {
        if let Some(position) = self.position(name) {
            return position;
        }
        let atom: Arc<str> = Arc::from(name);
        let position = self.atoms.len();
        self.positions.insert(Arc::clone(&atom), position);
        self.atoms.push(atom);
        position
    }

    fn next_available_index(&self, start: usize) -> usize {
        (start..)
            .find(|n| !self.positions.contains_key(format!("x{}", n).as_str()))
            .unwrap_or(start)
    }

    /// Add default names until the signature has `width` atoms
    pub fn backfill_to(&mut self, width: usize) {
        while self.atoms.len() < width {
            let index = self.next_available_index(self.atoms.len());
            self.push(&format!("x{}", index));
        }
    }
}
