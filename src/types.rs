//! Type-safe wrappers for diagram variables and node identities.
//!
//! The manager numbers variables from 1 (0 is reserved for the terminal node),
//! while the variable table, cubes and reports use the 0-based variable index.
//! [`Var`] keeps both views behind one type so the two are never mixed up.
use std::fmt;

/// A diagram variable (1-indexed).
///
/// # Invariants
///
/// - Variable IDs must be >= 1 (0 is reserved for the terminal)
/// - Variable `i` is the `i - 1`-th primary input handed to the builder
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// The pseudo-variable stored in the terminal node.
    pub(crate) const TERMINAL: Self = Self(0);

    /// Creates a new variable with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    /// Creates the variable for the given 0-based variable index.
    pub fn from_index(index: usize) -> Self {
        Var::new(index as u32 + 1)
    }

    /// Returns the raw variable ID as a `u32`.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Returns the 0-based variable index.
    pub fn index(self) -> usize {
        assert_ne!(self.0, 0, "Terminal has no variable index");
        (self.0 - 1) as usize
    }

    pub fn is_terminal(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

/// Identity of a node in the manager's arena.
///
/// Two references denote the same node iff their `NodeId`s are equal,
/// regardless of edge complementation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Largest representable id (31 bits, the top bit of a `Ref` is taken by the shift).
    pub const MAX: u32 = 0x7FFF_FFFE;

    pub const fn new(id: u32) -> Self {
        assert!(id <= Self::MAX, "Node ID out of range");
        Self(id)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_creation() {
        let v1 = Var::new(1);
        let v2 = Var::new(2);
        assert_eq!(v1.id(), 1);
        assert_eq!(v2.id(), 2);
        assert!(v1 < v2);
    }

    #[test]
    #[should_panic(expected = "Variable IDs must be >= 1")]
    fn test_var_zero_panics() {
        Var::new(0);
    }

    #[test]
    fn test_var_index_roundtrip() {
        let v = Var::from_index(0);
        assert_eq!(v.id(), 1);
        assert_eq!(v.index(), 0);
        assert_eq!(Var::from_index(7).index(), 7);
        assert!(Var::TERMINAL.is_terminal());
        assert!(!v.is_terminal());
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(42).to_string(), "@42");
    }
}
