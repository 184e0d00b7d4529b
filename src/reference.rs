use std::fmt::{Display, Formatter};
use std::ops::Neg;

use crate::types::NodeId;

/// An edge into the diagram: a node identity plus a complement bit.
///
/// Uses a 32-bit representation where the least significant bit indicates negation
/// and the remaining bits store the node ID.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Ref(u32);

impl Ref {
    /// Sentinel for a reference that was never pointed at a node.
    pub const INVALID: Self = Self(0xFFFF_FFFF);

    pub const fn new(id: NodeId, negated: bool) -> Self {
        Self((id.raw() << 1) | (negated as u32))
    }

    pub const fn positive(id: NodeId) -> Self {
        Self::new(id, false)
    }

    pub const fn negative(id: NodeId) -> Self {
        Self::new(id, true)
    }

    /// Returns the node ID this reference points to.
    #[inline]
    pub const fn id(self) -> NodeId {
        NodeId::new(self.0 >> 1)
    }

    #[inline]
    pub const fn is_negated(self) -> bool {
        (self.0 & 1) != 0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }

    /// Strips the complement bit, yielding the canonical handle of the node.
    #[inline]
    pub const fn regular(self) -> Self {
        Self(self.0 & !1)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Default for Ref {
    fn default() -> Self {
        Self::INVALID
    }
}

impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            write!(f, "<invalid>")
        } else if self.is_negated() {
            write!(f, "~{}", self.id())
        } else {
            write!(f, "{}", self.id())
        }
    }
}
