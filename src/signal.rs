use std::fmt::{Debug, Display, Formatter};
use std::ops::Not;

/// A possibly complemented edge in a [`Network`][crate::network::Network]:
/// the constant, a primary input, or the output of an AND gate.
///
/// Encoding: bit 0 is the complement flag, bit 31 marks inputs, and the
/// remaining bits hold the input ID or `gate + 1` (0 is the constant).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Signal(u32);

const INPUT_FLAG: u32 = 1 << 31;

// Constructors
impl Signal {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn one() -> Self {
        Self(1)
    }

    pub const fn from_input(input: u32) -> Self {
        assert!(input < (1 << 30), "Input ID out of range");
        Self(INPUT_FLAG | (input << 1))
    }

    pub const fn from_gate(gate: u32) -> Self {
        assert!(gate < (1 << 30) - 1, "Gate ID out of range");
        Self((gate + 1) << 1)
    }
}

// Getters
impl Signal {
    const fn payload(self) -> u32 {
        (self.0 & !INPUT_FLAG) >> 1
    }

    pub const fn input(&self) -> u32 {
        assert!(self.is_input());
        self.payload()
    }

    pub const fn gate(&self) -> u32 {
        assert!(self.is_gate());
        self.payload() - 1
    }

    /// The same signal with the complement flag cleared.
    pub const fn regular(self) -> Self {
        Self(self.0 & !1)
    }
}

// Checks
impl Signal {
    pub const fn is_const(&self) -> bool {
        self.0 & !1 == 0
    }

    pub const fn is_input(&self) -> bool {
        self.0 & INPUT_FLAG != 0
    }

    pub const fn is_gate(&self) -> bool {
        !self.is_input() && !self.is_const()
    }

    pub const fn is_negated(&self) -> bool {
        self.0 & 1 != 0
    }
}

impl From<bool> for Signal {
    fn from(b: bool) -> Self {
        if b {
            Self::one()
        } else {
            Self::zero()
        }
    }
}

impl Not for Signal {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_const() {
            return write!(f, "{}", self.0 & 1);
        }
        if self.is_negated() {
            write!(f, "!")?;
        }
        if self.is_input() {
            write!(f, "i{}", self.input())
        } else {
            write!(f, "g{}", self.gate())
        }
    }
}

impl Debug for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
