use crate::reference::Ref;
use crate::types::Var;

/// An internal diagram node, or the terminal when `variable` is [`Var::TERMINAL`].
///
/// `high` is the then-edge (variable assigned 1), `low` the else-edge.
/// Stored nodes never carry a complemented `high` edge.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub variable: Var,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    pub(crate) const fn terminal() -> Self {
        Self {
            variable: Var::TERMINAL,
            low: Ref::INVALID,
            high: Ref::INVALID,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.variable.is_terminal()
    }
}
