//! Variable metadata: diagram variable index → declared input name.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VarInfo {
    pub index: usize,
    pub name: String,
}

impl VarInfo {
    /// Variables whose name contains an `s` (any case) are never traversed.
    pub fn is_excluded(&self) -> bool {
        self.name.contains(['s', 'S'])
    }

    /// Variables whose name starts with `L` (any case) are surfaced in reports.
    pub fn is_reported(&self) -> bool {
        self.name.starts_with(['L', 'l'])
    }
}

/// Lookup table sized to the diagram's variable space.
///
/// Entry `i` describes the `i`-th input; indices past the last input exist in
/// the diagram but carry no name.
#[derive(Debug, Clone)]
pub struct VarTable {
    vars: Vec<Option<VarInfo>>,
}

impl VarTable {
    pub fn new<S>(num_vars: usize, names: impl IntoIterator<Item = Option<S>>) -> Result<Self>
    where
        S: Into<String>,
    {
        let mut vars: Vec<Option<VarInfo>> = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                name.map(|name| VarInfo {
                    index,
                    name: name.into(),
                })
            })
            .collect();

        if vars.len() > num_vars {
            return Err(Error::TableSizeMismatch {
                table: vars.len(),
                num_vars,
            });
        }
        vars.resize(num_vars, None);

        Ok(Self { vars })
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Entry for `index`, distinguishing "out of range" from "unnamed".
    pub fn lookup(&self, index: usize) -> Result<&VarInfo> {
        match self.vars.get(index) {
            None => Err(Error::VariableOutOfRange {
                index,
                size: self.vars.len(),
            }),
            Some(None) => Err(Error::UnmappedVariable { index }),
            Some(Some(info)) => Ok(info),
        }
    }

    /// Named variables in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = &VarInfo> + '_ {
        self.vars.iter().flatten()
    }
}
