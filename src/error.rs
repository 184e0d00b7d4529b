use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::signal::Signal;

/// Failure of the shared-diagram builder. Callers treat this as "nothing built".
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("diagram size limit exceeded: {reached} nodes (limit {limit})")]
    SizeLimit { limit: usize, reached: usize },

    #[error("signal {0} refers to a gate that is not defined")]
    UndefinedSignal(Signal),

    #[error("gate {0} depends on itself")]
    CombinationalLoop(Signal),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("variable table covers {table} variables but the diagram has {num_vars}")]
    TableSizeMismatch { table: usize, num_vars: usize },

    #[error("node tests variable {index}, outside the table of {size} variables")]
    VariableOutOfRange { index: usize, size: usize },

    #[error("node tests variable {index}, which has no input name")]
    UnmappedVariable { index: usize },

    #[error("reported variable name {name:?} is neither \"L\" nor of the form \"L[<digits>]\"")]
    MalformedName { name: String },

    #[error("reported variables map to the same key {key:?}")]
    DuplicateKey { key: String },

    #[error("cannot open output file {}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
