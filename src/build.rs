//! Construction of one shared diagram for all outputs of a network.

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::bdd::Bdd;
use crate::error::{BuildError, Result};
use crate::network::Network;
use crate::reference::Ref;
use crate::signal::Signal;
use crate::types::Var;
use crate::vars::VarTable;

#[derive(Debug, Copy, Clone)]
pub struct BuildOptions {
    /// Give up once the manager holds more than this many nodes.
    pub size_limit: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            size_limit: 10_000_000,
        }
    }
}

/// All output functions of a network in one manager.
#[derive(Debug)]
pub struct SharedDiagram {
    pub bdd: Bdd,
    /// One root per network output, in output order.
    pub roots: Vec<Ref>,
    /// Input name per variable index; unnamed inputs carry a dummy name.
    pub input_names: Vec<String>,
}

impl SharedDiagram {
    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    /// Variable table over the manager's whole variable space. Every input
    /// variable is named; only indices past the last input stay unnamed.
    pub fn var_table(&self) -> Result<VarTable> {
        VarTable::new(self.bdd.num_vars(), self.input_names.iter().cloned().map(Some))
    }
}

/// Build the global functions of every network output.
///
/// The `i`-th entry of [`Network::inputs`] becomes variable index `i`, so
/// reordering the inputs beforehand changes the variable order.
pub fn build_shared(network: &Network, options: &BuildOptions) -> Result<SharedDiagram, BuildError> {
    let bdd = Bdd::default();
    bdd.declare_vars(network.num_inputs());

    let mut input_vars: HashMap<u32, Var> = HashMap::new();
    let mut input_names = Vec::with_capacity(network.num_inputs());
    for (index, &input) in network.inputs().iter().enumerate() {
        input_vars.insert(input, Var::from_index(index));
        input_names.push(network.input_label(input));
    }

    let mut builder = Builder {
        bdd: &bdd,
        network,
        input_vars: &input_vars,
        gates: HashMap::new(),
        size_limit: options.size_limit,
    };
    let mut roots = Vec::with_capacity(network.num_outputs());
    for (i, output) in network.outputs().iter().enumerate() {
        let root = builder.encode(output.signal)?;
        debug!("D[{}] = {} of size {}", i, root, bdd.size(root));
        roots.push(root);
    }

    info!(
        "Built shared diagram: {} outputs, {} variables, {} nodes",
        roots.len(),
        bdd.num_vars(),
        bdd.num_nodes()
    );
    Ok(SharedDiagram {
        bdd,
        roots,
        input_names,
    })
}

struct Builder<'a> {
    bdd: &'a Bdd,
    network: &'a Network,
    input_vars: &'a HashMap<u32, Var>,
    /// Functions of already encoded gates.
    gates: HashMap<u32, Ref>,
    size_limit: usize,
}

impl Builder<'_> {
    /// Function of `signal` if it needs no further gates, `None` otherwise.
    fn lookup(&self, signal: Signal) -> Result<Option<Ref>, BuildError> {
        let res = if signal.is_const() {
            self.bdd.zero
        } else if signal.is_input() {
            let var = self
                .input_vars
                .get(&signal.input())
                .ok_or(BuildError::UndefinedSignal(signal))?;
            self.bdd.mk_var(*var)
        } else {
            match self.gates.get(&signal.gate()) {
                Some(&res) => res,
                None => return Ok(None),
            }
        };
        Ok(Some(if signal.is_negated() { -res } else { res }))
    }

    fn encode(&mut self, signal: Signal) -> Result<Ref, BuildError> {
        // Post-order over the gates, without recursion: a gate is encoded
        // once both of its fanins are.
        let mut stack = vec![signal.regular()];
        let mut expanded = HashSet::new();
        while let Some(&top) = stack.last() {
            if self.lookup(top)?.is_some() {
                stack.pop();
                continue;
            }
            let gate = self
                .network
                .gate(top.gate())
                .ok_or(BuildError::UndefinedSignal(top))?;
            let [a, b] = gate.inputs;
            match (self.lookup(a)?, self.lookup(b)?) {
                (Some(left), Some(right)) => {
                    let res = self.bdd.apply_and(left, right);
                    self.gates.insert(top.gate(), res);
                    stack.pop();

                    let reached = self.bdd.num_nodes();
                    if reached > self.size_limit {
                        return Err(BuildError::SizeLimit {
                            limit: self.size_limit,
                            reached,
                        });
                    }
                }
                (left, right) => {
                    // Fanins of an expanded gate are encoded before it resurfaces,
                    // unless the gate depends on itself.
                    if !expanded.insert(top.gate()) {
                        return Err(BuildError::CombinationalLoop(top));
                    }
                    if left.is_none() {
                        stack.push(a.regular());
                    }
                    if right.is_none() {
                        stack.push(b.regular());
                    }
                }
            }
        }
        self.lookup(signal)?.ok_or(BuildError::UndefinedSignal(signal))
    }
}
