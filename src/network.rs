//! Combinational AND-inverter network with named primary inputs and outputs.

use std::collections::HashMap;

use log::info;

use crate::signal::Signal;

/// Two-input AND gate; complemented fanins express the other connectives.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Gate {
    pub inputs: [Signal; 2],
}

#[derive(Debug, Clone)]
pub struct Output {
    pub signal: Signal,
    pub name: Option<String>,
}

/// Sizes of the L, S and X buckets produced by [`Network::order_inputs_lsx`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct InputClasses {
    pub l: usize,
    pub s: usize,
    pub x: usize,
    pub other: usize,
}

#[derive(Debug, Default)]
pub struct Network {
    /// Input names, indexed by input ID.
    names: Vec<Option<String>>,
    /// Input IDs in variable order.
    order: Vec<u32>,
    outputs: Vec<Output>,
    gates: HashMap<u32, Gate>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_inputs(&self) -> usize {
        self.order.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn gate(&self, id: u32) -> Option<&Gate> {
        self.gates.get(&id)
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Input IDs in their current order; position `i` becomes diagram variable index `i`.
    pub fn inputs(&self) -> &[u32] {
        &self.order
    }

    pub fn input_name(&self, input: u32) -> Option<&str> {
        self.names.get(input as usize).and_then(|n| n.as_deref())
    }

    /// Name of an input, or a dummy `pi<k>` name if it has none.
    ///
    /// Dummy names are zero-padded to the width of the largest input ID, so
    /// a network with 12 inputs gets `pi00` through `pi11`.
    pub fn input_label(&self, input: u32) -> String {
        match self.input_name(input) {
            Some(name) => name.to_string(),
            None => {
                let width = self.names.len().saturating_sub(1).to_string().len();
                format!("pi{:0width$}", input, width = width)
            }
        }
    }

    pub fn set_input_name(&mut self, input: u32, name: impl Into<String>) {
        self.names[input as usize] = Some(name.into());
    }

    pub fn set_output_name(&mut self, output: usize, name: impl Into<String>) {
        self.outputs[output].name = Some(name.into());
    }

    pub fn add_input(&mut self, name: Option<String>) -> Signal {
        let id = self.names.len() as u32;
        self.names.push(name);
        self.order.push(id);
        Signal::from_input(id)
    }

    pub fn add_output(&mut self, signal: Signal, name: Option<String>) {
        self.outputs.push(Output { signal, name });
    }

    /// Register an AND gate under an explicit ID (as AIGER files number them).
    pub fn add_gate(&mut self, id: u32, gate: Gate) -> Signal {
        self.gates.insert(id, gate);
        Signal::from_gate(id)
    }

    pub fn add_and(&mut self, a: Signal, b: Signal) -> Signal {
        let id = self.gates.len() as u32;
        assert!(!self.gates.contains_key(&id), "Gate {} already exists", id);
        self.add_gate(id, Gate { inputs: [a, b] })
    }

    pub fn add_or(&mut self, a: Signal, b: Signal) -> Signal {
        !self.add_and(!a, !b)
    }

    /// Stable-partition the inputs by the upper-cased first letter of their
    /// name into `L ++ S ++ X ++ other` and rewrite the input order.
    /// Unnamed inputs go to `other`.
    pub fn order_inputs_lsx(&mut self) -> InputClasses {
        let mut l = Vec::new();
        let mut s = Vec::new();
        let mut x = Vec::new();
        let mut other = Vec::new();

        for &id in &self.order {
            let first = self
                .input_name(id)
                .and_then(|name| name.chars().next())
                .map(|c| c.to_ascii_uppercase());
            match first {
                Some('L') => l.push(id),
                Some('S') => s.push(id),
                Some('X') => x.push(id),
                _ => other.push(id),
            }
        }

        let classes = InputClasses {
            l: l.len(),
            s: s.len(),
            x: x.len(),
            other: other.len(),
        };
        info!(
            "PIs classified: S={}, X={}, L={}",
            classes.s, classes.x, classes.l
        );

        self.order = l.into_iter().chain(s).chain(x).chain(other).collect();
        classes
    }
}
