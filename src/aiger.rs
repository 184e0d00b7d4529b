//! Reader for combinational ASCII AIGER (`aag`) files.
//!
//! Tokenizing is done by the `aiger` crate; this module checks the records
//! against the header and maps them onto a [`Network`]. Files with latches
//! are rejected.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::network::{Gate, Network};
use crate::signal::Signal;

#[derive(Debug, Error)]
pub enum AigerError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: latches are not supported (found {count})")]
    Latches { line: usize, count: u32 },

    #[error("line {line}: literal {literal} refers to an undefined variable")]
    UndefinedLiteral { line: usize, literal: u32 },

    #[error("unexpected end of file: expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn syntax(line: usize, message: impl Into<String>) -> AigerError {
    AigerError::Syntax {
        line,
        message: message.into(),
    }
}

/// `aag M I L O A`
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Header {
    pub m: u32,
    pub i: u32,
    pub l: u32,
    pub o: u32,
    pub a: u32,
}

impl Header {
    fn from_reader<R: Read>(reader: &::aiger::Reader<R>) -> Result<Self, AigerError> {
        let h = reader.header();
        let (m, i, l, o, a) = (h.m as u64, h.i as u64, h.l as u64, h.o as u64, h.a as u64);
        if m >= (1 << 29) {
            return Err(syntax(1, format!("maximum variable index {} is too large", m)));
        }
        if i + l + a > m {
            return Err(syntax(1, "M must cover all inputs, latches and AND gates"));
        }
        if o >= (1 << 29) {
            return Err(syntax(1, format!("too many outputs: {}", o)));
        }
        Ok(Header {
            m: m as u32,
            i: i as u32,
            l: l as u32,
            o: o as u32,
            a: a as u32,
        })
    }

    fn max_literal(&self) -> u32 {
        2 * self.m + 1
    }
}

/// What an AIGER variable stands for in the network.
#[derive(Debug, Copy, Clone)]
enum Definition {
    Input(u32),
    And,
}

/// Records collected so far, with the line each one came from.
struct Records {
    header: Header,
    defined: HashMap<u32, Definition>,
    inputs: u32,
    outputs: Vec<(usize, u32)>,
    ands: Vec<(usize, [u32; 3])>,
    symbols: Vec<(usize, ::aiger::Symbol, usize, String)>,
}

impl Records {
    fn literal(&self, literal: ::aiger::Literal, line: usize) -> Result<u32, AigerError> {
        let max = self.header.max_literal();
        if literal.0 > max as usize {
            return Err(syntax(line, format!("literal {} exceeds 2*M+1 = {}", literal.0, max)));
        }
        Ok(literal.0 as u32)
    }

    fn define(&mut self, literal: u32, definition: Definition, line: usize) -> Result<(), AigerError> {
        if literal < 2 || literal % 2 != 0 {
            return Err(syntax(line, format!("invalid definition literal {}", literal)));
        }
        if self.defined.insert(literal / 2, definition).is_some() {
            return Err(syntax(line, format!("variable {} defined twice", literal / 2)));
        }
        Ok(())
    }

    fn add(&mut self, record: ::aiger::Aiger, line: usize) -> Result<(), AigerError> {
        match record {
            ::aiger::Aiger::Input(literal) => {
                if self.inputs >= self.header.i {
                    return Err(syntax(line, "more inputs than the header declares"));
                }
                let literal = self.literal(literal, line)?;
                self.define(literal, Definition::Input(self.inputs), line)?;
                self.inputs += 1;
            }
            ::aiger::Aiger::Latch { .. } => {
                return Err(AigerError::Latches { line, count: 1 });
            }
            ::aiger::Aiger::Output(literal) => {
                let literal = self.literal(literal, line)?;
                self.outputs.push((line, literal));
            }
            ::aiger::Aiger::AndGate {
                output,
                inputs: [left, right],
            } => {
                let lhs = self.literal(output, line)?;
                let rhs0 = self.literal(left, line)?;
                let rhs1 = self.literal(right, line)?;
                self.define(lhs, Definition::And, line)?;
                self.ands.push((line, [lhs, rhs0, rhs1]));
            }
            ::aiger::Aiger::Symbol {
                type_spec,
                position,
                symbol,
            } => {
                self.symbols.push((line, type_spec, position, symbol));
            }
        }
        Ok(())
    }

    fn check_counts(&self) -> Result<(), AigerError> {
        if self.inputs < self.header.i {
            return Err(AigerError::UnexpectedEof { expected: "input" });
        }
        if self.outputs.len() < self.header.o as usize {
            return Err(AigerError::UnexpectedEof { expected: "output" });
        }
        if self.ands.len() < self.header.a as usize {
            return Err(AigerError::UnexpectedEof { expected: "AND gate" });
        }
        if self.outputs.len() > self.header.o as usize || self.ands.len() > self.header.a as usize {
            return Err(syntax(1, "more records than the header declares"));
        }
        Ok(())
    }

    fn signal(&self, literal: u32, line: usize) -> Result<Signal, AigerError> {
        let var = literal / 2;
        let signal = match self.defined.get(&var) {
            None if var == 0 => Signal::zero(),
            None => return Err(AigerError::UndefinedLiteral { line, literal }),
            Some(&Definition::Input(k)) => Signal::from_input(k),
            Some(Definition::And) => Signal::from_gate(var - 1),
        };
        Ok(if literal % 2 == 1 { !signal } else { signal })
    }

    fn into_network(self) -> Result<Network, AigerError> {
        let mut network = Network::new();
        for _ in 0..self.inputs {
            network.add_input(None);
        }
        for &(line, [lhs, rhs0, rhs1]) in &self.ands {
            let inputs = [self.signal(rhs0, line)?, self.signal(rhs1, line)?];
            network.add_gate(lhs / 2 - 1, Gate { inputs });
        }
        for &(line, literal) in &self.outputs {
            network.add_output(self.signal(literal, line)?, None);
        }
        for (line, kind, position, name) in self.symbols {
            if name.is_empty() {
                return Err(syntax(line, "empty symbol name"));
            }
            match kind {
                ::aiger::Symbol::Input if position < self.header.i as usize => {
                    network.set_input_name(position as u32, name)
                }
                ::aiger::Symbol::Output if position < self.header.o as usize => {
                    network.set_output_name(position, name)
                }
                _ => return Err(syntax(line, format!("symbol index {} is out of range", position))),
            }
        }
        Ok(network)
    }
}

/// Read an ASCII AIGER network.
///
/// Input `k` of the file becomes network input `k`; AND gate with output
/// variable `v` becomes gate `v - 1`. Symbol names are attached to inputs and
/// outputs; unnamed ones stay `None`.
pub fn read_aag<R: Read>(reader: R) -> Result<Network, AigerError> {
    let reader = ::aiger::Reader::from_reader(reader).map_err(|e| syntax(1, format!("{:?}", e)))?;
    let header = Header::from_reader(&reader)?;
    debug!("AIGER header: {:?}", header);
    if header.l > 0 {
        return Err(AigerError::Latches {
            line: 1,
            count: header.l,
        });
    }

    let mut records = Records {
        header,
        defined: HashMap::new(),
        inputs: 0,
        outputs: Vec::new(),
        ands: Vec::new(),
        symbols: Vec::new(),
    };
    // The header is line 1 and every record takes one line.
    for (k, record) in reader.records().enumerate() {
        let line = k + 2;
        let record = record.map_err(|e| syntax(line, format!("{:?}", e)))?;
        records.add(record, line)?;
    }
    records.check_counts()?;

    let network = records.into_network()?;
    debug!(
        "AIGER network: {} inputs, {} outputs, {} gates",
        network.num_inputs(),
        network.num_outputs(),
        network.num_gates()
    );
    Ok(network)
}

pub fn read_aag_file(path: impl AsRef<Path>) -> Result<Network, AigerError> {
    let file = File::open(path)?;
    read_aag(BufReader::new(file))
}
