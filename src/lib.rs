//! # bdd-witness: witness paths through shared BDDs
//!
//! **`bdd-witness`** builds one shared Binary Decision Diagram for all outputs of a
//! combinational AND-inverter network and, for every output, looks for a single
//! root-to-terminal path that never tests a variable whose name contains `s`/`S`.
//! The values that path assigns to the `L`-named inputs are reported as JSON.
//!
//! ## Pipeline
//!
//! 1. [`aiger`] reads an ASCII AIGER file into a [`Network`][crate::network::Network].
//! 2. Optionally, [`Network::order_inputs_lsx`][crate::network::Network::order_inputs_lsx]
//!    moves `L`-inputs first, then `S`, then `X`, then everything else.
//! 3. [`build::build_shared`] encodes every output into one [`Bdd`][crate::bdd::Bdd] manager.
//! 4. [`witness::find_witnesses`] runs one depth-first [`search::Search`] per output.
//! 5. [`report::Report`] renders the results, and [`report::emit`] writes them out.
//!
//! ## Basic Usage
//!
//! ```rust
//! use bdd_witness::aiger::read_aag;
//! use bdd_witness::build::{build_shared, BuildOptions};
//! use bdd_witness::report::Report;
//! use bdd_witness::search::SearchOptions;
//! use bdd_witness::witness::find_witnesses;
//!
//! let aag = "aag 2 2 0 2 0\n2\n4\n2\n4\ni0 L[0]\ni1 S0\n";
//! let network = read_aag(aag.as_bytes()).unwrap();
//! let shared = build_shared(&network, &BuildOptions::default()).unwrap();
//! let vars = shared.var_table().unwrap();
//! let results = find_witnesses(&shared.bdd, &shared.roots, &vars, SearchOptions::default()).unwrap();
//!
//! assert!(results[0].found);
//! assert_eq!(results[0].assignments, vec![("L0".to_string(), 1)]);
//! assert!(!results[1].found);
//!
//! let document = Report::new("demo", &results).render().unwrap();
//! assert!(document.ends_with(b"}\n"));
//! ```
//!
//! The search itself only needs the [`Diagram`][crate::search::Diagram] trait, so
//! any decision diagram with regular/complemented edge handles can be plugged in.

pub mod aiger;
pub mod bdd;
pub mod build;
pub mod cache;
pub mod error;
pub mod network;
pub mod node;
pub mod reference;
pub mod report;
pub mod search;
pub mod signal;
pub mod types;
pub mod vars;
pub mod witness;
