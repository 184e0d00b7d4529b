//! Depth-first witness search over one root of a shared diagram.
//!
//! A *witness* is the cube of decisions along the first path, in then-before-else
//! order, that reaches a terminal. Either constant counts: the search looks for a
//! path that fixes the output, not for a satisfying assignment.
//!
//! Nodes testing an excluded variable (see [`VarInfo::is_excluded`]) are never
//! entered: the whole subtree below them is pruned, even if it contains paths
//! through non-excluded variables only.
//!
//! Every node whose exploration has started is remembered in a visited set and
//! never explored again within the same search. On an acyclic diagram a node
//! can only be re-entered after its exploration finished without a witness, so
//! the memo only ever answers "nothing here", and the witness is the same as
//! with memoization switched off.
//!
//! [`VarInfo::is_excluded`]: crate::vars::VarInfo::is_excluded

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use log::debug;

use crate::error::{Error, Result};
use crate::reference::Ref;
use crate::types::NodeId;
use crate::vars::VarTable;

/// Read-only view of a decision diagram, as needed by the search.
///
/// Implementors promise that the structure reachable from any root is acyclic
/// and does not change while a search borrows it, and that node identity is
/// `Ref::id()` (complement bits are ignored by the search).
pub trait Diagram {
    /// Size of the variable space; variable indices are `0..num_vars()`.
    fn num_vars(&self) -> usize;

    fn is_terminal(&self, node: Ref) -> bool;

    /// 0-based variable index tested by a non-terminal node.
    fn var_index(&self, node: Ref) -> usize;

    /// Child reached when the node's variable is 1.
    fn then_child(&self, node: Ref) -> Ref;

    /// Child reached when the node's variable is 0.
    fn else_child(&self, node: Ref) -> Ref;
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CubeValue {
    #[default]
    Unassigned,
    Zero,
    One,
}

impl CubeValue {
    /// Numeric value with don't-cares read as 0.
    pub fn or_zero(self) -> u8 {
        match self {
            CubeValue::One => 1,
            CubeValue::Zero | CubeValue::Unassigned => 0,
        }
    }
}

/// Ternary assignment over all diagram variables, indexed by variable index.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Cube(Vec<CubeValue>);

impl Cube {
    pub fn new(num_vars: usize) -> Self {
        Self(vec![CubeValue::Unassigned; num_vars])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> CubeValue {
        self.0[index]
    }

    pub fn set(&mut self, index: usize, value: CubeValue) {
        self.0[index] = value;
    }
}

/// Prints the cube the way CUDD does: `1`, `0` or `-` per variable.
impl Display for Cube {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for value in &self.0 {
            let c = match value {
                CubeValue::Unassigned => '-',
                CubeValue::Zero => '0',
                CubeValue::One => '1',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    Found(Cube),
    NotFound,
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SearchOptions {
    /// Cache "no witness below" per node. Switching it off only costs time.
    pub memoize: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { memoize: true }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Step {
    Found,
    NotFound,
}

/// State of a single-root search. Build a fresh one for every root.
pub struct Search<'a, D: Diagram + ?Sized> {
    diagram: &'a D,
    vars: &'a VarTable,
    options: SearchOptions,
    visited: HashSet<NodeId>,
    cube: Cube,
    explored: usize,
}

impl<'a, D: Diagram + ?Sized> Search<'a, D> {
    /// Fails if the table does not cover the diagram's variable space.
    pub fn new(diagram: &'a D, vars: &'a VarTable, options: SearchOptions) -> Result<Self> {
        let num_vars = diagram.num_vars();
        if vars.len() < num_vars {
            return Err(Error::TableSizeMismatch {
                table: vars.len(),
                num_vars,
            });
        }
        Ok(Self {
            diagram,
            vars,
            options,
            visited: HashSet::new(),
            cube: Cube::new(num_vars),
            explored: 0,
        })
    }

    /// Search from `root` and hand back the witness cube, if any.
    pub fn run(mut self, root: Ref) -> Result<Outcome> {
        let step = self.dfs(root)?;
        debug!(
            "search from {}: {:?} after exploring {} nodes ({} visited)",
            root,
            step,
            self.explored,
            self.visited.len()
        );
        Ok(match step {
            Step::Found => Outcome::Found(self.cube),
            Step::NotFound => Outcome::NotFound,
        })
    }

    fn is_visited(&self, id: NodeId) -> bool {
        self.options.memoize && self.visited.contains(&id)
    }

    fn mark_visited(&mut self, id: NodeId) {
        if self.options.memoize {
            self.visited.insert(id);
        }
    }

    fn dfs(&mut self, node: Ref) -> Result<Step> {
        assert!(node.is_valid(), "invalid node reference reached the search");
        let node = node.regular();

        if self.diagram.is_terminal(node) {
            return Ok(Step::Found);
        }

        let id = node.id();
        if self.is_visited(id) {
            return Ok(Step::NotFound);
        }
        self.explored += 1;

        let index = self.diagram.var_index(node);
        let info = self.vars.lookup(index)?;
        if index >= self.cube.len() {
            return Err(Error::VariableOutOfRange {
                index,
                size: self.cube.len(),
            });
        }

        if info.is_excluded() {
            debug!("pruning {} at excluded variable {:?}", node, info.name);
            self.mark_visited(id);
            return Ok(Step::NotFound);
        }

        self.mark_visited(id);

        self.cube.set(index, CubeValue::One);
        if self.dfs(self.diagram.then_child(node))? == Step::Found {
            return Ok(Step::Found);
        }

        self.cube.set(index, CubeValue::Zero);
        if self.dfs(self.diagram.else_child(node))? == Step::Found {
            return Ok(Step::Found);
        }

        self.cube.set(index, CubeValue::Unassigned);
        Ok(Step::NotFound)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use test_log::test;

    use super::CubeValue::{One, Unassigned, Zero};
    use crate::bdd::Bdd;
    use crate::types::Var;

    /// Hand-built diagram without complement edges: node 0 is the terminal,
    /// other nodes are `(var_index, then, else)` by position.
    pub(crate) struct Arena {
        pub num_vars: usize,
        pub nodes: Vec<Option<(usize, Ref, Ref)>>,
    }

    impl Arena {
        pub fn new(num_vars: usize) -> Self {
            Self {
                num_vars,
                nodes: vec![None],
            }
        }

        pub fn terminal(&self) -> Ref {
            Ref::positive(NodeId::new(0))
        }

        pub fn add(&mut self, var: usize, then_child: Ref, else_child: Ref) -> Ref {
            self.nodes.push(Some((var, then_child, else_child)));
            Ref::positive(NodeId::new(self.nodes.len() as u32 - 1))
        }

        fn get(&self, node: Ref) -> (usize, Ref, Ref) {
            self.nodes[node.id().index()].expect("not a terminal")
        }
    }

    impl Diagram for Arena {
        fn num_vars(&self) -> usize {
            self.num_vars
        }
        fn is_terminal(&self, node: Ref) -> bool {
            self.nodes[node.id().index()].is_none()
        }
        fn var_index(&self, node: Ref) -> usize {
            self.get(node).0
        }
        fn then_child(&self, node: Ref) -> Ref {
            self.get(node).1
        }
        fn else_child(&self, node: Ref) -> Ref {
            self.get(node).2
        }
    }

    fn table(num_vars: usize, names: &[&str]) -> VarTable {
        VarTable::new(num_vars, names.iter().map(|&n| Some(n))).unwrap()
    }

    fn run(arena: &Arena, vars: &VarTable, root: Ref, memoize: bool) -> Outcome {
        Search::new(arena, vars, SearchOptions { memoize })
            .unwrap()
            .run(root)
            .unwrap()
    }

    fn cube(values: &[CubeValue]) -> Cube {
        Cube(values.to_vec())
    }

    #[test]
    fn test_terminal_root_is_a_witness() {
        let arena = Arena::new(2);
        let vars = table(2, &["L[0]", "L[1]"]);
        let t = arena.terminal();
        assert_eq!(
            run(&arena, &vars, t, true),
            Outcome::Found(cube(&[Unassigned, Unassigned]))
        );
        // Complemented terminal (constant 0) is the same node.
        assert!(run(&arena, &vars, -t, true).is_found());
    }

    #[test]
    fn test_then_branch_first() {
        let mut arena = Arena::new(1);
        let t = arena.terminal();
        let root = arena.add(0, t, -t);
        let vars = table(1, &["L[0]"]);
        assert_eq!(run(&arena, &vars, root, true), Outcome::Found(cube(&[One])));
    }

    #[test]
    fn test_excluded_root_has_no_witness() {
        let mut arena = Arena::new(1);
        let t = arena.terminal();
        let root = arena.add(0, t, -t);
        let vars = table(1, &["S0"]);
        assert_eq!(run(&arena, &vars, root, true), Outcome::NotFound);
    }

    #[test]
    fn test_excluded_then_child_falls_back_to_else() {
        // x0 ? (s1 ? 1 : 0) : 1
        let mut arena = Arena::new(2);
        let t = arena.terminal();
        let s = arena.add(1, t, -t);
        let root = arena.add(0, s, t);
        let vars = table(2, &["L[0]", "s1"]);
        assert_eq!(
            run(&arena, &vars, root, true),
            Outcome::Found(cube(&[Zero, Unassigned]))
        );
    }

    #[test]
    fn test_pruning_hides_witness_below_excluded_node() {
        // s0 ? (x1 ? 1 : 0) : (x1 ? 1 : 0): every path crosses the excluded root.
        let mut arena = Arena::new(2);
        let t = arena.terminal();
        let x = arena.add(1, t, -t);
        let root = arena.add(0, x, x);
        let vars = table(2, &["Sel", "L[1]"]);
        assert_eq!(run(&arena, &vars, root, true), Outcome::NotFound);
    }

    #[test]
    fn test_backtrack_resets_cube() {
        // L0 ? (L1 ? S2 : S2) : L3 ? 1 : 0
        let mut arena = Arena::new(4);
        let t = arena.terminal();
        let s = arena.add(2, t, -t);
        let l1 = arena.add(1, s, s);
        let l3 = arena.add(3, t, -t);
        let root = arena.add(0, l1, l3);
        let vars = table(4, &["L[0]", "L[1]", "S[2]", "L[3]"]);
        assert_eq!(
            run(&arena, &vars, root, true),
            Outcome::Found(cube(&[Zero, Unassigned, Unassigned, One]))
        );
    }

    #[test]
    fn test_memoization_does_not_change_witness() {
        // A diamond of shared nodes with an excluded variable at the bottom.
        let mut arena = Arena::new(5);
        let t = arena.terminal();
        let s = arena.add(4, t, -t);
        let d = arena.add(3, s, s);
        let b = arena.add(1, d, d);
        let c = arena.add(2, d, t);
        let root = arena.add(0, b, c);
        let vars = table(5, &["L[0]", "L[1]", "L[2]", "L[3]", "S[4]"]);

        let with_memo = run(&arena, &vars, root, true);
        let without_memo = run(&arena, &vars, root, false);
        assert_eq!(with_memo, without_memo);
        assert_eq!(
            with_memo,
            Outcome::Found(cube(&[Zero, Unassigned, Zero, Unassigned, Unassigned]))
        );
    }

    #[test]
    fn test_shared_node_explored_once() {
        let mut arena = Arena::new(3);
        let t = arena.terminal();
        let s = arena.add(2, t, -t);
        let shared = arena.add(1, s, s);
        let root = arena.add(0, shared, shared);
        let vars = table(3, &["L[0]", "L[1]", "s"]);

        let mut search = Search::new(&arena, &vars, SearchOptions::default()).unwrap();
        assert_eq!(search.dfs(root).unwrap(), Step::NotFound);
        // root, shared and the excluded node; the second visit of `shared` is a memo hit.
        assert_eq!(search.explored, 3);
        assert_eq!(search.visited.len(), 3);
        assert_eq!(search.cube, cube(&[Unassigned, Unassigned, Unassigned]));
    }

    #[test]
    fn test_unmapped_variable_is_an_error() {
        let mut arena = Arena::new(2);
        let t = arena.terminal();
        let root = arena.add(1, t, -t);
        let vars = table(2, &["L[0]"]);
        let err = Search::new(&arena, &vars, SearchOptions::default())
            .unwrap()
            .run(root)
            .unwrap_err();
        assert!(matches!(err, Error::UnmappedVariable { index: 1 }));
    }

    #[test]
    fn test_variable_out_of_range_is_an_error() {
        let mut arena = Arena::new(1);
        let t = arena.terminal();
        let root = arena.add(5, t, -t);
        let vars = table(1, &["L[0]"]);
        let err = Search::new(&arena, &vars, SearchOptions::default())
            .unwrap()
            .run(root)
            .unwrap_err();
        assert!(matches!(err, Error::VariableOutOfRange { index: 5, .. }));
    }

    #[test]
    fn test_table_smaller_than_diagram_is_rejected() {
        let arena = Arena::new(3);
        let vars = table(2, &["L[0]"]);
        assert!(matches!(
            Search::new(&arena, &vars, SearchOptions::default()),
            Err(Error::TableSizeMismatch {
                table: 2,
                num_vars: 3
            })
        ));
    }

    #[test]
    #[should_panic(expected = "invalid node reference")]
    fn test_invalid_reference_panics() {
        let arena = Arena::new(0);
        let vars = table(0, &[]);
        let _ = Search::new(&arena, &vars, SearchOptions::default())
            .unwrap()
            .run(Ref::INVALID);
    }

    fn has_clean_path(bdd: &Bdd, vars: &VarTable, node: Ref) -> bool {
        if bdd.is_terminal(node) {
            return true;
        }
        let index = Diagram::var_index(bdd, node);
        if vars.lookup(index).unwrap().is_excluded() {
            return false;
        }
        has_clean_path(bdd, vars, Diagram::then_child(bdd, node))
            || has_clean_path(bdd, vars, Diagram::else_child(bdd, node))
    }

    #[test]
    fn test_exclusion_soundness_on_all_3_var_functions() {
        let bdd = Bdd::default();
        bdd.declare_vars(3);
        let x: Vec<Ref> = (1..=3).map(|i| bdd.mk_var(Var::new(i))).collect();

        for truth_table in 0u32..256 {
            let mut f = bdd.zero;
            for minterm in 0..8 {
                if truth_table & (1 << minterm) != 0 {
                    let cube = (0..3).fold(bdd.one, |acc, i| {
                        let literal = if minterm & (1 << i) != 0 { x[i] } else { -x[i] };
                        bdd.apply_and(acc, literal)
                    });
                    f = bdd.apply_or(f, cube);
                }
            }

            for mask in 0..8 {
                let names: Vec<String> = (0..3)
                    .map(|i| if mask & (1 << i) != 0 { format!("S{}", i) } else { format!("L[{}]", i) })
                    .collect();
                let vars = VarTable::new(3, names.iter().map(|n| Some(n.as_str()))).unwrap();
                let outcome = Search::new(&bdd, &vars, SearchOptions::default())
                    .unwrap()
                    .run(f)
                    .unwrap();
                let context = format!("truth table {:08b}, excluded mask {:03b}", truth_table, mask);

                let no_memo = Search::new(&bdd, &vars, SearchOptions { memoize: false })
                    .unwrap()
                    .run(f)
                    .unwrap();
                assert_eq!(outcome, no_memo, "{}", context);

                match outcome {
                    Outcome::Found(cube) => {
                        for i in 0..3 {
                            if mask & (1 << i) != 0 {
                                assert_eq!(cube.get(i), Unassigned, "{}", context);
                            }
                        }
                        // Following the cube from the root reaches a terminal
                        // without testing an excluded variable.
                        let mut node = f;
                        while !bdd.is_terminal(node) {
                            let index = Diagram::var_index(&bdd, node);
                            assert_eq!(mask & (1 << index), 0, "{}", context);
                            node = match cube.get(index) {
                                One => Diagram::then_child(&bdd, node),
                                Zero => Diagram::else_child(&bdd, node),
                                Unassigned => panic!("path leaves the cube at {}: {}", index, context),
                            };
                        }
                    }
                    Outcome::NotFound => {
                        assert!(!has_clean_path(&bdd, &vars, f), "{}", context);
                    }
                }
            }
        }
    }

    #[test]
    fn test_cube_display() {
        let c = cube(&[One, Unassigned, Zero]);
        assert_eq!(c.to_string(), "1-0");
    }
}
