//! Shared BDD manager.
//!
//! All output functions of a network live in one [`Bdd`] manager, so equal
//! sub-functions are represented by the same node (hash consing). Edges carry a
//! complement bit; the single terminal node is `one`, and `zero` is its
//! complement. The high (then) edge of a stored node is never complemented,
//! which keeps the representation canonical.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::node::Node;
use crate::reference::Ref;
use crate::search::Diagram;
use crate::types::{NodeId, Var};

pub struct Bdd {
    nodes: RefCell<Vec<Node>>,
    unique: RefCell<HashMap<Node, NodeId>>,
    cache: RefCell<Cache<(Ref, Ref, Ref), Ref>>,
    num_vars: Cell<usize>,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    pub fn new(cache_bits: usize) -> Self {
        assert!(cache_bits <= 31, "Cache bits should be in the range 0..=31");

        // Node 0 is the terminal.
        let nodes = vec![Node::terminal()];
        let one = Ref::positive(NodeId::new(0));
        let zero = -one;

        Self {
            nodes: RefCell::new(nodes),
            unique: RefCell::new(HashMap::new()),
            cache: RefCell::new(Cache::new(cache_bits)),
            num_vars: Cell::new(0),
            zero,
            one,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(16)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.cache.borrow();
        f.debug_struct("Bdd")
            .field("num_vars", &self.num_vars())
            .field("num_nodes", &self.num_nodes())
            .field("cache_hits", &cache.hits())
            .field("cache_misses", &cache.misses())
            .finish()
    }
}

impl Bdd {
    /// Number of nodes allocated so far, the terminal included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Size of the variable space: the largest declared or used variable ID.
    pub fn num_vars(&self) -> usize {
        self.num_vars.get()
    }

    /// Reserve variables `1..=n`, whether or not any node ever tests them.
    pub fn declare_vars(&self, n: usize) {
        if n > self.num_vars.get() {
            self.num_vars.set(n);
        }
    }

    pub fn node(&self, id: NodeId) -> Node {
        self.nodes.borrow()[id.index()]
    }

    pub fn variable(&self, id: NodeId) -> Var {
        self.node(id).variable
    }
    pub fn low(&self, id: NodeId) -> Ref {
        self.node(id).low
    }
    pub fn high(&self, id: NodeId) -> Ref {
        self.node(id).high
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.id());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.id());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        node.id() == self.one.id()
    }

    pub fn mk_node(&self, v: Var, low: Ref, high: Ref) -> Ref {
        debug!("mk(v = {}, low = {}, high = {})", v, low, high);

        // Handle canonicity
        if high.is_negated() {
            debug!("mk: restoring canonicity");
            return -self.mk_node(v, -low, -high);
        }

        // Handle duplicates
        if low == high {
            debug!("mk: duplicates {} == {}", low, high);
            return low;
        }

        self.declare_vars(v.id() as usize);

        let node = Node {
            variable: v,
            low,
            high,
        };
        if let Some(&id) = self.unique.borrow().get(&node) {
            return Ref::positive(id);
        }

        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId::new(nodes.len() as u32);
        nodes.push(node);
        self.unique.borrow_mut().insert(node, id);
        Ref::positive(id)
    }

    pub fn mk_var(&self, v: Var) -> Ref {
        self.mk_node(v, self.zero, self.one)
    }

    /// Top variable of a function, or `None` for a constant.
    fn top_var(&self, node: Ref) -> Option<Var> {
        if self.is_terminal(node) {
            None
        } else {
            Some(self.variable(node.id()))
        }
    }

    pub fn top_cofactors(&self, node: Ref, v: Var) -> (Ref, Ref) {
        match self.top_var(node) {
            Some(top) if top == v => (self.low_node(node), self.high_node(node)),
            Some(top) => {
                assert!(v < top, "Cofactor variable {} is below the top {}", v, top);
                (node, node)
            }
            None => (node, node),
        }
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_witness::bdd::Bdd;
    /// use bdd_witness::types::Var;
    ///
    /// let bdd = Bdd::default();
    /// let x = bdd.mk_var(Var::new(1));
    /// let y = bdd.mk_var(Var::new(2));
    /// let z = bdd.mk_var(Var::new(3));
    /// let f = bdd.apply_ite(x, y, z);
    /// assert_eq!(f, bdd.mk_node(Var::new(1), z, y));
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            return self.apply_ite(f, self.one, h);
        }
        if h == f {
            return self.apply_ite(f, g, self.zero);
        }
        if g == -f {
            return self.apply_ite(f, self.zero, h);
        }
        if h == -f {
            return self.apply_ite(f, g, self.one);
        }

        // Make sure the first two pointers (f and g) are regular (not negated)
        let (mut f, mut g, mut h) = (f, g, h);

        // ite(~F,G,H) => ite(F,H,G)
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }

        // ite(F,~G,H) => ~ite(F,G,~H)
        let mut n = false;
        if g.is_negated() {
            n = true;
            g = -g;
            h = -h;
        }

        let key = (f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return if n { -res } else { res };
        }

        // Determine the top variable; `f` is not a constant here.
        let m = [self.top_var(f), self.top_var(g), self.top_var(h)]
            .into_iter()
            .flatten()
            .min()
            .expect("f is not a constant");
        debug!("min variable = {}", m);

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0);
        let t = self.apply_ite(f1, g1, h1);

        let res = self.mk_node(m, e, t);
        debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);

        if n {
            -res
        } else {
            res
        }
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, v)
    }

    /// Regular ids of all nodes reachable from `nodes`, terminal included.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        visited.insert(self.one.id());
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            let id = node.id();
            if visited.insert(id) {
                queue.push_back(self.low(id));
                queue.push_back(self.high(id));
            }
        }

        visited
    }

    pub fn size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }

    /// Evaluate `f` under a total assignment indexed by 0-based variable index.
    pub fn eval(&self, f: Ref, values: &[bool]) -> bool {
        let mut current = f;
        while !self.is_terminal(current) {
            let v = self.variable(current.id());
            current = if values[v.index()] {
                self.high_node(current)
            } else {
                self.low_node(current)
            };
        }
        self.is_one(current)
    }
}

impl Diagram for Bdd {
    fn num_vars(&self) -> usize {
        Bdd::num_vars(self)
    }

    fn is_terminal(&self, node: Ref) -> bool {
        Bdd::is_terminal(self, node)
    }

    fn var_index(&self, node: Ref) -> usize {
        self.variable(node.id()).index()
    }

    fn then_child(&self, node: Ref) -> Ref {
        self.high_node(node)
    }

    fn else_child(&self, node: Ref) -> Ref {
        self.low_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn var(bdd: &Bdd, id: u32) -> Ref {
        bdd.mk_var(Var::new(id))
    }

    #[test]
    fn test_terminals() {
        let bdd = Bdd::default();
        assert_eq!(bdd.zero, -bdd.one);
        assert!(bdd.is_terminal(bdd.zero));
        assert!(bdd.is_terminal(bdd.one));
        assert_eq!(bdd.zero.id(), bdd.one.id());
        assert_eq!(bdd.num_nodes(), 1);
        assert_eq!(bdd.num_vars(), 0);
    }

    #[test]
    fn test_mk_node_hash_consing() {
        let bdd = Bdd::default();
        let x1 = var(&bdd, 1);
        let again = var(&bdd, 1);
        assert_eq!(x1, again);
        assert_eq!(bdd.num_nodes(), 2);
        assert_eq!(bdd.num_vars(), 1);
    }

    #[test]
    fn test_mk_node_canonical_high_edge() {
        let bdd = Bdd::default();
        let v = Var::new(1);
        let f = bdd.mk_node(v, bdd.one, bdd.zero);
        assert!(f.is_negated());
        assert!(!bdd.high(f.id()).is_negated());
        assert_eq!(f, -var(&bdd, 1));
    }

    #[test]
    fn test_mk_node_redundant() {
        let bdd = Bdd::default();
        let x2 = var(&bdd, 2);
        assert_eq!(bdd.mk_node(Var::new(1), x2, x2), x2);
    }

    #[test]
    fn test_de_morgan_and() {
        let bdd = Bdd::default();
        let x = var(&bdd, 1);
        let y = var(&bdd, 2);
        let f = -bdd.apply_and(x, y);
        let g = bdd.apply_or(-x, -y);
        assert_eq!(f, g);
    }

    #[test]
    fn test_de_morgan_or() {
        let bdd = Bdd::default();
        let x = var(&bdd, 1);
        let y = var(&bdd, 2);
        let f = -bdd.apply_or(x, y);
        let g = bdd.apply_and(-x, -y);
        assert_eq!(f, g);
    }

    #[test]
    fn test_xor_itself() {
        let bdd = Bdd::default();
        let x = var(&bdd, 1);
        let y = var(&bdd, 2);
        let f = bdd.apply_and(x, y);
        assert_eq!(bdd.apply_xor(f, f), bdd.zero);
        assert_eq!(bdd.apply_xor(f, -f), bdd.one);
    }

    #[test]
    fn test_apply_ite() {
        let bdd = Bdd::default();

        let g = var(&bdd, 2);
        let h = var(&bdd, 3);
        assert_eq!(bdd.apply_ite(bdd.one, g, h), g);
        assert_eq!(bdd.apply_ite(bdd.zero, g, h), h);

        let f = var(&bdd, 5);
        assert_eq!(bdd.apply_ite(f, g, g), g);
        assert_eq!(bdd.apply_ite(f, bdd.one, bdd.zero), f);
        assert_eq!(bdd.apply_ite(f, bdd.zero, bdd.one), -f);

        let f = var(&bdd, 6);
        let g = var(&bdd, 7);
        let h = var(&bdd, 8);
        let result = bdd.mk_node(Var::new(6), -g, -h);
        assert_eq!(bdd.apply_ite(-f, -g, -h), result);
    }

    #[test]
    fn test_eval_matches_truth_table() {
        let bdd = Bdd::default();
        let x1 = var(&bdd, 1);
        let x2 = var(&bdd, 2);
        let x3 = var(&bdd, 3);

        // x1 ∨ (x2 ∧ ¬x3)
        let f = bdd.apply_or(x1, bdd.apply_and(x2, -x3));
        for bits in 0..8u32 {
            let values: Vec<bool> = (0..3).map(|i| bits & (1 << i) != 0).collect();
            let expected = values[0] || (values[1] && !values[2]);
            assert_eq!(bdd.eval(f, &values), expected, "values = {:?}", values);
        }
    }

    #[test]
    fn test_size_counts_shared_nodes_once() {
        let bdd = Bdd::default();
        let x1 = var(&bdd, 1);
        let x2 = var(&bdd, 2);
        let f = bdd.apply_xor(x1, x2);
        // x1 node, one x2 node (shared through complement), terminal
        assert_eq!(bdd.size(f), 3);
    }

    #[test]
    fn test_declare_vars() {
        let bdd = Bdd::default();
        bdd.declare_vars(4);
        var(&bdd, 2);
        assert_eq!(bdd.num_vars(), 4);
    }
}
