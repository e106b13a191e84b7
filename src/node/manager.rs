use indexmap::IndexMap;

use super::{BinaryOp, Node, NodeKind, NodeRef};

/// The hash-consing store owning every node of one formula.
///
/// For every constructor signature there is at most one node. Operator nodes are keyed by
/// their kind and the references of their operands, which is sound because operands are
/// themselves interned. Nodes are kept in creation order; since an operator can only be
/// built from existing nodes, creation order is a topological order of the DAG.
#[derive(Default, Debug)]
pub struct NodeManager {
    /// All nodes, in creation order
    nodes: Vec<Node>,

    /// Registry of operator nodes
    node_registry: IndexMap<NodeKind, NodeRef>,

    /// Registry of variables, indexed by name
    variables: IndexMap<String, NodeRef>,
}

impl NodeManager {
    /* Variables */

    /// Returns the variable with the given name, creating it on first use.
    pub fn var(&mut self, name: &str) -> NodeRef {
        if let Some(node) = self.variables.get(name) {
            return *node;
        }
        let node = self.push(NodeKind::Variable(name.to_string()));
        self.variables.insert(name.to_string(), node);
        log::trace!("Interned variable {} as {}", name, node);
        node
    }

    /// Returns the variable with the given name, if it occurs in the formula.
    pub fn get_var(&self, name: &str) -> Option<NodeRef> {
        self.variables.get(name).copied()
    }

    /// Iterates over the variable nodes in order of their first occurrence.
    pub fn variables(&self) -> impl Iterator<Item = &Node> + '_ {
        self.variables.values().map(move |r| self.get(*r))
    }

    /* Boolean Functions */

    /// Boolean negation
    pub fn not(&mut self, r: NodeRef) -> NodeRef {
        self.intern_node(NodeKind::Not(r))
    }

    /// Boolean conjunction
    pub fn and(&mut self, l: NodeRef, r: NodeRef) -> NodeRef {
        self.binary(BinaryOp::And, l, r)
    }

    /// Boolean disjunction
    pub fn or(&mut self, l: NodeRef, r: NodeRef) -> NodeRef {
        self.binary(BinaryOp::Or, l, r)
    }

    /// Boolean implication
    pub fn imp(&mut self, l: NodeRef, r: NodeRef) -> NodeRef {
        self.binary(BinaryOp::Implies, l, r)
    }

    /// Boolean equivalence
    pub fn iff(&mut self, l: NodeRef, r: NodeRef) -> NodeRef {
        self.binary(BinaryOp::Iff, l, r)
    }

    /// Applies the given connective.
    /// Operands are kept in the given order; `a & b` and `b & a` are different nodes.
    pub fn binary(&mut self, op: BinaryOp, l: NodeRef, r: NodeRef) -> NodeRef {
        self.intern_node(NodeKind::Binary(op, l, r))
    }

    fn intern_node(&mut self, kind: NodeKind) -> NodeRef {
        debug_assert!(!matches!(kind, NodeKind::Variable(_)));
        if let Some(node) = self.node_registry.get(&kind) {
            return *node;
        }
        let node = self.push(kind.clone());
        debug_assert!(self.get(node).children().all(|c| c < node));
        self.node_registry.insert(kind, node);
        node
    }

    fn push(&mut self, kind: NodeKind) -> NodeRef {
        let id = NodeRef::new(self.nodes.len());
        self.nodes.push(Node::new(id, kind));
        id
    }

    /* Access */

    /// Returns the node behind a reference.
    ///
    /// # Panics
    /// Panics if the reference was not created by this manager.
    pub fn get(&self, r: NodeRef) -> &Node {
        &self.nodes[r.id()]
    }

    /// Iterates over all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    /// The number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Evaluates the formula rooted at `root` under the given valuation of the variables.
    /// Every node is evaluated once, in creation order.
    pub fn eval(&self, root: NodeRef, mut valuation: impl FnMut(&str) -> bool) -> bool {
        let mut values: Vec<bool> = Vec::with_capacity(root.id() + 1);
        for node in &self.nodes[..=root.id()] {
            let value = match node.kind() {
                NodeKind::Variable(name) => valuation(name),
                NodeKind::Not(c) => !values[c.id()],
                NodeKind::Binary(op, l, r) => op.apply(values[l.id()], values[r.id()]),
            };
            values.push(value);
        }
        values[root.id()]
    }
}
