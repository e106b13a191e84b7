use std::fmt::Display;

mod manager;

#[cfg(test)]
pub(crate) mod testing;

pub use manager::NodeManager;

/// Opaque reference to a node owned by a [`NodeManager`].
/// The wrapped value is the creation order of the node, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(u32);

impl NodeRef {
    pub(crate) fn new(id: usize) -> Self {
        debug_assert!(id <= u32::MAX as usize);
        NodeRef(id as u32)
    }

    /// The creation order of the node this reference points to.
    pub fn id(self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Binding strength of node kinds, strongest first.
/// `Top` is the context of the root and binds weaker than every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Variable,
    Not,
    And,
    Or,
    Implies,
    Iff,
    Top,
}

/// The binary connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Implies,
    Iff,
}

impl BinaryOp {
    pub fn precedence(&self) -> Precedence {
        match self {
            BinaryOp::And => Precedence::And,
            BinaryOp::Or => Precedence::Or,
            BinaryOp::Implies => Precedence::Implies,
            BinaryOp::Iff => Precedence::Iff,
        }
    }

    /// The source syntax of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Implies => "->",
            BinaryOp::Iff => "<->",
        }
    }

    /// Returns true if chains of this operator are printed without parentheses.
    pub fn is_associative(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Applies the connective to two truth values.
    pub fn apply(&self, l: bool, r: bool) -> bool {
        match self {
            BinaryOp::And => l && r,
            BinaryOp::Or => l || r,
            BinaryOp::Implies => !l || r,
            BinaryOp::Iff => l == r,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The constructor signature of a node.
/// Operands are references to nodes that were interned before.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Variable
    Variable(String),
    /// Negation
    Not(NodeRef),
    /// Binary connective
    Binary(BinaryOp, NodeRef, NodeRef),
}

impl NodeKind {
    pub fn precedence(&self) -> Precedence {
        match self {
            NodeKind::Variable(_) => Precedence::Variable,
            NodeKind::Not(_) => Precedence::Not,
            NodeKind::Binary(op, _, _) => op.precedence(),
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Variable(name) => write!(f, "{}", name),
            NodeKind::Not(c) => write!(f, "!{}", c),
            NodeKind::Binary(op, l, r) => write!(f, "{} {} {}", l, op, r),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Unique identifier, equal to the creation order
    id: NodeRef,

    /// Type of node
    kind: NodeKind,
}

impl Node {
    pub(super) fn new(id: NodeRef, kind: NodeKind) -> Self {
        Node { id, kind }
    }

    pub fn id(&self) -> NodeRef {
        self.id
    }

    /// Returns [`NodeKind`] of the node
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the operands of the node, left to right
    pub fn children(&self) -> impl Iterator<Item = NodeRef> {
        let children = match self.kind {
            NodeKind::Variable(_) => [None, None],
            NodeKind::Not(c) => [Some(c), None],
            NodeKind::Binary(_, l, r) => [Some(l), Some(r)],
        };
        children.into_iter().flatten()
    }

    /// Returns the name if the node is a variable
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, NodeKind::Variable(_))
    }

    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} := {}", self.id, self.kind)
    }
}
