//! Tseitin encoding of a formula DAG into CNF.
//!
//! Every node gets its own propositional variable, numbered in creation order starting at 1.
//! Each operator node `p` contributes the clauses that make its variable equivalent to its
//! definition:
//!
//! | Node           | Clauses                                             |
//! |----------------|-----------------------------------------------------|
//! | `!a`           | `(p, a)`, `(-p, -a)`                                |
//! | `a & b`        | `(-p, a)`, `(-p, b)`, `(p, -a, -b)`                 |
//! | `a \| b`       | `(p, -a)`, `(p, -b)`, `(-p, a, b)`                  |
//! | `a -> b`       | `(p, a)`, `(p, -b)`, `(-p, -a, b)`                  |
//! | `a <-> b`      | `(p, -a, -b)`, `(p, a, b)`, `(-p, -a, b)`, `(-p, a, -b)` |
//!
//! A final unit clause fixes the root: positive when checking satisfiability, negative when
//! looking for a counter-model.

mod dimacs;

pub use dimacs::DimacsWriter;

use crate::{
    error::Error,
    node::{BinaryOp, NodeKind, NodeManager, NodeRef},
    sat::{nlit, plit, ClauseSink, PLit, PVar},
};

/// The question the CNF answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Is there an assignment under which the formula is true?
    Satisfiability,
    /// Is the formula true under every assignment? The CNF is satisfiable iff it is not.
    Validity,
}

/// The result of encoding a formula.
/// Maps between nodes and their propositional variables.
#[derive(Debug, Clone)]
pub struct Encoding {
    /// The node of each variable, at index `var - 1`
    nodes: Vec<NodeRef>,
    /// The unit literal fixing the root
    root: PLit,
    num_clauses: usize,
}

impl Encoding {
    /// The variable of an encoded node
    pub fn var_of(&self, node: NodeRef) -> Option<PVar> {
        if node.id() < self.nodes.len() {
            Some(node.id() as PVar + 1)
        } else {
            None
        }
    }

    /// The node encoded by a variable
    pub fn node_of(&self, var: PVar) -> Option<NodeRef> {
        let idx = (var as usize).checked_sub(1)?;
        self.nodes.get(idx).copied()
    }

    pub fn num_vars(&self) -> PVar {
        self.nodes.len() as PVar
    }

    /// The number of clauses, including the unit clause of the root
    pub fn num_clauses(&self) -> usize {
        self.num_clauses
    }

    /// The literal asserted for the root
    pub fn root_literal(&self) -> PLit {
        self.root
    }
}

/// The number of defining clauses contributed by a node of the given kind
fn definition_size(kind: &NodeKind) -> usize {
    match kind {
        NodeKind::Variable(_) => 0,
        NodeKind::Not(_) => 2,
        NodeKind::Binary(BinaryOp::Iff, _, _) => 4,
        NodeKind::Binary(_, _, _) => 3,
    }
}

/// The number of clauses produced when encoding the formula rooted at `root`, including the unit
/// clause of the root.
pub fn clause_count(mngr: &NodeManager, root: NodeRef) -> usize {
    mngr.iter()
        .take(root.id() + 1)
        .map(|n| definition_size(n.kind()))
        .sum::<usize>()
        + 1
}

/// Encodes the formula rooted at `root` and passes the clauses to `sink`, in order.
///
/// All nodes created up to and including `root` are encoded. The sink is first told the names of
/// the formula variables, then the size of the problem, then receives the clauses.
pub fn encode<S: ClauseSink + ?Sized>(
    mngr: &NodeManager,
    root: NodeRef,
    query: Query,
    sink: &mut S,
) -> Result<Encoding, Error> {
    let nodes: Vec<NodeRef> = mngr.iter().take(root.id() + 1).map(|n| n.id()).collect();
    let pvar = |r: NodeRef| r.id() as PVar + 1;
    let var = |r: NodeRef| plit(pvar(r));

    // Pass 1: numbering
    let mut num_clauses = 1;
    for node in mngr.iter().take(nodes.len()) {
        if let Some(name) = node.name() {
            sink.declare_variable(pvar(node.id()), name)?;
        }
        num_clauses += definition_size(node.kind());
    }
    let num_vars = nodes.len() as PVar;
    log::debug!("Encoding {} nodes into {} clauses", num_vars, num_clauses);
    sink.declare_problem(num_vars, num_clauses)?;

    // Pass 2: definitions
    for node in mngr.iter().take(nodes.len()) {
        let p = var(node.id());
        match *node.kind() {
            NodeKind::Variable(_) => {}
            NodeKind::Not(c) => {
                let a = var(c);
                sink.add_clause(&[p, a])?;
                sink.add_clause(&[-p, -a])?;
            }
            NodeKind::Binary(op, l, r) => {
                let (a, b) = (var(l), var(r));
                match op {
                    BinaryOp::And => {
                        sink.add_clause(&[-p, a])?;
                        sink.add_clause(&[-p, b])?;
                        sink.add_clause(&[p, -a, -b])?;
                    }
                    BinaryOp::Or => {
                        sink.add_clause(&[p, -a])?;
                        sink.add_clause(&[p, -b])?;
                        sink.add_clause(&[-p, a, b])?;
                    }
                    BinaryOp::Implies => {
                        sink.add_clause(&[p, a])?;
                        sink.add_clause(&[p, -b])?;
                        sink.add_clause(&[-p, -a, b])?;
                    }
                    BinaryOp::Iff => {
                        sink.add_clause(&[p, -a, -b])?;
                        sink.add_clause(&[p, a, b])?;
                        sink.add_clause(&[-p, -a, b])?;
                        sink.add_clause(&[-p, a, -b])?;
                    }
                }
            }
        }
    }

    let root = match query {
        Query::Satisfiability => plit(pvar(root)),
        Query::Validity => nlit(pvar(root)),
    };
    sink.add_clause(&[root])?;

    Ok(Encoding {
        nodes,
        root,
        num_clauses,
    })
}
