//! Random formula trees for property tests.

use std::collections::HashSet;

use quickcheck::{Arbitrary, Gen};

use super::{BinaryOp, NodeManager, NodeRef};

/// Few names, so that random trees repeat subformulas.
pub(crate) const NAMES: [&str; 4] = ["a", "b", "c", "d"];

const MAX_DEPTH: usize = 5;

/// A formula as a plain tree, without any sharing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Tree {
    Var(usize),
    Not(Box<Tree>),
    Binary(BinaryOp, Box<Tree>, Box<Tree>),
}

impl Tree {
    fn generate(g: &mut Gen, depth: usize) -> Self {
        if depth == 0 || u8::arbitrary(g) % 4 == 0 {
            return Tree::Var(usize::arbitrary(g) % NAMES.len());
        }
        let ops = [
            BinaryOp::And,
            BinaryOp::Or,
            BinaryOp::Implies,
            BinaryOp::Iff,
        ];
        match u8::arbitrary(g) % 5 {
            0 => Tree::Not(Box::new(Self::generate(g, depth - 1))),
            k => Tree::Binary(
                ops[k as usize - 1],
                Box::new(Self::generate(g, depth - 1)),
                Box::new(Self::generate(g, depth - 1)),
            ),
        }
    }

    /// Interns the tree bottom-up, left operand first, like the parser does.
    pub fn build(&self, mngr: &mut NodeManager) -> NodeRef {
        match self {
            Tree::Var(i) => mngr.var(NAMES[*i]),
            Tree::Not(c) => {
                let c = c.build(mngr);
                mngr.not(c)
            }
            Tree::Binary(op, l, r) => {
                let l = l.build(mngr);
                let r = r.build(mngr);
                mngr.binary(*op, l, r)
            }
        }
    }

    pub fn eval(&self, valuation: &impl Fn(&str) -> bool) -> bool {
        match self {
            Tree::Var(i) => valuation(NAMES[*i]),
            Tree::Not(c) => !c.eval(valuation),
            Tree::Binary(op, l, r) => op.apply(l.eval(valuation), r.eval(valuation)),
        }
    }

    /// Reads the value of `name` from the bits of `valuation`.
    pub fn lookup(valuation: u8, name: &str) -> bool {
        let bit = NAMES.iter().position(|n| *n == name).unwrap_or(0);
        valuation & (1 << bit) != 0
    }

    /// The number of structurally different subtrees, including the tree itself
    pub fn unique_subtrees(&self) -> usize {
        fn collect<'a>(t: &'a Tree, seen: &mut HashSet<&'a Tree>) {
            if seen.insert(t) {
                match t {
                    Tree::Var(_) => {}
                    Tree::Not(c) => collect(c, seen),
                    Tree::Binary(_, l, r) => {
                        collect(l, seen);
                        collect(r, seen);
                    }
                }
            }
        }
        let mut seen = HashSet::new();
        collect(self, &mut seen);
        seen.len()
    }

    /// Renders the tree in source syntax, parenthesizing every binary subformula.
    pub fn render(&self) -> String {
        match self {
            Tree::Var(i) => NAMES[*i].to_string(),
            Tree::Not(c) => format!("!{}", c.render()),
            Tree::Binary(op, l, r) => format!("({} {} {})", l.render(), op, r.render()),
        }
    }
}

impl Arbitrary for Tree {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = g.size().min(MAX_DEPTH);
        Self::generate(g, depth)
    }
}
