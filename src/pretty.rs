//! Renders formulas back into infix syntax with as few parentheses as the precedence allows.

use std::fmt::{self, Write};

use crate::node::{BinaryOp, NodeKind, NodeManager, NodeRef, Precedence};

/// How the rendered formula is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Top-level `<->`/`->` and `&`/`|` chains are split over lines, one operand or operator per
    /// line. Ends with a newline.
    #[default]
    Multiline,
    /// Everything on a single line, without a trailing newline
    Inline,
}

/// Pending output of the printer.
/// Items are pushed in reverse order so that popping yields them in output order.
enum Item {
    Text(&'static str),
    /// A subformula in an operand position of the given precedence
    Operand(NodeRef, Precedence),
    /// A chain of the given associative connective, one operand per line
    Chain(NodeRef, BinaryOp),
    /// A subformula that is split if it is an `&` or `|` chain
    Split(NodeRef, Precedence),
}

fn infix(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::And => " & ",
        BinaryOp::Or => " | ",
        BinaryOp::Implies => " -> ",
        BinaryOp::Iff => " <-> ",
    }
}

fn separator(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::And => "\n&\n",
        BinaryOp::Or => "\n|\n",
        BinaryOp::Implies => "\n->\n",
        BinaryOp::Iff => "\n<->\n",
    }
}

/// Whether an operand of `op` in a context of precedence `outer` needs parentheses.
/// Chains of `&` and `|` are printed flat; `->` and `<->` are parenthesized under themselves.
fn needs_parens(op: BinaryOp, outer: Precedence) -> bool {
    if op.is_associative() {
        outer < op.precedence()
    } else {
        outer <= op.precedence()
    }
}

/// Prints formulas owned by a [`NodeManager`].
/// Uses an explicit stack, so arbitrarily deep formulas can be printed.
pub struct PrettyPrinter<'a> {
    mngr: &'a NodeManager,
    layout: Layout,
}

impl<'a> PrettyPrinter<'a> {
    pub fn new(mngr: &'a NodeManager, layout: Layout) -> Self {
        Self { mngr, layout }
    }

    pub fn multiline(mngr: &'a NodeManager) -> Self {
        Self::new(mngr, Layout::Multiline)
    }

    pub fn inline(mngr: &'a NodeManager) -> Self {
        Self::new(mngr, Layout::Inline)
    }

    pub fn render(&self, root: NodeRef) -> String {
        let mut out = String::new();
        // Writing into a string does not fail
        let _ = self.write(root, &mut out);
        out
    }

    pub fn write<W: Write + ?Sized>(&self, root: NodeRef, out: &mut W) -> fmt::Result {
        let mut stack = Vec::new();
        match self.layout {
            Layout::Inline => stack.push(Item::Operand(root, Precedence::Top)),
            Layout::Multiline => match *self.mngr.get(root).kind() {
                NodeKind::Binary(op @ (BinaryOp::Iff | BinaryOp::Implies), l, r) => {
                    stack.push(Item::Split(r, op.precedence()));
                    stack.push(Item::Text(separator(op)));
                    stack.push(Item::Split(l, op.precedence()));
                }
                _ => stack.push(Item::Split(root, Precedence::Top)),
            },
        }

        while let Some(item) = stack.pop() {
            match item {
                Item::Text(text) => out.write_str(text)?,
                Item::Split(node, outer) => match *self.mngr.get(node).kind() {
                    NodeKind::Binary(op @ (BinaryOp::And | BinaryOp::Or), _, _) => {
                        stack.push(Item::Chain(node, op))
                    }
                    _ => stack.push(Item::Operand(node, outer)),
                },
                Item::Chain(node, chain) => match *self.mngr.get(node).kind() {
                    NodeKind::Binary(op, l, r) if op == chain => {
                        stack.push(Item::Chain(r, chain));
                        stack.push(Item::Text(separator(chain)));
                        stack.push(Item::Chain(l, chain));
                    }
                    _ => stack.push(Item::Operand(node, chain.precedence())),
                },
                Item::Operand(node, outer) => match self.mngr.get(node).kind() {
                    NodeKind::Variable(name) => out.write_str(name)?,
                    NodeKind::Not(c) => {
                        out.write_char('!')?;
                        stack.push(Item::Operand(*c, Precedence::Not));
                    }
                    NodeKind::Binary(op, l, r) => {
                        let parens = needs_parens(*op, outer);
                        if parens {
                            out.write_char('(')?;
                            stack.push(Item::Text(")"));
                        }
                        stack.push(Item::Operand(*r, op.precedence()));
                        stack.push(Item::Text(infix(*op)));
                        stack.push(Item::Operand(*l, op.precedence()));
                    }
                },
            }
        }

        if self.layout == Layout::Multiline {
            out.write_char('\n')?;
        }
        Ok(())
    }
}
