//! Parser for formulas in infix notation.
//!
//! Precedence, strongest first:
//!
//! ```text
//! basic   ::= variable | '(' iff ')'
//! not     ::= ('!' | '~')* basic
//! and     ::= not ('&' not)*
//! or      ::= and ('|' and)*
//! implies ::= or ['->' or]
//! iff     ::= implies ('<->' implies)*
//! ```
//!
//! Chains of `&`, `|` and `<->` are folded to the left. Implication does not chain: `a -> b -> c`
//! is rejected.
//!
//! Open parentheses are kept on an explicit stack of groups, so the nesting depth of the
//! input is not bounded by the call stack.

mod lexer;

use thiserror::Error;

pub use lexer::{decode, Lexer, Position, ScanError, ScanErrorKind, Token, TokenKind};

use crate::node::{BinaryOp, NodeManager, NodeRef};

/// What the parser was looking for when it hit an unexpected token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Expected {
    #[error("expected ')'")]
    RightParen,
    #[error("expected variable or '('")]
    Operand,
    #[error("expected operator or EOF")]
    OperatorOrEof,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("{pos}: parse error at '{token}' {expected}")]
    Unexpected {
        token: TokenKind,
        pos: Position,
        expected: Expected,
    },
}

impl ParseError {
    /// The position in the source the error refers to
    pub fn position(&self) -> Position {
        match self {
            ParseError::Scan(err) => err.pos,
            ParseError::Unexpected { pos, .. } => *pos,
        }
    }
}

/// Parses a complete formula, interning every subformula into `mngr`.
/// Returns the root of the formula.
pub fn parse_formula(input: &str, mngr: &mut NodeManager) -> Result<NodeRef, ParseError> {
    Parser::new(input, mngr)?.parse()
}

/// The partially reduced operands of one parenthesized group, or of the whole formula.
///
/// Each level holds the left operand of its operator. A level is reduced into the next weaker
/// one as soon as an operator of that weaker level is read, which builds the same nodes in the
/// same order as descending through the grammar would.
#[derive(Debug, Default)]
struct Group {
    /// Negations in front of the opening parenthesis
    negations: usize,
    iff: Option<NodeRef>,
    implies: Option<NodeRef>,
    or: Option<NodeRef>,
    and: Option<NodeRef>,
}

fn fold(mngr: &mut NodeManager, op: BinaryOp, lhs: Option<NodeRef>, rhs: NodeRef) -> NodeRef {
    match lhs {
        Some(lhs) => mngr.binary(op, lhs, rhs),
        None => rhs,
    }
}

fn negate(mngr: &mut NodeManager, mut node: NodeRef, negations: usize) -> NodeRef {
    for _ in 0..negations {
        node = mngr.not(node);
    }
    node
}

impl Group {
    fn negated(negations: usize) -> Self {
        Self {
            negations,
            ..Default::default()
        }
    }

    fn push_operand(&mut self, mngr: &mut NodeManager, operand: NodeRef) {
        self.and = Some(fold(mngr, BinaryOp::And, self.and, operand));
    }

    fn reduce_and(&mut self, mngr: &mut NodeManager) {
        if let Some(and) = self.and.take() {
            self.or = Some(fold(mngr, BinaryOp::Or, self.or, and));
        }
    }

    fn reduce_or(&mut self, mngr: &mut NodeManager) -> Option<NodeRef> {
        self.reduce_and(mngr);
        let or = self.or.take()?;
        Some(match self.implies.take() {
            Some(lhs) => mngr.imp(lhs, or),
            None => or,
        })
    }

    fn reduce_implies(&mut self, mngr: &mut NodeManager) {
        if let Some(implies) = self.reduce_or(mngr) {
            self.iff = Some(fold(mngr, BinaryOp::Iff, self.iff, implies));
        }
    }

    /// Reduces all levels. Returns `None` if the group never received an operand.
    fn finish(mut self, mngr: &mut NodeManager) -> Option<NodeRef> {
        self.reduce_implies(mngr);
        self.iff
    }
}

/// Builds a formula bottom-up through a [`NodeManager`], reading one token ahead.
pub struct Parser<'a, 'm> {
    lexer: Lexer<'a>,
    /// The current, not yet consumed token
    token: Token,
    mngr: &'m mut NodeManager,
}

impl<'a, 'm> Parser<'a, 'm> {
    pub fn new(input: &'a str, mngr: &'m mut NodeManager) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token()?;
        Ok(Self { lexer, token, mngr })
    }

    /// Parses the whole input as a single formula.
    /// Anything but the end of input after the formula is an error.
    pub fn parse(mut self) -> Result<NodeRef, ParseError> {
        let mut group = Group::default();
        let mut enclosing: Vec<Group> = Vec::new();

        loop {
            let negations = self.parse_negations()?;
            let operand = match &self.token.kind {
                TokenKind::Variable(name) => {
                    let var = self.mngr.var(name);
                    self.advance()?;
                    negate(self.mngr, var, negations)
                }
                TokenKind::LeftParen => {
                    self.advance()?;
                    enclosing.push(std::mem::replace(&mut group, Group::negated(negations)));
                    continue;
                }
                _ => return Err(self.unexpected(Expected::Operand)),
            };
            group.push_operand(self.mngr, operand);

            // Read operators until the next operand, closing groups on the way
            loop {
                let closes_group = match self.token.kind {
                    TokenKind::And => false,
                    TokenKind::Or => {
                        group.reduce_and(self.mngr);
                        false
                    }
                    TokenKind::Implies if group.implies.is_none() => {
                        group.implies = group.reduce_or(self.mngr);
                        false
                    }
                    TokenKind::Iff => {
                        group.reduce_implies(self.mngr);
                        false
                    }
                    TokenKind::RightParen if !enclosing.is_empty() => {
                        let parent = enclosing.pop().unwrap_or_default();
                        let inner = std::mem::replace(&mut group, parent);
                        let negations = inner.negations;
                        let value = inner
                            .finish(self.mngr)
                            .ok_or_else(|| self.unexpected(Expected::Operand))?;
                        let value = negate(self.mngr, value, negations);
                        group.push_operand(self.mngr, value);
                        true
                    }
                    TokenKind::End if enclosing.is_empty() => {
                        return group
                            .finish(self.mngr)
                            .ok_or_else(|| self.unexpected(Expected::Operand));
                    }
                    _ if enclosing.is_empty() => {
                        return Err(self.unexpected(Expected::OperatorOrEof))
                    }
                    _ => return Err(self.unexpected(Expected::RightParen)),
                };
                self.advance()?;
                if !closes_group {
                    break;
                }
            }
        }
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.token = self.lexer.next_token()?;
        Ok(())
    }

    fn unexpected(&self, expected: Expected) -> ParseError {
        ParseError::Unexpected {
            token: self.token.kind.clone(),
            pos: self.token.pos,
            expected,
        }
    }

    /// Skips a run of negations and returns its length.
    fn parse_negations(&mut self) -> Result<usize, ParseError> {
        let mut negations = 0usize;
        while self.token.kind == TokenKind::Not {
            negations += 1;
            self.advance()?;
        }
        Ok(negations)
    }
}
