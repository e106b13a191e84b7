//! Checks validity or satisfiability of propositional formulas in infix notation.
//!
//! A formula is parsed into a hash-consed DAG ([`NodeManager`]), translated into CNF with one
//! auxiliary variable per unique subformula ([`encode`]) and handed to a SAT backend
//! ([`SatBackend`]). The DAG can also be rendered back into canonical infix syntax
//! ([`PrettyPrinter`]).

mod convert;
mod driver;
mod encode;
mod error;
mod node;
mod parse;
mod pretty;
mod sat;
mod solver;

pub use convert::{dimacs_to_boole, ConvertError, SyntaxErrorKind};
pub use driver::{Driver, Model, Verdict};
pub use encode::{clause_count, encode, DimacsWriter, Encoding, Query};
pub use error::Error;
pub use node::{BinaryOp, Node, NodeKind, NodeManager, NodeRef, Precedence};
pub use parse::{
    decode, parse_formula, Expected, Lexer, ParseError, Parser, Position, ScanError, ScanErrorKind, Token,
    TokenKind,
};
pub use pretty::{Layout, PrettyPrinter};
pub use sat::{eval_cnf, nlit, plit, Clause, ClauseSink, Cnf, PLit, PVar};
pub use solver::{CadicalBackend, Mode, Options, SatBackend, SolverAnswer, SolverError};
