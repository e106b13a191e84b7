//! Provides types for propositional clauses and the interface for consuming them

use crate::error::Error;

/// A propositional variable.
/// Variables are numbered consecutively starting at 1.
pub type PVar = u32;
/// A propositional literal, i.e., a variable or its negation
pub type PLit = i32;
/// A clause, i.e., a disjunction of literals
pub type Clause = Vec<PLit>;
/// A formula in conjunctive normal form, i.e., a conjunction of clauses
pub type Cnf = Vec<Clause>;

/// The positive literal of a variable
pub fn plit(var: PVar) -> PLit {
    debug_assert!(var > 0 && var <= i32::MAX as u32);
    var as PLit
}

/// The negative literal of a variable
pub fn nlit(var: PVar) -> PLit {
    -plit(var)
}

/// Receives the clauses of a CNF instance one at a time, in the order they are produced.
///
/// Besides the clauses, a sink is told the name of every variable that stands for a variable of
/// the formula and, once all variables are known, the size of the problem. Sinks that have no
/// use for this information ignore it.
pub trait ClauseSink {
    /// Announces that `var` represents the formula variable `name`.
    fn declare_variable(&mut self, _var: PVar, _name: &str) -> Result<(), Error> {
        Ok(())
    }

    /// Announces the number of variables and the number of clauses that will follow.
    fn declare_problem(&mut self, _num_vars: PVar, _num_clauses: usize) -> Result<(), Error> {
        Ok(())
    }

    /// Adds a clause. The literals are non-zero.
    fn add_clause(&mut self, clause: &[PLit]) -> Result<(), Error>;
}

impl ClauseSink for Cnf {
    fn add_clause(&mut self, clause: &[PLit]) -> Result<(), Error> {
        self.push(clause.to_vec());
        Ok(())
    }
}

/// Evaluates a CNF under an assignment of the variables.
/// `value(var)` returns the truth value of `var`.
pub fn eval_cnf(cnf: &[Clause], value: impl Fn(PVar) -> bool) -> bool {
    cnf.iter().all(|clause| {
        clause
            .iter()
            .any(|&lit| value(lit.unsigned_abs()) == (lit > 0))
    })
}
