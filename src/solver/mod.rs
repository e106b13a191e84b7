use std::time::Instant;

use rustsat::{
    solvers::{LimitDecisions, Solve, SolveStats, SolverResult},
    types::{Clause, Lit, TernaryVal},
};
use rustsat_cadical::CaDiCaL;
use thiserror::Error;

use crate::{
    error::Error,
    sat::{nlit, plit, ClauseSink, PLit, PVar},
};

mod options;

pub use options::{Mode, Options};

/// The outcome of a call to a SAT backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverAnswer {
    /// The clauses are satisfiable. The assignment can be queried from the backend.
    Sat,
    /// The clauses are unsatisfiable
    Unsat,
    /// The decision bound was reached before the backend found an answer
    ResourcesExhausted,
}

impl std::fmt::Display for SolverAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverAnswer::Sat => write!(f, "sat"),
            SolverAnswer::Unsat => write!(f, "unsat"),
            SolverAnswer::ResourcesExhausted => write!(f, "resources exhausted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("invalid literal {0}")]
    InvalidLiteral(PLit),
    #[error("no assignment available, last answer was {0}")]
    NoAssignment(SolverAnswer),
    #[error("SAT backend failed: {0}")]
    Backend(String),
}

/// A SAT engine that accumulates clauses and decides them.
///
/// Clauses are added through [`ClauseSink::add_clause`]. The backend is solved at most once.
pub trait SatBackend: ClauseSink {
    /// When set, the backend reports progress and statistics through the log.
    fn set_verbose(&mut self, verbose: bool);

    /// Decides the clauses added so far.
    /// With a bound, the backend gives up after that many decisions and answers
    /// [`SolverAnswer::ResourcesExhausted`].
    fn solve(&mut self, max_decisions: Option<u32>) -> Result<SolverAnswer, Error>;

    /// Returns one literal per variable `1..=num_vars`, positive if the variable is true.
    /// Only available after [`SolverAnswer::Sat`].
    fn assignment(&self, num_vars: PVar) -> Result<Vec<PLit>, Error>;
}

/// [`SatBackend`] running CaDiCaL.
pub struct CadicalBackend {
    cadical: Box<CaDiCaL<'static, 'static>>,
    verbose: bool,
    answer: Option<SolverAnswer>,
}

impl Default for CadicalBackend {
    fn default() -> Self {
        Self {
            cadical: Box::default(),
            verbose: false,
            answer: None,
        }
    }
}

impl CadicalBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn backend_error(err: impl std::fmt::Display) -> SolverError {
    SolverError::Backend(err.to_string())
}

fn to_lit(lit: PLit) -> Result<Lit, SolverError> {
    Lit::from_ipasir(lit).map_err(|_| SolverError::InvalidLiteral(lit))
}

impl ClauseSink for CadicalBackend {
    fn add_clause(&mut self, clause: &[PLit]) -> Result<(), Error> {
        let clause = clause
            .iter()
            .map(|l| to_lit(*l))
            .collect::<Result<Clause, _>>()?;
        self.cadical.add_clause(clause).map_err(backend_error)?;
        Ok(())
    }
}

impl SatBackend for CadicalBackend {
    fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    fn solve(&mut self, max_decisions: Option<u32>) -> Result<SolverAnswer, Error> {
        self.cadical
            .limit_decisions(max_decisions)
            .map_err(backend_error)?;
        if self.verbose {
            log::info!(
                "Solving {} clauses (decision bound {})",
                self.cadical.n_clauses(),
                max_decisions.map_or("none".to_string(), |d| d.to_string())
            );
        }
        let timer = Instant::now();
        let res = self.cadical.solve().map_err(backend_error)?;
        let answer = match res {
            SolverResult::Sat => SolverAnswer::Sat,
            SolverResult::Unsat => SolverAnswer::Unsat,
            SolverResult::Interrupted => SolverAnswer::ResourcesExhausted,
        };
        if self.verbose {
            log::info!("CaDiCaL answered {} ({:?})", answer, timer.elapsed());
        }
        self.answer = Some(answer);
        Ok(answer)
    }

    fn assignment(&self, num_vars: PVar) -> Result<Vec<PLit>, Error> {
        match self.answer {
            Some(SolverAnswer::Sat) => {}
            Some(answer) => return Err(SolverError::NoAssignment(answer).into()),
            None => return Err(backend_error("not solved yet").into()),
        }
        let mut assignment = Vec::with_capacity(num_vars as usize);
        for var in 1..=num_vars {
            let val = self
                .cadical
                .lit_val(to_lit(plit(var))?)
                .map_err(backend_error)?;
            assignment.push(match val {
                TernaryVal::False => nlit(var),
                TernaryVal::True | TernaryVal::DontCare => plit(var),
            });
        }
        Ok(assignment)
    }
}
