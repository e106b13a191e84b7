use thiserror::Error;

use crate::{
    parse::{ParseError, ScanError},
    solver::SolverError,
};

/// Any error that aborts processing of a formula.
#[derive(Debug, Error)]
pub enum Error {
    /// The formula could not be scanned or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The SAT backend rejected a clause or failed while solving.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Reading the input or writing the output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if the error was caused by the formula itself rather than the environment.
    /// Such errors are reported with the position in the source.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

// Resolve transitive conversion

impl From<ScanError> for Error {
    fn from(err: ScanError) -> Self {
        Error::Parse(ParseError::Scan(err))
    }
}
