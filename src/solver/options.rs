use crate::encode::Query;

const DEFAULT_CHECK_SATISFIABILITY: bool = false;
const DEFAULT_MAX_DECISIONS: Option<u32> = None;
const DEFAULT_VERBOSITY: u8 = 0;

/// What to do with a parsed formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Encode the formula and decide it with a SAT backend
    #[default]
    Solve,
    /// Print the formula in canonical syntax
    PrettyPrint,
    /// Write the CNF encoding in DIMACS format
    Dump,
}

#[derive(Debug, Clone)]
pub struct Options {
    pub mode: Mode,
    /// Check satisfiability instead of validity.
    /// Also decides the polarity of the root in dump mode.
    pub check_satisfiability: bool,
    /// The maximum number of decisions the SAT backend may take.
    /// If the bound is reached, the result is "resources exhausted". `None` means unbounded.
    pub max_decisions: Option<u32>,
    /// Verbosity level. Any level above 0 makes the SAT backend verbose.
    pub verbose: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            check_satisfiability: DEFAULT_CHECK_SATISFIABILITY,
            max_decisions: DEFAULT_MAX_DECISIONS,
            verbose: DEFAULT_VERBOSITY,
        }
    }
}

impl Options {
    /// The question the encoding answers under these options
    pub fn query(&self) -> Query {
        if self.check_satisfiability {
            Query::Satisfiability
        } else {
            Query::Validity
        }
    }
}
