use std::{fmt::Display, io::Write, time::Instant};

use crate::{
    encode::{encode, DimacsWriter, Query},
    error::Error,
    node::{NodeManager, NodeRef},
    parse::parse_formula,
    pretty::PrettyPrinter,
    solver::{CadicalBackend, Mode, Options, SatBackend, SolverAnswer},
};

/// Values of the formula variables, in order of their first occurrence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model(Vec<(String, bool)>);

impl Model {
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{} = {}", name, u8::from(value))?;
        }
        Ok(())
    }
}

/// The result of processing one formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The formula is true under every assignment.
    Valid,
    /// The formula is false under the given assignment.
    Invalid(Model),
    /// The formula is true under the given assignment.
    Satisfiable(Model),
    /// The formula is false under every assignment.
    Unsatisfiable,
    /// The decision bound was hit before the question was decided.
    ResourcesExhausted,
    /// The formula was pretty printed.
    PrettyPrinted,
    /// The CNF encoding was written.
    Dumped,
}

impl Verdict {
    /// Returns false if processing did not lead to a result.
    pub fn is_success(&self) -> bool {
        !matches!(self, Verdict::ResourcesExhausted)
    }

    /// Writes the report of a decided formula.
    /// Pretty printing and dumping write their output directly, so they report nothing.
    pub fn report(&self, out: &mut dyn Write) -> std::io::Result<()> {
        match self {
            Verdict::Valid => writeln!(out, "% VALID formula"),
            Verdict::Invalid(model) => {
                writeln!(out, "% INVALID formula (falsifying assignment follows)")?;
                write!(out, "{}", model)
            }
            Verdict::Satisfiable(model) => {
                writeln!(out, "% SATISFIABLE formula (satisfying assignment follows)")?;
                write!(out, "{}", model)
            }
            Verdict::Unsatisfiable => writeln!(out, "% UNSATISFIABLE formula"),
            Verdict::ResourcesExhausted => writeln!(out, "% RESOURCES EXHAUSTED"),
            Verdict::PrettyPrinted | Verdict::Dumped => Ok(()),
        }
    }
}

/// Runs the pipeline on a single formula: parse, then print, dump or solve.
/// Every call works on its own [`NodeManager`].
pub struct Driver {
    options: Options,
}

impl Driver {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Processes `input` with the CaDiCaL backend and writes the result to `out`.
    pub fn run(&self, input: &str, out: &mut dyn Write) -> Result<Verdict, Error> {
        self.run_with(input, out, CadicalBackend::new)
    }

    /// Processes `input` and writes the result to `out`.
    /// The backend is only connected if the formula is to be solved.
    pub fn run_with<B: SatBackend>(
        &self,
        input: &str,
        out: &mut dyn Write,
        connect: impl FnOnce() -> B,
    ) -> Result<Verdict, Error> {
        let mut mngr = NodeManager::default();

        let timer = Instant::now();
        let root = parse_formula(input, &mut mngr)?;
        log::info!(
            "Parsed formula with {} nodes ({:?})",
            mngr.len(),
            timer.elapsed()
        );
        log::trace!("Formula: {}", PrettyPrinter::inline(&mngr).render(root));

        let verdict = match self.options.mode {
            Mode::PrettyPrint => {
                let text = PrettyPrinter::multiline(&mngr).render(root);
                out.write_all(text.as_bytes())?;
                Verdict::PrettyPrinted
            }
            Mode::Dump => {
                let mut writer = DimacsWriter::new(&mut *out);
                let encoding = encode(&mngr, root, self.options.query(), &mut writer)?;
                log::info!(
                    "Dumped {} variables and {} clauses",
                    encoding.num_vars(),
                    encoding.num_clauses()
                );
                Verdict::Dumped
            }
            Mode::Solve => self.solve(&mngr, root, connect)?,
        };
        verdict.report(out)?;
        out.flush()?;
        Ok(verdict)
    }

    fn solve<B: SatBackend>(
        &self,
        mngr: &NodeManager,
        root: NodeRef,
        connect: impl FnOnce() -> B,
    ) -> Result<Verdict, Error> {
        let query = self.options.query();
        let mut backend = connect();
        backend.set_verbose(self.options.verbose > 0);

        let timer = Instant::now();
        let encoding = encode(mngr, root, query, &mut backend)?;
        log::info!(
            "Encoded {} variables into {} clauses ({:?})",
            encoding.num_vars(),
            encoding.num_clauses(),
            timer.elapsed()
        );

        let timer = Instant::now();
        let answer = backend.solve(self.options.max_decisions)?;
        log::info!("Done SAT solving: {} ({:?})", answer, timer.elapsed());

        let verdict = match answer {
            SolverAnswer::ResourcesExhausted => Verdict::ResourcesExhausted,
            SolverAnswer::Unsat => match query {
                Query::Satisfiability => Verdict::Unsatisfiable,
                Query::Validity => Verdict::Valid,
            },
            SolverAnswer::Sat => {
                let mut model = Model::default();
                for lit in backend.assignment(encoding.num_vars())? {
                    let name = encoding
                        .node_of(lit.unsigned_abs())
                        .and_then(|n| mngr.get(n).name());
                    if let Some(name) = name {
                        model.0.push((name.to_string(), lit > 0));
                    }
                }
                debug_assert_eq!(
                    mngr.eval(root, |n| model.get(n).unwrap_or(false)),
                    query == Query::Satisfiability,
                    "model does not agree with the formula"
                );
                match query {
                    Query::Satisfiability => Verdict::Satisfiable(model),
                    Query::Validity => Verdict::Invalid(model),
                }
            }
        };
        Ok(verdict)
    }
}
