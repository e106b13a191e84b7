use std::io::Write;

use itertools::Itertools;

use crate::{
    error::Error,
    sat::{ClauseSink, PLit, PVar},
};

/// Writes the encoding in DIMACS format instead of solving it.
///
/// Formula variables are listed as `c <var> <name>` comments before the `p cnf` header.
pub struct DimacsWriter<W: Write> {
    out: W,
}

impl<W: Write> DimacsWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ClauseSink for DimacsWriter<W> {
    fn declare_variable(&mut self, var: PVar, name: &str) -> Result<(), Error> {
        writeln!(self.out, "c {} {}", var, name)?;
        Ok(())
    }

    fn declare_problem(&mut self, num_vars: PVar, num_clauses: usize) -> Result<(), Error> {
        writeln!(self.out, "p cnf {} {}", num_vars, num_clauses)?;
        Ok(())
    }

    fn add_clause(&mut self, clause: &[PLit]) -> Result<(), Error> {
        writeln!(self.out, "{} 0", clause.iter().join(" "))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encode::{encode, Query},
        node::NodeManager,
        parse::parse_formula,
    };

    fn dump(input: &str, query: Query) -> String {
        let mut mngr = NodeManager::default();
        let root = parse_formula(input, &mut mngr).unwrap();
        let mut writer = DimacsWriter::new(Vec::new());
        encode(&mngr, root, query, &mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn dump_variable() {
        assert_eq!(dump("a", Query::Validity), "c 1 a\np cnf 1 1\n-1 0\n");
    }

    #[test]
    fn dump_var_or_not_var() {
        assert_eq!(
            dump("a | !a", Query::Validity),
            "c 1 a\n\
             p cnf 3 6\n\
             2 1 0\n\
             -2 -1 0\n\
             3 -1 0\n\
             3 -2 0\n\
             -3 1 2 0\n\
             -3 0\n"
        );
    }

    #[test]
    fn comments_precede_header() {
        let out = dump("x <-> !y", Query::Satisfiability);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(&lines[..3], &["c 1 x", "c 2 y", "p cnf 4 7"]);
        assert_eq!(lines.last(), Some(&"4 0"));
        assert_eq!(lines.len(), 3 + 7);
    }
}
