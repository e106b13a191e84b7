//! Translation of CNF in DIMACS format into infix formulas.
//!
//! Every clause becomes a parenthesized disjunction over variables `v<idx>`, clauses are joined
//! by a line holding `&`. The result is accepted by the formula parser.

use std::{io::Write, iter::Peekable, str::Chars};

use thiserror::Error;

fn found(c: &Option<char>) -> String {
    match c {
        Some(c) => c.to_string(),
        None => "EOF".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("expected digit but found '{}'", found(.0))]
    ExpectedDigit(Option<char>),
    #[error("variable index too large")]
    IndexTooLarge,
    #[error("can not handle empty clauses")]
    EmptyClause,
    #[error("closing 0 missing")]
    MissingZero,
    #[error("no clauses found")]
    NoClauses,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input is not in DIMACS format. `line` is 1-based.
    #[error("{line}: {kind}")]
    Syntax { line: usize, kind: SyntaxErrorKind },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Reader<'a> {
    fn next(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn error(&self, kind: SyntaxErrorKind) -> ConvertError {
        ConvertError::Syntax {
            line: self.line,
            kind,
        }
    }

    /// Reads an optionally negated integer.
    /// The character terminating the number is consumed as well.
    fn literal(&mut self) -> Result<i64, ConvertError> {
        let mut c = self.next();
        let negative = c == Some('-');
        if negative {
            c = self.next();
        }
        let mut value = match c.and_then(|c| c.to_digit(10)) {
            Some(d) => i64::from(d),
            None => return Err(self.error(SyntaxErrorKind::ExpectedDigit(c))),
        };
        while let Some(d) = self.next().and_then(|c| c.to_digit(10)) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(i64::from(d)))
                .filter(|v| *v <= i64::from(i32::MAX))
                .ok_or_else(|| self.error(SyntaxErrorKind::IndexTooLarge))?;
        }
        Ok(if negative { -value } else { value })
    }
}

/// Converts DIMACS `input` and writes the formula to `out`.
/// Comment and problem lines are skipped. Returns the number of clauses.
pub fn dimacs_to_boole<W: Write>(input: &str, out: &mut W) -> Result<usize, ConvertError> {
    let mut reader = Reader {
        chars: input.chars().peekable(),
        line: 1,
    };
    let mut num_clauses = 0;
    let mut clause_len = 0;

    loop {
        while reader.peek().map_or(false, char::is_whitespace) {
            reader.next();
        }
        match reader.peek() {
            None => break,
            Some('c' | 'p') => {
                while let Some(c) = reader.next() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            Some(_) => {
                let lit = reader.literal()?;
                if lit != 0 {
                    if clause_len > 0 {
                        write!(out, " | ")?;
                    } else {
                        if num_clauses > 0 {
                            writeln!(out, "&")?;
                        }
                        write!(out, "(")?;
                    }
                    if lit < 0 {
                        write!(out, "!")?;
                    }
                    write!(out, "v{}", lit.unsigned_abs())?;
                    clause_len += 1;
                } else if clause_len > 0 {
                    writeln!(out, ")")?;
                    clause_len = 0;
                    num_clauses += 1;
                } else {
                    return Err(reader.error(SyntaxErrorKind::EmptyClause));
                }
            }
        }
    }

    if clause_len > 0 {
        return Err(reader.error(SyntaxErrorKind::MissingZero));
    }
    if num_clauses == 0 {
        return Err(reader.error(SyntaxErrorKind::NoClauses));
    }
    log::info!("Converted {} clauses", num_clauses);
    Ok(num_clauses)
}
